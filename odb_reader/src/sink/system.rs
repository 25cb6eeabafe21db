//! Built-in predicates every database starts with

/// (name, formal arguments, variable length)
pub const SYSTEM_PREDICATES: &[(&str, &[&str], bool)] = &[
    ("rule", &["<condition>", "<action>"], false),
    ("query", &["<condition>", "<action>"], false),
    ("or", &["<arg1>", "<arg2>", "<arg3>", "<arg4>", "<arg5>", "<arg6>", "<arg7>"], true),
    ("and", &["<arg1>", "<arg2>", "<arg3>", "<arg4>", "<arg5>", "<arg6>", "<arg7>"], true),
    ("not", &["<arg1>"], false),
    ("assign", &["<query-var>", "<val>"], false),
    // comparisons and type tests
    ("lt", &["<x>", "<y>"], false),
    ("gt", &["<x>", "<y>"], false),
    ("le", &["<x>", "<y>"], false),
    ("ge", &["<x>", "<y>"], false),
    ("eq", &["<x>", "<y>"], false),
    ("ne", &["<x>", "<y>"], false),
    ("substring", &["<substr>", "<string>"], false),
    ("selected", &["<var>"], false),
    ("isinteger", &["<arg>"], false),
    ("istime", &["<arg>"], false),
    ("isfloat", &["<arg>"], false),
    ("isnominal", &["<arg>"], false),
    ("isqstring", &["<arg>"], false),
    ("istext", &["<arg>"], false),
    ("ispred", &["<arg>"], false),
    ("isempty", &["<arg>"], false),
    // actions
    ("print", &["<arg1>", "<arg2>", "<arg3>", "<arg4>", "<arg5>", "<arg6>", "<arg7>"], true),
    ("count", &["<form>"], false),
    ("insert", &["<var>"], true),
    ("sum", &["<addend>"], false),
    ("modify", &["<var>"], true),
    ("delete", &["<var>"], true),
    ("select", &["<var>"], true),
    ("deselect", &["<var>"], true),
    ("cmin", &["<val>"], false),
    ("cmax", &["<val>"], false),
    ("cmean", &["<val>"], false),
    // arithmetic and strings
    ("times", &["<x>", "<y>"], false),
    ("divide", &["<x>", "<y>"], false),
    ("minus", &["<x>", "<y>"], false),
    ("clear", &["<void>"], false),
    ("max", &["<x>", "<y>"], false),
    ("min", &["<x>", "<y>"], false),
    ("concat", &["<str1>", "<str2>"], true),
    ("concatq", &["<str1>", "<str2>"], true),
    ("sin", &["<x>"], false),
    ("cos", &["<x>"], false),
    ("tan", &["<x>"], false),
    ("asin", &["<x>"], false),
    ("acos", &["<x>"], false),
    ("atan", &["<x>"], false),
    ("abs", &["<x>"], false),
    ("mod", &["<x>", "<y>"], false),
    ("rem", &["<x>", "<y>"], false),
    // interval relations between cells
    ("aftero", &["<base-var>", "<successor-var>", "<min-ord>", "<max-ord>"], false),
    ("aftert", &["<base-var>", "<successor-var>", "<min-time>", "<max-time>"], false),
    ("beforeo", &["<base-var>", "<predecessor-var>", "<min-ord>", "<max-ord>"], false),
    ("beforet", &["<base-var>", "<predecessor-var>", "<min-time>", "<max-time>"], false),
    ("during1", &["<base-var>", "<contemporary-var>"], false),
    ("during2", &["<base-var>", "<contemporary-var>"], false),
    ("during3", &["<base-var>", "<contemporary-var>"], false),
    ("nextinstbo", &["<base-var>", "<successor-var>"], false),
    ("nextinstbt", &["<base-var>", "<successor-var>"], false),
    ("nextinsto", &["<base-var>", "<successor-var>"], false),
    ("nextinstt", &["<base-var>", "<successor-var>"], false),
    ("nexto", &["<base-var>", "<successor-var>"], false),
    ("nextt", &["<base-var>", "<successor-var>"], false),
    ("previnstbo", &["<base-var>", "<predecessor-var>"], false),
    ("previnstbt", &["<base-var>", "<predecessor-var>"], false),
    ("previnsto", &["<base-var>", "<predecessor-var>"], false),
    ("previnstt", &["<base-var>", "<predecessor-var>"], false),
    ("prevo", &["<base-var>", "<predecessor-var>"], false),
    ("prevt", &["<base-var>", "<predecessor-var>"], false),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_system_predicate_names_unique() {
        let names: HashSet<_> = SYSTEM_PREDICATES.iter().map(|(name, _, _)| *name).collect();
        assert_eq!(names.len(), SYSTEM_PREDICATES.len());
    }

    #[test]
    fn test_every_system_predicate_has_formal_args() {
        for (name, fargs, _) in SYSTEM_PREDICATES {
            assert!(!fargs.is_empty(), "{}", name);
            assert!(fargs.iter().all(|f| f.starts_with('<') && f.ends_with('>')));
        }
    }
}
