//! `HEADER>` section

use super::alist::AlistSchema;
use super::parser::OdbParser;
use crate::config::constants::format::{
    MAX_DEBUG_LEVEL, MAX_ERRORS_LIMIT, MAX_WARNINGS_LIMIT, MIN_DEBUG_LEVEL, MIN_ERRORS_LIMIT,
    MIN_WARNINGS_LIMIT, SUPPORTED_VERSION,
};
use crate::diagnostics::SystemResult;
use crate::logging::codes;
use crate::sink::DatabaseHeader;
use crate::tokens::AlistLabel;

const HEADER_SCHEMA: &AlistSchema = &[
    (AlistLabel::Name, false),
    (AlistLabel::Version, true),
    (AlistLabel::DebugLevel, false),
    (AlistLabel::MaxErrors, false),
    (AlistLabel::MaxWarnings, false),
];

impl<'a, 's> OdbParser<'a, 's> {
    pub(super) fn parse_header(&mut self) -> SystemResult<()> {
        self.push_context("header");
        let mut header = DatabaseHeader::default();
        let mut version = None;

        self.parse_alist_body(HEADER_SCHEMA, |p, label| {
            match label {
                AlistLabel::Name => header.name = p.string_value(label)?,
                AlistLabel::Version => version = p.integer_value(label)?,
                AlistLabel::DebugLevel => {
                    if let Some(level) = p.integer_value(label)? {
                        let level = p.clamp_attribute(
                            label,
                            level,
                            MIN_DEBUG_LEVEL as i64,
                            MAX_DEBUG_LEVEL as i64,
                        );
                        header.debug_level = Some(level as u8);
                    }
                }
                AlistLabel::MaxErrors => {
                    if let Some(limit) = p.integer_value(label)? {
                        let limit = p.clamp_attribute(
                            label,
                            limit,
                            MIN_ERRORS_LIMIT as i64,
                            MAX_ERRORS_LIMIT as i64,
                        );
                        header.max_errors = Some(limit as u32);
                    }
                }
                AlistLabel::MaxWarnings => {
                    if let Some(limit) = p.integer_value(label)? {
                        let limit = p.clamp_attribute(
                            label,
                            limit,
                            MIN_WARNINGS_LIMIT as i64,
                            MAX_WARNINGS_LIMIT as i64,
                        );
                        header.max_warnings = Some(limit as u32);
                    }
                }
                _ => p.discard_value()?,
            }
            Ok(())
        })?;

        if let Some(found) = version {
            if found != SUPPORTED_VERSION {
                self.warn(
                    codes::semantic::UNSUPPORTED_VERSION,
                    &format!("{}, reading as version {}", found, SUPPORTED_VERSION),
                );
            }
        }
        header.version = version.unwrap_or(SUPPORTED_VERSION);

        if self.honor_header_limits {
            if let Some(level) = header.debug_level {
                self.diag.set_debug_level(level);
            }
            if let Some(limit) = header.max_errors {
                self.diag.set_max_errors(limit);
            }
            if let Some(limit) = header.max_warnings {
                self.diag.set_max_warnings(limit);
                let line = self.line();
                self.diag.enforce_warning_limit(line);
            }
        }

        if self.loading() {
            self.commit("record_header", |sink| sink.record_header(&header))?;
        }

        self.section_done(AlistLabel::Header);
        self.pop_context();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{parse, parse_with_limits};
    use crate::logging::codes;

    fn with_header(header: &str) -> String {
        format!("( setf macshapa-db '( (HEADER> {}) (USER> ()) ) )", header)
    }

    #[test]
    fn test_header_fields_recorded() {
        let input = with_header(
            "( (NAME> \"study\") (VERSION> 1) (DEBUG-LEVEL> 2) (MAX-ERRORS> 5) (MAX-WARNINGS> 20) )",
        );
        let (db, diag) = parse(&input);
        assert_eq!(diag.errors(), 0);
        let header = db.header().unwrap();
        assert_eq!(header.name.as_deref(), Some("study"));
        assert_eq!(header.debug_level, Some(2));
        assert_eq!(header.max_errors, Some(5));
        assert_eq!(header.max_warnings, Some(20));
        assert_eq!(diag.limits().max_warnings, 20);
        assert_eq!(diag.limits().debug_level, 2);
    }

    #[test]
    fn test_missing_version_is_load_error() {
        let (db, diag) = parse(&with_header("(NAME> \"x\")"));
        assert_eq!(diag.count_of(codes::syntax::MISSING_REQUIRED_ENTRY), 1);
        assert!(diag.stop_load());
        // nothing may be recorded once loading has stopped
        assert!(db.header().is_none());
    }

    #[test]
    fn test_unsupported_version_warns() {
        let (db, diag) = parse(&with_header("(VERSION> 2)"));
        assert_eq!(diag.count_of(codes::semantic::UNSUPPORTED_VERSION), 1);
        assert_eq!(db.header().unwrap().version, 1);
    }

    #[test]
    fn test_out_of_range_limits_clamp() {
        let (db, diag) = parse(&with_header("(VERSION> 1) (MAX-ERRORS> 50) (DEBUG-LEVEL> -1)"));
        assert_eq!(diag.count_of(codes::semantic::VALUE_OUT_OF_RANGE), 2);
        let header = db.header().unwrap();
        assert_eq!(header.max_errors, Some(10));
        assert_eq!(header.debug_level, Some(0));
    }

    #[test]
    fn test_name_given_as_list_is_one_mismatch() {
        let (db, diag) = parse(&with_header("(NAME> (\"a\" \"b\")) (VERSION> 1)"));
        assert_eq!(diag.count_of(codes::syntax::ATTRIBUTE_VALUE_TYPE_MISMATCH), 1);
        assert_eq!(diag.warnings(), 1);
        assert!(db.header().unwrap().name.is_none());
    }

    #[test]
    fn test_header_warning_limit_escalates() {
        let input =
            "( setf macshapa-db '( (HEADER> (VERSION> 1) (MAX-WARNINGS> 1)) (USER> (BOGUS> 1)) ) )";
        let (_, diag) = parse_with_limits(input, 99, 10);
        assert_eq!(diag.count_of(codes::syntax::UNKNOWN_ALIST_LABEL), 1);
        assert!(diag.stop_scan());
    }

    #[test]
    fn test_lowered_limit_counts_header_warnings() {
        let input = with_header("(VERSION> 1) (A> 1) (B> 2) (C> 3) (MAX-WARNINGS> 1)");
        let (db, diag) = parse_with_limits(&input, 99, 10);
        assert_eq!(diag.count_of(codes::syntax::UNKNOWN_ALIST_LABEL), 3);
        assert_eq!(diag.count_of(codes::limits::MAX_WARNINGS_EXCEEDED), 1);
        assert!(diag.stop_scan());
        assert!(db.header().is_none());
    }

    #[test]
    fn test_limit_above_count_does_not_escalate() {
        let input = with_header("(VERSION> 1) (A> 1) (MAX-WARNINGS> 5)");
        let (db, diag) = parse_with_limits(&input, 99, 10);
        assert_eq!(diag.count_of(codes::limits::MAX_WARNINGS_EXCEEDED), 0);
        assert!(!diag.stop_load());
        assert_eq!(db.header().unwrap().max_warnings, Some(5));
    }
}
