//! Fixed constants of the MacSHAPA Open Database wire format
//!
//! These are properties of the file format rather than tunable limits, so they
//! live here instead of the TOML profiles.

pub mod format {
    /// Largest integer a database value may hold
    pub const MAX_INTEGER: f64 = 1_000_000_000.0;

    /// Smallest integer a database value may hold
    pub const MIN_INTEGER: f64 = -1_000_000_000.0;

    /// Once the running value of a number passes this ceiling, further
    /// integer digits are discarded.
    pub const FLOAT_CEILING: f64 = 1e34;

    /// Once the fractional digit weight drops below this floor, further
    /// fractional digits are discarded.
    pub const FLOAT_FLOOR: f64 = 1e-34;

    /// Time stamps are counted in ticks
    pub const TICKS_PER_SECOND: i64 = 60;

    pub const MIN_TIME: i64 = 0;

    /// 59:59:59:59 expressed in ticks
    pub const MAX_TIME: i64 = 59 * 216_000 + 59 * 3_600 + 59 * 60 + 59;

    pub const MIN_COLUMN_WIDTH: u32 = 125;
    pub const DEFAULT_COLUMN_WIDTH: u32 = 200;
    pub const MAX_COLUMN_WIDTH: u32 = 1500;

    /// The only database version this reader understands
    pub const SUPPORTED_VERSION: i64 = 1;

    pub const MIN_DEBUG_LEVEL: u8 = 0;
    pub const MAX_DEBUG_LEVEL: u8 = 3;

    pub const MIN_ERRORS_LIMIT: u32 = 1;
    pub const MAX_ERRORS_LIMIT: u32 = 10;
    pub const MIN_WARNINGS_LIMIT: u32 = 1;
    pub const MAX_WARNINGS_LIMIT: u32 = 99;

    /// Hidden matrix column that holds the query predicates
    pub const QUERY_VAR_NAME: &str = "###QUERY VAR###";

    /// Single formal argument of the query column
    pub const QUERY_FARG_NAME: &str = "<query>";

    /// Implicit leading arguments of every column predicate
    pub const ORD_FARG_NAME: &str = "<ord>";
    pub const ONSET_FARG_NAME: &str = "<onset>";
    pub const OFFSET_FARG_NAME: &str = "<offset>";

    /// Stand-in formal argument for declarations with an empty argument list
    pub const PLACEHOLDER_FARG_NAME: &str = "<arg>";

    /// Reserved words of the outer `( setf macshapa-db '( ... ) )` form
    pub const SETF_WORD: &str = "setf";
    pub const DB_VAR_WORD: &str = "macshapa-db";

    pub const TRUE_WORD: &str = "TRUE";
    pub const FALSE_WORD: &str = "FALSE";
}

#[cfg(test)]
mod tests {
    use super::format::*;

    #[test]
    fn test_max_time_is_just_under_sixty_hours() {
        assert_eq!(MAX_TIME, 12_959_999);
        assert!(MAX_TIME < 60 * 60 * 60 * TICKS_PER_SECOND);
    }

    #[test]
    fn test_integer_range_is_exact_in_f64() {
        assert_eq!(MAX_INTEGER as i64, 1_000_000_000);
        assert_eq!(MIN_INTEGER as i64, -1_000_000_000);
    }

    #[test]
    fn test_column_widths_ordered() {
        assert!(MIN_COLUMN_WIDTH <= DEFAULT_COLUMN_WIDTH);
        assert!(DEFAULT_COLUMN_WIDTH <= MAX_COLUMN_WIDTH);
    }
}
