//! Shared utility functions for the air-quality dashboard crates.

/// Date utility functions
pub mod dates {
    use super::error::DateError;
    use chrono::{Datelike, NaiveDate, NaiveDateTime};

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> Result<NaiveDate, DateError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|e| DateError(format!("'{}': {}", s, e)))
    }

    /// Parse a backend timestamp.
    ///
    /// Accepts "YYYY-MM-DDTHH:MM:SS" (optionally with fractional seconds)
    /// and the space separated "YYYY-MM-DD HH:MM:SS" variant.
    pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, DateError> {
        let trimmed = s.trim();
        NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f"))
            .map_err(|e| DateError(format!("'{}': {}", s, e)))
    }

    /// Weekly box plot axis label: short weekday plus day of month, e.g. "Mon-15".
    pub fn weekday_label(date: &NaiveDate) -> String {
        format!("{}-{}", date.format("%a"), date.day())
    }

    /// Monthly box plot axis label: 1-based week ordinal, e.g. "1W".
    pub fn week_ordinal_label(index: usize) -> String {
        format!("{}W", index + 1)
    }

    /// Yearly box plot axis label: short month plus two-digit year, e.g. "Jan-24".
    pub fn month_label(date: &NaiveDate) -> String {
        date.format("%b-%y").to_string()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
        }

        #[test]
        fn test_parse_date_rejects_other_formats() {
            assert!(parse_date("20230615").is_err());
            assert!(parse_date("15/06/2023").is_err());
            assert!(parse_date("").is_err());
        }

        #[test]
        fn test_parse_timestamp_variants() {
            let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(13, 0, 0)
                .unwrap();
            assert_eq!(parse_timestamp("2024-03-01T13:00:00").unwrap(), expected);
            assert_eq!(parse_timestamp("2024-03-01 13:00:00").unwrap(), expected);
            assert_eq!(parse_timestamp("2024-03-01T13:00:00.000").unwrap(), expected);
            assert!(parse_timestamp("2024-03-01").is_err());
        }

        #[test]
        fn test_labels() {
            // 2024-01-15 was a Monday
            let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
            assert_eq!(weekday_label(&date), "Mon-15");
            assert_eq!(month_label(&date), "Jan-24");
            assert_eq!(week_ordinal_label(0), "1W");
            assert_eq!(week_ordinal_label(3), "4W");
        }
    }
}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug, Clone, PartialEq)]
    pub struct DateError(pub String);

    impl fmt::Display for DateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Date error: {}", self.0)
        }
    }

    impl std::error::Error for DateError {}
}
