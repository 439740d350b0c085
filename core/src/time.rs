//! Time related utils.

use crate::Error;
use chrono::Utc;

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into http date: `Sun, 06 Nov 1994 08:49:37 GMT`
///
/// ## Note
///
/// HTTP date is slightly different from RFC2822.
///
/// - Timezone is fixed to GMT.
/// - Day must be 2 digit.
pub fn format_http_date(t: DateTime) -> String {
    t.format("%a, %d %b %Y %T GMT").to_string()
}

/// Parse an RFC-1123 date such as the value of a `Last-Modified` header.
pub fn parse_rfc1123(s: &str) -> crate::Result<DateTime> {
    let t = chrono::DateTime::parse_from_rfc2822(s.trim())
        .map_err(|e| Error::unexpected(format!("parse '{s}' into rfc1123 failed")).with_source(e))?;
    Ok(t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn test_time() -> DateTime {
        Utc.with_ymd_and_hms(2022, 3, 1, 8, 12, 34).unwrap()
    }

    #[test]
    fn test_format_http_date() {
        let t = test_time();
        assert_eq!("Tue, 01 Mar 2022 08:12:34 GMT", format_http_date(t))
    }

    #[test]
    fn test_parse_rfc1123() {
        let t = parse_rfc1123("Tue, 01 Mar 2022 08:12:34 GMT").expect("must be valid");
        assert_eq!(t, test_time());

        assert!(parse_rfc1123("2022-03-01T08:12:34Z").is_err());
    }

    #[test]
    fn test_http_date_round_trips() {
        let t = test_time();
        assert_eq!(parse_rfc1123(&format_http_date(t)).unwrap(), t);
    }
}
