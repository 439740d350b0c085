use std::collections::BTreeMap;
use std::time::Duration;

use azfile_core::time::{format_http_date, DateTime};
use http::header::{self, HeaderName};

/// Options shared by every file service operation.
#[derive(Debug, Clone, Default)]
pub struct FileServiceOptions {
    /// Server side timeout, sent as the `timeout` query parameter in seconds.
    pub timeout: Option<Duration>,
}

/// Condition the service checks before applying a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessCondition {
    /// Only apply if the resource's ETag matches.
    IfMatch(String),
    /// Only apply if the resource's ETag doesn't match.
    IfNoneMatch(String),
    /// Only apply if the resource changed since the given time.
    IfModifiedSince(DateTime),
    /// Only apply if the resource didn't change since the given time.
    IfUnmodifiedSince(DateTime),
}

impl AccessCondition {
    /// Header name and value carrying this condition.
    pub fn header(&self) -> (HeaderName, String) {
        match self {
            AccessCondition::IfMatch(etag) => (header::IF_MATCH, etag.clone()),
            AccessCondition::IfNoneMatch(etag) => (header::IF_NONE_MATCH, etag.clone()),
            AccessCondition::IfModifiedSince(t) => {
                (header::IF_MODIFIED_SINCE, format_http_date(*t))
            }
            AccessCondition::IfUnmodifiedSince(t) => {
                (header::IF_UNMODIFIED_SINCE, format_http_date(*t))
            }
        }
    }
}

/// Options for creating a file.
#[derive(Debug, Clone, Default)]
pub struct CreateFileOptions {
    /// Server side timeout.
    pub timeout: Option<Duration>,
    /// Content type stored with the file, `application/octet-stream` if unset.
    pub content_type: Option<String>,
    /// Content encoding stored with the file.
    pub content_encoding: Option<String>,
    /// Content language stored with the file.
    pub content_language: Option<String>,
    /// Base64 MD5 stored with the file.
    pub content_md5: Option<String>,
    /// Cache control stored with the file.
    pub cache_control: Option<String>,
    /// Content disposition stored with the file.
    pub content_disposition: Option<String>,
    /// User metadata, sent as `x-ms-meta-{name}` headers.
    pub metadata: BTreeMap<String, String>,
    /// Precondition for the create.
    pub access_condition: Option<AccessCondition>,
}

/// Options for writing a range.
#[derive(Debug, Clone, Default)]
pub struct CreateFileRangeOptions {
    /// Server side timeout.
    pub timeout: Option<Duration>,
    /// Base64 MD5 of the range content, checked by the service.
    pub content_md5: Option<String>,
    /// Precondition for the write.
    pub access_condition: Option<AccessCondition>,
}

impl From<&CreateFileOptions> for FileServiceOptions {
    fn from(options: &CreateFileOptions) -> Self {
        Self {
            timeout: options.timeout,
        }
    }
}

impl From<&CreateFileOptions> for CreateFileRangeOptions {
    /// Carries the timeout over. The MD5 describes the whole file, so it's
    /// not reused for single ranges.
    fn from(options: &CreateFileOptions) -> Self {
        Self {
            timeout: options.timeout,
            content_md5: None,
            access_condition: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_access_condition_header() {
        let t = Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap();
        let cases = vec![
            (
                AccessCondition::IfMatch("\"etag\"".to_string()),
                (header::IF_MATCH, "\"etag\""),
            ),
            (
                AccessCondition::IfNoneMatch("*".to_string()),
                (header::IF_NONE_MATCH, "*"),
            ),
            (
                AccessCondition::IfModifiedSince(t),
                (header::IF_MODIFIED_SINCE, "Wed, 21 Oct 2015 07:28:00 GMT"),
            ),
            (
                AccessCondition::IfUnmodifiedSince(t),
                (header::IF_UNMODIFIED_SINCE, "Wed, 21 Oct 2015 07:28:00 GMT"),
            ),
        ];

        for (condition, (name, value)) in cases {
            assert_eq!(condition.header(), (name, value.to_string()));
        }
    }
}
