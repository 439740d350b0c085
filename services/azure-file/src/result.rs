use azfile_core::time::{parse_rfc1123, DateTime};
use azfile_core::{Error, Result};
use http::header::{ETAG, LAST_MODIFIED};
use http::HeaderMap;

use crate::constants::CONTENT_MD5;

/// Outcome of creating a share, directory or file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileResult {
    /// `ETag` of the created resource.
    pub etag: Option<String>,
    /// `Last-Modified` of the created resource.
    pub last_modified: Option<DateTime>,
}

impl FileResult {
    /// Parse from response headers. Both headers are optional.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self> {
        Ok(Self {
            etag: header_str(headers, ETAG.as_str())?.map(str::to_string),
            last_modified: header_str(headers, LAST_MODIFIED.as_str())?
                .map(parse_last_modified)
                .transpose()?,
        })
    }
}

/// Outcome of writing or clearing a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFileRangeResult {
    /// `ETag` of the file after the write.
    pub etag: String,
    /// `Last-Modified` of the file after the write.
    pub last_modified: DateTime,
    /// `Content-MD5` computed by the service, if any.
    pub content_md5: Option<String>,
}

impl CreateFileRangeResult {
    /// Parse from response headers.
    ///
    /// `ETag` and `Last-Modified` must be present.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self> {
        let etag = header_str(headers, ETAG.as_str())?
            .ok_or_else(|| Error::unexpected("range write response has no ETag header"))?;
        let last_modified = header_str(headers, LAST_MODIFIED.as_str())?
            .ok_or_else(|| Error::unexpected("range write response has no Last-Modified header"))?;

        Ok(Self {
            etag: etag.to_string(),
            last_modified: parse_last_modified(last_modified)?,
            content_md5: header_str(headers, CONTENT_MD5)?.map(str::to_string),
        })
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>> {
    match headers.get(name) {
        Some(v) => Ok(Some(v.to_str().map_err(|e| {
            Error::unexpected(format!("response header {name} is not valid text")).with_source(e)
        })?)),
        None => Ok(None),
    }
}

fn parse_last_modified(value: &str) -> Result<DateTime> {
    parse_rfc1123(value).map_err(|e| {
        Error::unexpected(format!("invalid Last-Modified header: {value}")).with_source(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use azfile_core::ErrorKind;
    use chrono::{TimeZone, Utc};
    use http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        pairs
            .iter()
            .map(|(k, v)| {
                (
                    http::HeaderName::from_static(k),
                    HeaderValue::from_static(v),
                )
            })
            .collect()
    }

    #[test]
    fn test_file_result() {
        let result = FileResult::from_headers(&headers(&[
            ("etag", "\"0x8D2A1B0C\""),
            ("last-modified", "Wed, 21 Oct 2015 07:28:00 GMT"),
        ]))
        .unwrap();

        assert_eq!(result.etag.as_deref(), Some("\"0x8D2A1B0C\""));
        assert_eq!(
            result.last_modified,
            Some(Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap())
        );

        assert_eq!(
            FileResult::from_headers(&HeaderMap::new()).unwrap(),
            FileResult::default()
        );
    }

    #[test]
    fn test_create_file_range_result() {
        let result = CreateFileRangeResult::from_headers(&headers(&[
            ("etag", "\"0x8D2A1B0C\""),
            ("last-modified", "Wed, 21 Oct 2015 07:28:00 GMT"),
            ("content-md5", "sQqNsWTgdUEFt6mb5y4/5Q=="),
        ]))
        .unwrap();

        assert_eq!(result.etag, "\"0x8D2A1B0C\"");
        assert_eq!(result.content_md5.as_deref(), Some("sQqNsWTgdUEFt6mb5y4/5Q=="));
    }

    #[test]
    fn test_create_file_range_result_errors() {
        let cases = vec![
            ("no etag", headers(&[("last-modified", "Wed, 21 Oct 2015 07:28:00 GMT")])),
            ("no last-modified", headers(&[("etag", "\"x\"")])),
            (
                "bad last-modified",
                headers(&[("etag", "\"x\""), ("last-modified", "yesterday")]),
            ),
        ];

        for (name, input) in cases {
            let err = CreateFileRangeResult::from_headers(&input)
                .expect_err(&format!("Failed for case: {name}"));
            assert_eq!(err.kind(), ErrorKind::Unexpected, "Failed for case: {name}");
        }
    }
}
