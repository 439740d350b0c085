use std::path::Path;
use std::time::Duration;

use azfile_core::{Context, Error, Result, Signer};
use bytes::Bytes;
use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use http::{Method, StatusCode};
use log::{debug, warn};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::connection_string::SettingsResolver;
use crate::constants::{self, *};
use crate::credential::Credential;
use crate::options::{
    AccessCondition, CreateFileOptions, CreateFileRangeOptions, FileServiceOptions,
};
use crate::provide_credential::StaticCredentialProvider;
use crate::range::FileRange;
use crate::result::{CreateFileRangeResult, FileResult};
use crate::service_properties::ServiceProperties;
use crate::settings::Settings;
use crate::sign_request::RequestSigner;
use crate::upload::{Chunker, Content};

/// Characters left alone in a path part: ASCII alphanumerics and `-_.`.
const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Client for the file service of one storage account.
///
/// Every request is signed by the [`Signer`] and sent through the HTTP
/// transport of the signer's [`Context`]. Nothing is retried.
#[derive(Debug, Clone)]
pub struct FileClient {
    endpoint: String,
    signer: Signer<Credential>,
}

impl FileClient {
    /// Create a client for the file service at `endpoint`.
    ///
    /// `https://` is assumed when the endpoint has no scheme.
    pub fn new(endpoint: &str, signer: Signer<Credential>) -> Self {
        let endpoint = if endpoint.contains("://") {
            endpoint.to_string()
        } else {
            format!("https://{endpoint}")
        };

        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            signer,
        }
    }

    /// Create a client for the account described by `settings`.
    pub fn from_settings(ctx: Context, settings: &Settings) -> Result<Self> {
        let endpoint = settings.file_endpoint_or_err()?;
        let signer = Signer::new(
            ctx,
            StaticCredentialProvider::from_settings(settings),
            RequestSigner::new(),
        );

        Ok(Self::new(endpoint, signer))
    }

    /// Create a client from a connection string.
    pub fn from_connection_string(ctx: Context, conn_str: &str) -> Result<Self> {
        let settings = SettingsResolver::new().resolve(conn_str)?;
        Self::from_settings(ctx, &settings)
    }

    /// Endpoint requests are sent to, without trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get the properties of the file service.
    pub async fn get_service_properties(
        &self,
        options: &FileServiceOptions,
    ) -> Result<ServiceProperties> {
        let resp = self
            .send(
                Method::GET,
                "",
                service_properties_query(options.timeout),
                HeaderMap::new(),
                Bytes::new(),
                StatusCode::OK,
            )
            .await?;

        let body = std::str::from_utf8(resp.body()).map_err(|e| {
            Error::unexpected("service properties response is not utf-8").with_source(e)
        })?;
        ServiceProperties::from_xml(body)
    }

    /// Set the properties of the file service.
    pub async fn set_service_properties(
        &self,
        properties: &ServiceProperties,
        options: &FileServiceOptions,
    ) -> Result<()> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(URL_ENCODED_CONTENT_TYPE),
        );

        self.send(
            Method::PUT,
            "",
            service_properties_query(options.timeout),
            headers,
            Bytes::from(properties.to_xml()?),
            StatusCode::ACCEPTED,
        )
        .await?;
        Ok(())
    }

    /// Create a share.
    pub async fn create_share(
        &self,
        share: &str,
        options: &FileServiceOptions,
    ) -> Result<FileResult> {
        check_share(share)?;

        let mut query = vec![(QP_REST_TYPE, "share".to_string())];
        push_timeout(&mut query, options.timeout);

        let resp = self
            .send(
                Method::PUT,
                &create_path(&[share]),
                query,
                HeaderMap::new(),
                Bytes::new(),
                StatusCode::CREATED,
            )
            .await?;
        FileResult::from_headers(resp.headers())
    }

    /// Create a directory inside a share.
    pub async fn create_directory(
        &self,
        share: &str,
        directory: &str,
        options: &FileServiceOptions,
    ) -> Result<FileResult> {
        check_share(share)?;

        let mut query = vec![(QP_REST_TYPE, "directory".to_string())];
        push_timeout(&mut query, options.timeout);

        let resp = self
            .send(
                Method::PUT,
                &create_path(&[share, directory]),
                query,
                HeaderMap::new(),
                Bytes::new(),
                StatusCode::CREATED,
            )
            .await?;
        FileResult::from_headers(resp.headers())
    }

    /// Create an empty file of `length` bytes.
    ///
    /// The content is written afterwards with [`FileClient::create_file_range`]
    /// or [`FileClient::create_file_contents`].
    pub async fn create_file(
        &self,
        share: &str,
        directory: &str,
        file: &str,
        length: u64,
        options: &CreateFileOptions,
    ) -> Result<FileResult> {
        check_share(share)?;

        let mut headers = HeaderMap::new();
        headers.insert(X_MS_TYPE, HeaderValue::from_static(FILE_TYPE));
        headers.insert(X_MS_CONTENT_LENGTH, HeaderValue::from(length));
        headers.insert(
            X_MS_CONTENT_TYPE,
            match &options.content_type {
                Some(v) => v.parse()?,
                None => HeaderValue::from_static(BINARY_CONTENT_TYPE),
            },
        );
        for (name, value) in [
            (X_MS_CONTENT_ENCODING, &options.content_encoding),
            (X_MS_CONTENT_LANGUAGE, &options.content_language),
            (X_MS_CONTENT_MD5, &options.content_md5),
            (X_MS_CACHE_CONTROL, &options.cache_control),
            (X_MS_CONTENT_DISPOSITION, &options.content_disposition),
        ] {
            if let Some(value) = value {
                headers.insert(name, value.parse()?);
            }
        }
        for (name, value) in &options.metadata {
            let name: HeaderName = format!("{X_MS_META_PREFIX}{name}").parse()?;
            headers.insert(name, value.parse()?);
        }
        insert_access_condition(&mut headers, options.access_condition.as_ref())?;

        let mut query = Vec::new();
        push_timeout(&mut query, options.timeout);

        let resp = self
            .send(
                Method::PUT,
                &create_path(&[share, directory, file]),
                query,
                headers,
                Bytes::new(),
                StatusCode::CREATED,
            )
            .await?;
        FileResult::from_headers(resp.headers())
    }

    /// Write `content` into `range` of a file.
    ///
    /// `content` must be exactly as long as the range and at most 4 MiB.
    pub async fn create_file_range(
        &self,
        share: &str,
        directory: &str,
        file: &str,
        range: FileRange,
        content: Bytes,
        options: &CreateFileRangeOptions,
    ) -> Result<CreateFileRangeResult> {
        if content.len() as u64 != range.len() {
            return Err(Error::request_invalid(format!(
                "range {range} covers {} bytes but content has {}",
                range.len(),
                content.len()
            )));
        }
        if content.len() > MAX_RANGE_SIZE {
            return Err(Error::request_invalid(format!(
                "range {range} is larger than {MAX_RANGE_SIZE} bytes"
            )));
        }

        self.update_range("update", share, directory, file, range, content, options)
            .await
    }

    /// Clear `range` of a file, releasing its storage.
    pub async fn clear_file_range(
        &self,
        share: &str,
        directory: &str,
        file: &str,
        range: FileRange,
        options: &CreateFileRangeOptions,
    ) -> Result<CreateFileRangeResult> {
        if range.is_empty() {
            return Err(Error::request_invalid("can't clear an empty range"));
        }

        self.update_range("clear", share, directory, file, range, Bytes::new(), options)
            .await
    }

    /// Write the whole `content` into a file, one range of at most 4 MiB
    /// at a time.
    ///
    /// Ranges are written in order and each write waits for the previous one.
    /// The first failing write aborts the upload. Only the result of the last
    /// write is returned.
    pub async fn create_file_contents(
        &self,
        share: &str,
        directory: &str,
        file: &str,
        content: impl Into<Content>,
        options: &CreateFileOptions,
    ) -> Result<CreateFileRangeResult> {
        let range_options = CreateFileRangeOptions::from(options);
        let mut chunker = Chunker::new(content.into());

        let mut last = None;
        while let Some((range, chunk)) = chunker.next_chunk().await? {
            debug!("writing range {range} of {share}/{directory}/{file}");
            last = Some(
                self.create_file_range(share, directory, file, range, chunk, &range_options)
                    .await?,
            );
        }

        last.ok_or_else(|| Error::unexpected("content produced no range to write"))
    }

    /// Upload a local file.
    ///
    /// The share and directory are created first. Both are allowed to exist
    /// already. The file is then created with the local size and its content
    /// streamed in.
    pub async fn upload_file(
        &self,
        share: &str,
        directory: &str,
        file: &str,
        local_path: impl AsRef<Path>,
        options: &CreateFileOptions,
    ) -> Result<CreateFileRangeResult> {
        let local_path = local_path.as_ref();
        let length = tokio::fs::metadata(local_path).await?.len();
        let local = tokio::fs::File::open(local_path).await?;

        let service_options = FileServiceOptions::from(options);
        allow_conflict(
            self.create_share(share, &service_options).await,
            &format!("share {share}"),
        )?;
        if !create_path(&[directory]).is_empty() {
            allow_conflict(
                self.create_directory(share, directory, &service_options)
                    .await,
                &format!("directory {share}/{directory}"),
            )?;
        }

        self.create_file(share, directory, file, length, options)
            .await?;
        self.create_file_contents(share, directory, file, local, options)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn update_range(
        &self,
        action: &'static str,
        share: &str,
        directory: &str,
        file: &str,
        range: FileRange,
        content: Bytes,
        options: &CreateFileRangeOptions,
    ) -> Result<CreateFileRangeResult> {
        check_share(share)?;

        let mut headers = HeaderMap::new();
        if let Some(value) = range.header_value() {
            headers.insert(header::RANGE, value.parse()?);
        }
        insert_access_condition(&mut headers, options.access_condition.as_ref())?;
        if let Some(md5) = &options.content_md5 {
            headers.insert(CONTENT_MD5, md5.parse()?);
        }
        headers.insert(X_MS_WRITE, HeaderValue::from_static(action));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(URL_ENCODED_CONTENT_TYPE),
        );

        let mut query = vec![(QP_COMP, "range".to_string())];
        push_timeout(&mut query, options.timeout);

        let resp = self
            .send(
                Method::PUT,
                &create_path(&[share, directory, file]),
                query,
                headers,
                content,
                StatusCode::CREATED,
            )
            .await?;
        CreateFileRangeResult::from_headers(resp.headers())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: Vec<(&str, String)>,
        headers: HeaderMap,
        body: Bytes,
        expected: StatusCode,
    ) -> Result<http::Response<Bytes>> {
        let mut url = format!("{}/{}", self.endpoint, path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(
                &form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(query)
                    .finish(),
            );
        }

        let mut req = http::Request::builder().method(method).uri(url).body(body)?;
        req.headers_mut().extend(headers);
        let length = HeaderValue::from(req.body().len());
        req.headers_mut().insert(header::CONTENT_LENGTH, length);
        req.headers_mut()
            .insert(X_MS_VERSION, HeaderValue::from_static(FILE_API_VERSION));
        req.headers_mut().insert(
            header::USER_AGENT,
            HeaderValue::from_static(constants::USER_AGENT),
        );

        let (mut parts, body) = req.into_parts();
        self.signer.sign(&mut parts).await?;

        debug!("sending {} {}", parts.method, parts.uri);
        let resp = self
            .signer
            .context()
            .http_send(http::Request::from_parts(parts, body))
            .await?;

        if resp.status() != expected {
            return Err(Error::unexpected_status(
                resp.status(),
                String::from_utf8_lossy(resp.body()),
            ));
        }
        Ok(resp)
    }
}

/// Build the request path out of share, directory and file names.
///
/// Each part is percent-encoded on its own. Slashes and backslashes inside a
/// part stay path separators, leading and trailing ones are dropped. Empty
/// parts are skipped.
pub fn create_path(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim_matches(|c| c == '/' || c == '\\'))
        .filter(|part| !part.is_empty())
        .map(|part| {
            utf8_percent_encode(part, PATH_ENCODE_SET)
                .to_string()
                .replace("%2F", "/")
                .replace("%5C", "/")
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn check_share(share: &str) -> Result<()> {
    if share.is_empty() {
        return Err(Error::request_invalid("share name must not be empty"));
    }
    Ok(())
}

fn push_timeout(query: &mut Vec<(&str, String)>, timeout: Option<Duration>) {
    if let Some(timeout) = timeout {
        // Whole seconds, rounded up.
        let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        query.push((QP_TIMEOUT, secs.to_string()));
    }
}

fn service_properties_query(timeout: Option<Duration>) -> Vec<(&'static str, String)> {
    let mut query = vec![
        (QP_REST_TYPE, "service".to_string()),
        (QP_COMP, "properties".to_string()),
    ];
    push_timeout(&mut query, timeout);
    query
}

fn insert_access_condition(
    headers: &mut HeaderMap,
    condition: Option<&AccessCondition>,
) -> Result<()> {
    if let Some(condition) = condition {
        let (name, value) = condition.header();
        headers.insert(name, value.parse()?);
    }
    Ok(())
}

fn allow_conflict(result: Result<FileResult>, what: &str) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(err) if err.status() == Some(StatusCode::CONFLICT) => {
            warn!("{what} already exists, reusing it");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_path() {
        let cases = vec![
            ("share only", vec!["myshare"], "myshare"),
            ("nested", vec!["myshare", "a/b", "c.txt"], "myshare/a/b/c.txt"),
            ("backslash", vec!["myshare", "a\\b", "c.txt"], "myshare/a/b/c.txt"),
            (
                "spaces",
                vec!["my share", "my dir", "my file.txt"],
                "my%20share/my%20dir/my%20file.txt",
            ),
            ("reserved", vec!["s", "d", "a+b&c=d~e"], "s/d/a%2Bb%26c%3Dd%7Ee"),
            ("unicode", vec!["s", "d", "文件"], "s/d/%E6%96%87%E4%BB%B6"),
            ("empty directory", vec!["s", "", "f"], "s/f"),
            ("safe characters", vec!["s", "d", "a-b_c.d"], "s/d/a-b_c.d"),
            ("trailing slash", vec!["s", "a/", "f"], "s/a/f"),
            ("leading slash", vec!["/s", "/a/b", "f"], "s/a/b/f"),
            ("backslash edges", vec!["s", "\\a\\", "f"], "s/a/f"),
            ("slash only", vec!["s", "/", "f"], "s/f"),
        ];

        for (name, parts, expected) in cases {
            assert_eq!(create_path(&parts), expected, "Failed for case: {name}");
        }
    }

    #[test]
    fn test_push_timeout() {
        let cases = vec![
            ("whole seconds", Duration::from_secs(30), "30"),
            ("sub second", Duration::from_millis(200), "1"),
            ("fraction", Duration::from_millis(1500), "2"),
            ("one nanosecond over", Duration::new(5, 1), "6"),
        ];

        for (name, timeout, expected) in cases {
            let mut query = Vec::new();
            push_timeout(&mut query, Some(timeout));
            assert_eq!(
                query,
                vec![(QP_TIMEOUT, expected.to_string())],
                "Failed for case: {name}"
            );
        }

        let mut query = Vec::new();
        push_timeout(&mut query, None);
        assert!(query.is_empty());
    }

    #[test]
    fn test_new_normalises_endpoint() {
        let signer = Signer::new(
            Context::new(),
            StaticCredentialProvider::new_shared_key("acct", "a2V5"),
            RequestSigner::new(),
        );

        let cases = vec![
            (
                "https://acct.file.core.windows.net/",
                "https://acct.file.core.windows.net",
            ),
            (
                "http://127.0.0.1:10004/devstoreaccount1/",
                "http://127.0.0.1:10004/devstoreaccount1",
            ),
            (
                "acct.file.core.windows.net",
                "https://acct.file.core.windows.net",
            ),
        ];

        for (input, expected) in cases {
            let client = FileClient::new(input, signer.clone());
            assert_eq!(client.endpoint(), expected, "Failed for case: {input}");
        }
    }

    #[test]
    fn test_from_connection_string_without_file_endpoint() {
        let err =
            FileClient::from_connection_string(Context::new(), "UseDevelopmentStorage=true")
                .unwrap_err();

        assert_eq!(err.kind(), azfile_core::ErrorKind::ConfigInvalid);
    }
}
