use async_trait::async_trait;
use azfile_core::hash::{base64_decode, base64_hmac_sha256};
use azfile_core::time::{format_http_date, now, DateTime};
use azfile_core::{Context, Error, Result, SignRequest, SigningRequest};
use http::header::{self, HeaderName, HeaderValue};
use http::request::Parts;
use log::debug;

use crate::constants::{X_MS_DATE, X_MS_PREFIX};
use crate::credential::Credential;

/// Standard headers taking part in the string to sign, in signing order.
static SIGNED_HEADERS: [HeaderName; 11] = [
    header::CONTENT_ENCODING,
    header::CONTENT_LANGUAGE,
    header::CONTENT_LENGTH,
    HeaderName::from_static("content-md5"),
    header::CONTENT_TYPE,
    header::DATE,
    header::IF_MODIFIED_SINCE,
    header::IF_MATCH,
    header::IF_NONE_MATCH,
    header::IF_UNMODIFIED_SINCE,
    header::RANGE,
];

/// RequestSigner that implements Shared Key authorization for the file service.
///
/// - [Authorize with Shared Key](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key)
#[derive(Debug)]
pub struct RequestSigner {
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new request signer.
    pub fn new() -> Self {
        Self { time: None }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(Credential::SharedKey {
            account_name,
            account_key,
        }) = credential
        else {
            return Err(Error::request_invalid("credential is required"));
        };

        let key = base64_decode(account_key).map_err(|e| {
            Error::credential_invalid(format!(
                "account key of {account_name} is not valid base64"
            ))
            .with_source(e)
        })?;

        let mut ctx = SigningRequest::build(req)?;

        ctx.headers.insert(
            X_MS_DATE,
            format_http_date(self.time.unwrap_or_else(now)).parse()?,
        );

        let string_to_sign = string_to_sign(&ctx, account_name)?;
        debug!("string to sign: {}", &string_to_sign);
        let signature = base64_hmac_sha256(&key, string_to_sign.as_bytes());

        ctx.headers.insert(header::AUTHORIZATION, {
            let mut value: HeaderValue = format!("SharedKey {account_name}:{signature}").parse()?;
            value.set_sensitive(true);
            value
        });

        ctx.apply(req)
    }
}

/// Construct string to sign
///
/// ## Format
///
/// ```text
/// VERB + "\n" +
/// Content-Encoding + "\n" +
/// Content-Language + "\n" +
/// Content-Length + "\n" +
/// Content-MD5 + "\n" +
/// Content-Type + "\n" +
/// Date + "\n" +
/// If-Modified-Since + "\n" +
/// If-Match + "\n" +
/// If-None-Match + "\n" +
/// If-Unmodified-Since + "\n" +
/// Range + "\n" +
/// CanonicalizedHeaders + "\n" +
/// CanonicalizedResource;
/// ```
///
/// `Content-Length: 0` is written as an empty line, and the canonicalized
/// headers line is left out entirely when there are no `x-ms-` headers.
///
/// The result only depends on `req` and `account_name`.
pub fn string_to_sign(req: &SigningRequest, account_name: &str) -> Result<String> {
    let mut lines: Vec<String> = Vec::with_capacity(SIGNED_HEADERS.len() + 3);

    lines.push(req.method.as_str().to_string());
    for name in SIGNED_HEADERS.iter() {
        let value = req.header_get_or_default(name)?;
        if *name == header::CONTENT_LENGTH && value == "0" {
            lines.push(String::new());
        } else {
            lines.push(value.to_string());
        }
    }

    let headers = canonicalize_header(req)?;
    if !headers.is_empty() {
        lines.push(headers);
    }
    lines.push(canonicalize_resource(req, account_name));

    Ok(lines.join("\n"))
}

/// ## Reference
///
/// - [Constructing the canonicalized headers string](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key#constructing-the-canonicalized-headers-string)
fn canonicalize_header(req: &SigningRequest) -> Result<String> {
    Ok(SigningRequest::header_to_string(
        req.header_to_vec_with_prefix(X_MS_PREFIX)?,
        ":",
        "\n",
    ))
}

/// ## Reference
///
/// - [Constructing the canonicalized resource string](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key#constructing-the-canonicalized-resource-string)
fn canonicalize_resource(req: &SigningRequest, account_name: &str) -> String {
    let mut s = format!("/{}{}", account_name, req.path);
    for (k, v) in req.query_to_grouped_vec() {
        s.push('\n');
        s.push_str(&k);
        s.push(':');
        s.push_str(&v);
    }
    s
}
