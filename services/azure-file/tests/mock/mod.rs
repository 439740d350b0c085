//! A recording [`HttpSend`] answering from a queue of canned responses.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use azfile::FileClient;
use azfile_core::{Context, Error, HttpSend, Result};
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};

pub const KEY: &str = "a2V5LWZvci10ZXN0aW5nLW9ubHk=";
pub const ETAG: &str = "\"0x8D2A1B0C\"";
pub const LAST_MODIFIED: &str = "Wed, 21 Oct 2015 07:28:00 GMT";

/// A request as seen by the transport.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|v| v.to_str().unwrap())
    }
}

#[derive(Debug)]
enum Reply {
    Response(StatusCode, Vec<(&'static str, String)>, Bytes),
    TransportError,
}

#[derive(Debug, Clone, Default)]
pub struct MockHttpSend {
    requests: Arc<Mutex<Vec<Recorded>>>,
    replies: Arc<Mutex<VecDeque<Reply>>>,
}

impl MockHttpSend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response. Once the queue is empty every request gets a 201
    /// carrying [`ETAG`] and [`LAST_MODIFIED`].
    pub fn reply(&self, status: StatusCode, headers: &[(&'static str, &str)], body: &str) {
        self.replies.lock().unwrap().push_back(Reply::Response(
            status,
            headers.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            Bytes::from(body.to_string()),
        ));
    }

    /// Queue a 201 with the given ETag.
    pub fn reply_created(&self, etag: &str) {
        self.reply(
            StatusCode::CREATED,
            &[("etag", etag), ("last-modified", LAST_MODIFIED)],
            "",
        );
    }

    pub fn reply_transport_error(&self) {
        self.replies.lock().unwrap().push_back(Reply::TransportError);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();
        self.requests.lock().unwrap().push(Recorded {
            method: parts.method,
            uri: parts.uri.to_string(),
            headers: parts.headers,
            body,
        });

        let reply = self.replies.lock().unwrap().pop_front();
        let (status, headers, body) = match reply {
            Some(Reply::Response(status, headers, body)) => (status, headers, body),
            Some(Reply::TransportError) => {
                return Err(Error::transport("connection reset by peer"))
            }
            None => (
                StatusCode::CREATED,
                vec![
                    ("etag", ETAG.to_string()),
                    ("last-modified", LAST_MODIFIED.to_string()),
                ],
                Bytes::new(),
            ),
        };

        let mut builder = http::Response::builder().status(status);
        for (k, v) in headers {
            builder = builder.header(k, v);
        }
        Ok(builder.body(body).unwrap())
    }
}

/// A client for account `acct` sending through `mock`.
pub fn client(mock: &MockHttpSend) -> FileClient {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new().with_http_send(mock.clone());
    FileClient::from_connection_string(
        ctx,
        &format!("DefaultEndpointsProtocol=https;AccountName=acct;AccountKey={KEY}"),
    )
    .unwrap()
}
