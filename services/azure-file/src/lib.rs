//! Signed REST client for Azure File storage.
//!
//! This crate provides:
//!
//! - connection string resolution into [`Settings`], driven by the rule
//!   matcher in [`specification`]
//! - Shared Key signing of requests through [`RequestSigner`]
//! - [`FileClient`], which builds, signs and sends file service requests and
//!   uploads content in ranges of at most 4 MiB
//!
//! ## Example
//!
//! ```no_run
//! use azfile::{CreateFileOptions, FileClient};
//! use azfile_core::{Context, OsEnv, Result};
//! use azfile_http_send_reqwest::ReqwestHttpSend;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     let client = FileClient::from_connection_string(
//!         ctx,
//!         "DefaultEndpointsProtocol=https;AccountName=myaccount;AccountKey=bXlrZXk=",
//!     )?;
//!
//!     let result = client
//!         .upload_file("myshare", "reports", "q3.csv", "/tmp/q3.csv", &CreateFileOptions::default())
//!         .await?;
//!     println!("uploaded, etag: {}", result.etag);
//!
//!     Ok(())
//! }
//! ```

mod constants;

pub mod specification;

mod settings;
pub use settings::Settings;

mod connection_string;
pub use connection_string::{parse_into_tokens, SettingsResolver};

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

mod sign_request;
pub use sign_request::{string_to_sign, RequestSigner};

mod range;
pub use range::FileRange;

mod options;
pub use options::{AccessCondition, CreateFileOptions, CreateFileRangeOptions, FileServiceOptions};

mod result;
pub use result::{CreateFileRangeResult, FileResult};

mod service_properties;
pub use service_properties::{Cors, CorsRule, Metrics, RetentionPolicy, ServiceProperties};

mod upload;
pub use upload::{Chunker, Content};

mod client;
pub use client::{create_path, FileClient};
