//! Tests against a live file service.
//!
//! Enabled by `AZFILE_TEST=on`, with the account in
//! `AZFILE_CONNECTION_STRING` and a scratch share in `AZFILE_SHARE`.

use std::env;
use std::io::Write;

use azfile::{CreateFileOptions, FileClient, FileRange, FileServiceOptions};
use azfile_core::{Context, Result};
use azfile_http_send_reqwest::ReqwestHttpSend;
use http::StatusCode;
use log::{debug, warn};
use reqwest::Client;

fn init_client() -> Option<(FileClient, String)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("AZFILE_TEST").is_err() || env::var("AZFILE_TEST").unwrap() != "on" {
        return None;
    }

    let ctx = Context::new().with_http_send(ReqwestHttpSend::new(Client::new()));
    let client = FileClient::from_connection_string(
        ctx,
        &env::var("AZFILE_CONNECTION_STRING").expect("env AZFILE_CONNECTION_STRING must set"),
    )
    .expect("AZFILE_CONNECTION_STRING must be a valid connection string");
    let share = env::var("AZFILE_SHARE").expect("env AZFILE_SHARE must set");

    Some((client, share))
}

#[tokio::test]
async fn test_get_service_properties() -> Result<()> {
    let Some((client, _)) = init_client() else {
        warn!("AZFILE_TEST is not set, skipped");
        return Ok(());
    };

    let properties = client
        .get_service_properties(&FileServiceOptions::default())
        .await?;
    debug!("got service properties: {properties:?}");
    Ok(())
}

#[tokio::test]
async fn test_upload_file() -> Result<()> {
    let Some((client, share)) = init_client() else {
        warn!("AZFILE_TEST is not set, skipped");
        return Ok(());
    };

    let mut local = tempfile::NamedTempFile::new()?;
    local.write_all(&vec![b'x'; 5 * 1024 * 1024])?;
    local.flush()?;

    let result = client
        .upload_file(
            &share,
            "azfile test/uploads",
            "five mib.bin",
            local.path(),
            &CreateFileOptions::default(),
        )
        .await?;
    debug!("uploaded file: {result:?}");
    assert!(!result.etag.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_clear_file_range() -> Result<()> {
    let Some((client, share)) = init_client() else {
        warn!("AZFILE_TEST is not set, skipped");
        return Ok(());
    };

    client
        .create_file(&share, "", "cleared.bin", 1024, &CreateFileOptions::default())
        .await?;
    client
        .create_file_contents(
            &share,
            "",
            "cleared.bin",
            vec![1u8; 1024],
            &CreateFileOptions::default(),
        )
        .await?;
    client
        .clear_file_range(
            &share,
            "",
            "cleared.bin",
            FileRange::new(0, 511)?,
            &Default::default(),
        )
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_create_directory_in_missing_share() -> Result<()> {
    let Some((client, _)) = init_client() else {
        warn!("AZFILE_TEST is not set, skipped");
        return Ok(());
    };

    let err = client
        .create_directory(
            "azfile-share-that-does-not-exist",
            "dir",
            &FileServiceOptions::default(),
        )
        .await
        .unwrap_err();
    debug!("got error: {err}");
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    Ok(())
}
