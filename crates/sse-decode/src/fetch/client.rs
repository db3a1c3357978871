//! Request driver.

use futures_util::StreamExt;
use http::header;
use tokio::time::timeout;
use tracing::{debug, error, info};

use super::{config::FetchOptions, status::check_ok};
use crate::{
    decoder::SseDecoder,
    error::{FetchError, FetchResult},
    event_stream::EventStream,
};

/// Request `url` and stream its events to the registered callbacks.
///
/// Builds a one-off client honoring
/// [`connect_timeout`](FetchOptions::connect_timeout). Use
/// [`fetch_event_source_with`] to share a client between requests.
///
/// # Errors
///
/// Returns the error that ended the request, after passing it to the error
/// callback.
pub async fn fetch_event_source(url: &str, options: FetchOptions) -> FetchResult<()> {
    let client = match reqwest::Client::builder()
        .connect_timeout(options.connect_timeout)
        .build()
    {
        Ok(client) => client,
        Err(e) => return report(FetchError::Http(e), options),
    };
    fetch_event_source_with(&client, url, options).await
}

/// Like [`fetch_event_source`], with a caller-provided client.
///
/// # Errors
///
/// Returns the error that ended the request, after passing it to the error
/// callback.
pub async fn fetch_event_source_with(
    client: &reqwest::Client,
    url: &str,
    mut options: FetchOptions,
) -> FetchResult<()> {
    match drive(client, url, &mut options).await {
        Ok(()) => Ok(()),
        Err(err) => {
            error!(url, error = %err, "event source request failed");
            report(err, options)
        }
    }
}

fn report(err: FetchError, mut options: FetchOptions) -> FetchResult<()> {
    if let Some(on_error) = options.on_error.take() {
        on_error(&err);
    }
    Err(err)
}

async fn drive(client: &reqwest::Client, url: &str, options: &mut FetchOptions) -> FetchResult<()> {
    options.validate().map_err(FetchError::config)?;
    let url = reqwest::Url::parse(url)
        .map_err(|e| FetchError::config(format!("Invalid URL {url}: {e}")))?;

    let method = options.request_method();
    let mut request = client
        .request(method.clone(), url.clone())
        .headers(options.merged_headers());
    if let Some(body) = options.encoded_body()? {
        request = request.body(body);
    }

    info!(%url, %method, "event source connecting");
    let response = timeout(options.connect_timeout, request.send())
        .await
        .map_err(|_| FetchError::timeout(options.connect_timeout))??;
    let response = check_ok(response).await?;
    info!(%url, status = %response.status(), "event source opened");

    if let Some(on_open) = options.on_open.as_mut() {
        on_open(&response);
    }

    let Some(on_message) = options.on_message.as_mut() else {
        debug!("no message callback registered, leaving body unread");
        return Ok(());
    };

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let decoder = SseDecoder::for_content_type(content_type)?;

    let mut events = std::pin::pin!(EventStream::with_decoder(response.bytes_stream(), decoder));
    let mut dispatched: u64 = 0;
    while let Some(event) = events.next().await {
        on_message(event?);
        dispatched += 1;
    }

    info!(%url, events = dispatched, "event source closed");
    if let Some(on_close) = options.on_close.take() {
        on_close();
    }
    Ok(())
}
