use std::{
    error::Error,
    fmt,
    time::{Duration, Instant},
};

use anyhow::{anyhow, Result};
use once_cell::sync::{Lazy, OnceCell};
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::logging::Logger;

/// A singleton instance of the reqwest client.
static CLIENT: OnceCell<Client> = OnceCell::new();

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("http"));

/// The error returned when the server answers with a non-success status code.
///
/// It travels inside `anyhow::Error`; use `downcast_ref::<RequestError>()` to recover
/// the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestError {
    pub status: u16,
}

impl RequestError {
    pub fn new(status: u16) -> Self {
        RequestError { status }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "An error occurred: {}", self.status)
    }
}

impl Error for RequestError {}

/// Returns the reqwest client singleton instance or creates one if it doesn't exist.
///
/// No request timeout is configured: a hung request stays pending until the server answers.
fn get_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        // 已經安裝過 provider 時會回傳 Err，可以忽略
        let _ = rustls::crypto::ring::default_provider().install_default();

        Client::builder()
            // ===== 壓縮 =====
            .brotli(true)
            .gzip(true)
            .zstd(true)
            // ===== TCP 優化 =====
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            // ===== 連接池 =====
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow!("Failed to create reqwest client: {:?}", e))
    })
}

/// Performs an HTTP GET request and deserializes the JSON response into the specified type.
///
/// # Errors
///
/// * [`RequestError`] when the status code is not 2xx.
/// * Any transport or JSON parsing failure.
pub async fn get_json<RES: DeserializeOwned>(url: &str) -> Result<RES> {
    ensure_success(get_response(url, None).await?)?
        .json::<RES>()
        .await
        .map_err(|e| anyhow!("Error parsing response JSON: {:?}", e))
}

pub async fn get_response(url: &str, headers: Option<header::HeaderMap>) -> Result<Response> {
    send(Method::GET, url, headers).await
}

/// Turns a non-success status into a [`RequestError`].
pub fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        return Err(RequestError::new(status.as_u16()).into());
    }

    Ok(response)
}

/// Sends exactly one HTTP request. There is no retry: a failed attempt is logged and returned.
async fn send(method: Method, url: &str, headers: Option<header::HeaderMap>) -> Result<Response> {
    let visit_log = format!("{method}:{url}");
    let client = get_client()?;
    let mut rb: RequestBuilder = client.request(method, url);

    if let Some(h) = headers {
        rb = rb.headers(h);
    }

    let start = Instant::now();
    let res = rb.send().await;
    let elapsed = start.elapsed().as_millis();

    match res {
        Ok(response) => {
            LOGGER.info(format!(
                "{} {} {} ms",
                visit_log,
                response.status().as_u16(),
                elapsed
            ));
            Ok(response)
        }
        Err(why) => {
            LOGGER.error(format!("{} failed because {:?}. {} ms", visit_log, why, elapsed));
            Err(anyhow!("Failed to send request to {}: {:?}", url, why))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Deserialize, Debug)]
    struct Pong {
        pong: bool,
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        format!("http://{}", addr)
    }

    #[test]
    fn test_request_error_message() {
        let err = anyhow::Error::from(RequestError::new(404));

        assert_eq!(err.to_string(), "An error occurred: 404");
        assert_eq!(err.downcast_ref::<RequestError>().map(|e| e.status), Some(404));
    }

    #[tokio::test]
    async fn test_get_json() {
        let app = Router::new()
            .route("/ping", get(|| async { Json(json!({ "pong": true })) }))
            .route("/gone", get(|| async { (StatusCode::GONE, "gone") }))
            .route("/text", get(|| async { "pong" }));
        let base = serve(app).await;

        let pong = get_json::<Pong>(&format!("{}/ping", base)).await.expect("pong");
        assert!(pong.pong);

        let err = get_json::<Pong>(&format!("{}/gone", base))
            .await
            .expect_err("410 must fail");
        assert_eq!(err.downcast_ref::<RequestError>(), Some(&RequestError::new(410)));

        let err = get_json::<Pong>(&format!("{}/text", base))
            .await
            .expect_err("text body is not json");
        assert!(err.downcast_ref::<RequestError>().is_none());
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let res = get_response(&format!("http://{}/", addr), None).await;
        assert!(res.is_err());
    }
}
