use anyhow::Result;
use async_trait::async_trait;

use crate::{feed::quote::PageResponse, util::http};

pub use crate::util::http::RequestError;

/// 取得一頁名言
#[async_trait]
pub trait QuoteFetcher: Send + Sync {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<PageResponse>;
}

/// 透過 HTTP 呼叫 `GET {base}/quotes/?page={page}&limit={limit}`
///
/// 每次呼叫只送出一個請求，沒有重試也沒有逾時；不要讓同一個呼叫端重疊呼叫。
#[derive(Debug, Clone)]
pub struct HttpQuoteFetcher {
    base_url: String,
}

impl HttpQuoteFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpQuoteFetcher {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl QuoteFetcher for HttpQuoteFetcher {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<PageResponse> {
        http::get_json::<PageResponse>(&quotes_url(&self.base_url, page, limit)).await
    }
}

pub fn quotes_url(base: &str, page: u32, limit: u32) -> String {
    format!(
        "{}/quotes/?page={}&limit={}",
        base.trim_end_matches('/'),
        page,
        limit
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{
        extract::Query,
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::get,
        Json, Router,
    };
    use serde_json::json;

    use super::*;
    use crate::{config::DEFAULT_BASE_URL, logging};

    async fn quotes(Query(params): Query<HashMap<String, String>>) -> Response {
        let page: u64 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
        let limit: u64 = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(0);

        if page == 0 || page > 3 {
            return (StatusCode::NOT_FOUND, "no such page").into_response();
        }

        let data: Vec<_> = ((page - 1) * limit + 1..=page * limit)
            .map(|id| json!({ "id": id, "quote": format!("quote {}", id), "author": "anonymous" }))
            .collect();

        Json(json!({ "data": data, "total": 25 })).into_response()
    }

    async fn serve() -> String {
        let app = Router::new().route("/v1/quotes/", get(quotes));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        format!("http://{}/v1", addr)
    }

    #[test]
    fn test_quotes_url() {
        assert_eq!(
            quotes_url(DEFAULT_BASE_URL, 1, 10),
            "https://api.javascripttutorial.net/v1/quotes/?page=1&limit=10"
        );
        assert_eq!(
            quotes_url("http://localhost/v1/", 3, 5),
            "http://localhost/v1/quotes/?page=3&limit=5"
        );
    }

    #[tokio::test]
    async fn test_fetch_page() {
        let fetcher = HttpQuoteFetcher::new(serve().await);

        let res = fetcher.fetch_page(2, 10).await.expect("page 2");
        assert_eq!(res.total, 25);
        assert_eq!(res.data.len(), 10);
        assert_eq!(res.data.first().map(|q| q.id), Some(11));
        assert_eq!(res.data.last().map(|q| q.id), Some(20));
    }

    #[tokio::test]
    async fn test_fetch_page_not_found() {
        let fetcher = HttpQuoteFetcher::new(serve().await);

        let err = fetcher.fetch_page(4, 10).await.expect_err("404");
        assert_eq!(err.downcast_ref::<RequestError>().map(|e| e.status), Some(404));
        assert_eq!(err.to_string(), "An error occurred: 404");
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch_page_remote() {
        dotenv::dotenv().ok();
        logging::debug_file_async("開始 test_fetch_page_remote");

        match HttpQuoteFetcher::new(DEFAULT_BASE_URL).fetch_page(1, 10).await {
            Ok(res) => {
                logging::debug_file_async(format!("total: {} data: {:#?}", res.total, res.data));
            }
            Err(why) => {
                logging::debug_file_async(format!("Failed to fetch_page because {:?}", why));
            }
        }

        logging::debug_file_async("結束 test_fetch_page_remote");
    }
}
