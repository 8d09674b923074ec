use std::{env, fs, io, path::PathBuf, str::FromStr};

use anyhow::Result;
use config::{Config as config_config, File as config_file, FileFormat};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::logging;

const CONFIG_PATH: &str = "app.json";

pub const DEFAULT_BASE_URL: &str = "https://api.javascripttutorial.net/v1";
pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_SCROLL_THRESHOLD: u64 = 5;
pub const DEFAULT_VIEWPORT_ROWS: u64 = 24;

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct App {
    #[serde(default)]
    pub quote_api: QuoteApi,
    #[serde(default)]
    pub feed: Feed,
}

const QUOTE_API_BASE_URL: &str = "QUOTE_API_BASE_URL";

/// 報價來源 API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QuoteApi {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for QuoteApi {
    fn default() -> Self {
        QuoteApi {
            base_url: default_base_url(),
        }
    }
}

const QUOTE_API_LIMIT: &str = "QUOTE_API_LIMIT";
const QUOTE_FEED_SCROLL_THRESHOLD: &str = "QUOTE_FEED_SCROLL_THRESHOLD";
const QUOTE_FEED_SKIP_WHILE_LOADING: &str = "QUOTE_FEED_SKIP_WHILE_LOADING";
const QUOTE_FEED_VIEWPORT_ROWS: &str = "QUOTE_FEED_VIEWPORT_ROWS";

/// 捲動載入的行為設定
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Feed {
    /// 每頁筆數
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// 距離底部多少單位內就載入下一頁
    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold: u64,
    /// 還有載入中的頁面時忽略捲動事件（預設關閉）
    #[serde(default)]
    pub skip_while_loading: bool,
    /// 終端機視窗的列數
    #[serde(default = "default_viewport_rows")]
    pub viewport_rows: u64,
}

impl Default for Feed {
    fn default() -> Self {
        Feed {
            limit: DEFAULT_LIMIT,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            skip_while_loading: false,
            viewport_rows: DEFAULT_VIEWPORT_ROWS,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn default_scroll_threshold() -> u64 {
    DEFAULT_SCROLL_THRESHOLD
}

fn default_viewport_rows() -> u64 {
    DEFAULT_VIEWPORT_ROWS
}

pub static SETTINGS: Lazy<App> = Lazy::new(|| {
    App::get().unwrap_or_else(|why| {
        logging::error_console(format!(
            "I can't read the config context because {:?}",
            why
        ));
        App::default().override_with_env()
    })
});

impl App {
    fn get() -> Result<Self> {
        let config_path = config_path();
        if config_path.exists() {
            let text = read_text_file(config_path)?;
            return Ok(Self::parse(&text)?.override_with_env());
        }

        Ok(App::default().override_with_env())
    }

    /// 解析 json 格式的設定內容
    pub fn parse(text: &str) -> Result<Self> {
        let app: App = config_config::builder()
            .add_source(config_file::from_str(text, FileFormat::Json))
            .build()?
            .try_deserialize()?;

        Ok(app.sanitize())
    }

    /// 將來至於 env 的設定值覆蓋掉 json 上的設定值
    fn override_with_env(self) -> Self {
        self.override_with(|key| env::var(key).ok())
    }

    fn override_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base_url) = lookup(QUOTE_API_BASE_URL) {
            self.quote_api.base_url = base_url;
        }

        if let Some(limit) = lookup(QUOTE_API_LIMIT) {
            self.feed.limit = parse_or(&limit, DEFAULT_LIMIT);
        }

        if let Some(threshold) = lookup(QUOTE_FEED_SCROLL_THRESHOLD) {
            self.feed.scroll_threshold = parse_or(&threshold, DEFAULT_SCROLL_THRESHOLD);
        }

        if let Some(skip) = lookup(QUOTE_FEED_SKIP_WHILE_LOADING) {
            self.feed.skip_while_loading = parse_or(&skip, false);
        }

        if let Some(rows) = lookup(QUOTE_FEED_VIEWPORT_ROWS) {
            self.feed.viewport_rows = parse_or(&rows, DEFAULT_VIEWPORT_ROWS);
        }

        self.sanitize()
    }

    /// 每頁筆數與視窗列數必須大於零
    fn sanitize(mut self) -> Self {
        if self.feed.limit == 0 {
            logging::error_console(format!(
                "feed.limit must be greater than zero, fallback to {}",
                DEFAULT_LIMIT
            ));
            self.feed.limit = DEFAULT_LIMIT;
        }

        if self.feed.viewport_rows == 0 {
            self.feed.viewport_rows = DEFAULT_VIEWPORT_ROWS;
        }

        self
    }
}

fn parse_or<T: FromStr>(value: &str, default: T) -> T {
    T::from_str(value.trim()).unwrap_or(default)
}

/// 回傳設定檔的路徑
fn config_path() -> PathBuf {
    PathBuf::from(CONFIG_PATH)
}

/// 回傳指定路徑的文字檔的內容
pub(crate) fn read_text_file(path: PathBuf) -> Result<String, io::Error> {
    fs::read_to_string(path)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_default() {
        let app = App::default();

        assert_eq!(app.quote_api.base_url, DEFAULT_BASE_URL);
        assert_eq!(app.feed.limit, 10);
        assert_eq!(app.feed.scroll_threshold, 5);
        assert!(!app.feed.skip_while_loading);
    }

    #[test]
    fn test_parse_partial_json() {
        let app = App::parse(r#"{ "feed": { "limit": 25 } }"#).expect("parse");

        assert_eq!(app.feed.limit, 25);
        assert_eq!(app.feed.scroll_threshold, DEFAULT_SCROLL_THRESHOLD);
        assert_eq!(app.quote_api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_parse_rejects_zero_limit() {
        let app = App::parse(r#"{ "feed": { "limit": 0, "viewport_rows": 0 } }"#).expect("parse");

        assert_eq!(app.feed.limit, DEFAULT_LIMIT);
        assert_eq!(app.feed.viewport_rows, DEFAULT_VIEWPORT_ROWS);
    }

    #[test]
    fn test_override_with() {
        let env: HashMap<&str, &str> = HashMap::from([
            (QUOTE_API_BASE_URL, "http://127.0.0.1:8080/v1"),
            (QUOTE_API_LIMIT, " 20 "),
            (QUOTE_FEED_SCROLL_THRESHOLD, "not a number"),
            (QUOTE_FEED_SKIP_WHILE_LOADING, "true"),
        ]);

        let app = App::default().override_with(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(app.quote_api.base_url, "http://127.0.0.1:8080/v1");
        assert_eq!(app.feed.limit, 20);
        assert_eq!(app.feed.scroll_threshold, DEFAULT_SCROLL_THRESHOLD);
        assert!(app.feed.skip_while_loading);
        assert_eq!(app.feed.viewport_rows, DEFAULT_VIEWPORT_ROWS);
    }

    #[test]
    #[ignore]
    fn test_settings() {
        dotenv::dotenv().ok();
        logging::debug_file_async(format!("SETTINGS: {:#?}", *SETTINGS));
    }
}
