//! 無限捲動的名言列表：抓取、渲染、載入提示與捲動觸發。

/// 載入流程與分頁狀態
pub mod controller;
/// 呼叫名言 API
pub mod fetcher;
/// 載入中提示
pub mod indicator;
/// 分頁規則
pub mod pagination;
pub mod quote;
/// 名言渲染與容器
pub mod render;
/// 捲動位置
pub mod scroll;

pub use controller::{FeedController, FeedOptions, LoadOutcome};
pub use fetcher::{HttpQuoteFetcher, QuoteFetcher, RequestError};
pub use indicator::{LoadingIndicator, MarkerIndicator};
pub use pagination::{has_more_quotes, PaginationState};
pub use quote::{PageResponse, Quote};
pub use render::{render_quotes, MemoryContainer, QuoteBlock, QuoteContainer};
pub use scroll::ScrollPosition;
