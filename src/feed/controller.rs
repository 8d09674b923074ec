use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use anyhow::Result;
use scopeguard::defer;
use tokio::{sync::oneshot, task::JoinHandle};

use crate::{
    config,
    feed::{
        fetcher::QuoteFetcher,
        indicator::LoadingIndicator,
        pagination::{has_more_quotes, PaginationState},
        render::{render_quotes, QuoteContainer},
        scroll::ScrollPosition,
    },
    logging,
};

/// 一次載入的結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// 成功抓到並渲染了 `count` 筆，`total` 為更新後的總筆數
    Loaded { page: u32, count: usize, total: u64 },
    /// 依分頁規則已經沒有更多資料，沒有送出請求
    Exhausted { page: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedOptions {
    pub limit: u32,
    pub scroll_threshold: u64,
    /// 開啟後，尚有載入中的頁面時捲動事件會被忽略
    pub skip_while_loading: bool,
}

impl Default for FeedOptions {
    fn default() -> Self {
        FeedOptions::from(&config::Feed::default())
    }
}

impl From<&config::Feed> for FeedOptions {
    fn from(feed: &config::Feed) -> Self {
        FeedOptions {
            limit: feed.limit,
            scroll_threshold: feed.scroll_threshold,
            skip_while_loading: feed.skip_while_loading,
        }
    }
}

/// 無限捲動的控制器
///
/// 分頁狀態只在這裡被修改：成功載入後更新總筆數，捲動觸發時遞增頁數。
/// 由 [`FeedController::start`] 與 [`FeedController::on_scroll`] 發出的載入會依發出順序
/// 一個接一個執行，所以渲染順序與請求順序相同。
pub struct FeedController {
    fetcher: Arc<dyn QuoteFetcher>,
    container: Arc<dyn QuoteContainer>,
    indicator: Arc<dyn LoadingIndicator>,
    options: FeedOptions,
    state: Mutex<PaginationState>,
    /// 最後一個發出的載入完成時會關閉的通道
    queue_tail: Mutex<Option<oneshot::Receiver<()>>>,
    pending: AtomicUsize,
}

impl FeedController {
    pub fn new(
        fetcher: Arc<dyn QuoteFetcher>,
        container: Arc<dyn QuoteContainer>,
        indicator: Arc<dyn LoadingIndicator>,
        options: FeedOptions,
    ) -> Self {
        FeedController {
            fetcher,
            container,
            indicator,
            options,
            state: Mutex::new(PaginationState::new(options.limit)),
            queue_tail: Mutex::new(None),
            pending: AtomicUsize::new(0),
        }
    }

    pub fn options(&self) -> FeedOptions {
        self.options
    }

    /// 目前分頁狀態的快照
    pub fn pagination(&self) -> PaginationState {
        *self.state()
    }

    /// 是否還有已發出但尚未完成的載入
    pub fn is_loading(&self) -> bool {
        self.pending.load(Ordering::Acquire) > 0
    }

    /// 載入一頁，失敗時回傳錯誤，分頁狀態維持不變
    ///
    /// 不論結果為何，結束時一定會隱藏載入提示。
    pub async fn try_load_quotes(&self, page: u32, limit: u32) -> Result<LoadOutcome> {
        self.indicator.show();
        defer! {
            self.indicator.hide();
        }

        let total = self.state().total;
        if !has_more_quotes(page, limit, total) {
            return Ok(LoadOutcome::Exhausted { page });
        }

        let response = self.fetcher.fetch_page(page, limit).await?;
        let count = response.data.len();
        render_quotes(self.container.as_ref(), response.data);

        let mut state = self.state();
        state.record_total(response.total);

        Ok(LoadOutcome::Loaded {
            page,
            count,
            total: state.total,
        })
    }

    /// 載入一頁；錯誤只寫入 log，不往上拋，也不顯示在畫面上
    pub async fn load_quotes(&self, page: u32, limit: u32) -> Option<LoadOutcome> {
        match self.try_load_quotes(page, limit).await {
            Ok(outcome) => {
                logging::debug_file_async(format!("load_quotes({}, {}): {:?}", page, limit, outcome));
                Some(outcome)
            }
            Err(why) => {
                logging::error_file_async(why.to_string());
                None
            }
        }
    }

    /// 載入目前的頁面，啟動時呼叫一次
    pub fn start(self: &Arc<Self>) -> JoinHandle<Option<LoadOutcome>> {
        let page = self.state().current_page;
        self.spawn_load(page)
    }

    /// 處理捲動事件，不會阻塞呼叫端
    ///
    /// 接近底部且目前頁數還有更多資料時，先遞增頁數再排入該頁的載入。
    /// 連續的事件各自都會排入載入，不做合併。
    pub fn on_scroll(
        self: &Arc<Self>,
        position: ScrollPosition,
    ) -> Option<JoinHandle<Option<LoadOutcome>>> {
        if !position.is_near_bottom(self.options.scroll_threshold) {
            return None;
        }

        if self.options.skip_while_loading && self.is_loading() {
            return None;
        }

        let mut state = self.state();
        if !state.has_more() {
            return None;
        }

        let page = state.advance();
        Some(self.spawn_load(page))
    }

    fn spawn_load(self: &Arc<Self>, page: u32) -> JoinHandle<Option<LoadOutcome>> {
        let (done_tx, done_rx) = oneshot::channel::<()>();
        let previous = self.queue_tail().replace(done_rx);
        self.pending.fetch_add(1, Ordering::AcqRel);

        let limit = self.options.limit;
        let controller = scopeguard::guard(Arc::clone(self), |controller| {
            controller.pending.fetch_sub(1, Ordering::AcqRel);
        });

        tokio::spawn(async move {
            let _done = done_tx;
            let controller = controller;

            if let Some(previous) = previous {
                // 前一個載入結束時 sender 會被 drop
                let _ = previous.await;
            }

            controller.load_quotes(page, limit).await
        })
    }

    fn state(&self) -> MutexGuard<'_, PaginationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn queue_tail(&self) -> MutexGuard<'_, Option<oneshot::Receiver<()>>> {
        self.queue_tail.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
