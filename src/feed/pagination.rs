/// 判斷是否還有下一批名言可以抓
///
/// `start_index` 是該頁第一筆的位置（從 1 開始）。`total == 0` 代表還沒成功抓過，
/// 一律放行。比較用的是嚴格小於，`start_index == total` 時視為沒有更多。
pub fn has_more_quotes(page: u32, limit: u32, total: u64) -> bool {
    let start_index = u64::from(page.saturating_sub(1))
        .saturating_mul(u64::from(limit))
        .saturating_add(1);

    total == 0 || start_index < total
}

/// 分頁狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    /// 目前頁數，從 1 開始，只由捲動觸發遞增
    pub current_page: u32,
    /// 每頁筆數
    pub limit: u32,
    /// 伺服器回報的總筆數，0 表示還沒有成功的回應
    pub total: u64,
}

impl PaginationState {
    pub fn new(limit: u32) -> Self {
        PaginationState {
            current_page: 1,
            limit,
            total: 0,
        }
    }

    /// 目前頁數是否還有更多資料
    pub fn has_more(&self) -> bool {
        has_more_quotes(self.current_page, self.limit, self.total)
    }

    /// 記錄伺服器回報的總筆數，只增不減
    pub fn record_total(&mut self, total: u64) {
        if total > self.total {
            self.total = total;
        }
    }

    /// 前進到下一頁並回傳新的頁數
    pub fn advance(&mut self) -> u32 {
        self.current_page = self.current_page.saturating_add(1);
        self.current_page
    }
}
