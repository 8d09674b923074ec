use serde::{Deserialize, Serialize};

/// 一則名言
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub id: u64,
    pub quote: String,
    pub author: String,
}

/// `GET /quotes/` 的回應內容
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub data: Vec<Quote>,
    /// 伺服器回報的全部筆數（所有頁面加總）
    pub total: u64,
}
