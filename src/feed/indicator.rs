use std::{collections::HashSet, sync::RwLock};

/// 顯示中的 class 名稱
pub const SHOW_CLASS: &str = "show";

/// 載入中提示，`show` 與 `hide` 重複呼叫不會改變結果
pub trait LoadingIndicator: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

/// 以 class 標記表示可見狀態的提示元件
#[derive(Debug, Default)]
pub struct MarkerIndicator {
    classes: RwLock<HashSet<String>>,
}

impl MarkerIndicator {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn is_shown(&self) -> bool {
        self.has_class(SHOW_CLASS)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes
            .read()
            .map(|classes| classes.contains(class))
            .unwrap_or(false)
    }

    /// 回傳狀態是否有改變
    pub fn add_class(&self, class: &str) -> bool {
        self.classes
            .write()
            .map(|mut classes| classes.insert(class.to_string()))
            .unwrap_or(false)
    }

    /// 回傳狀態是否有改變
    pub fn remove_class(&self, class: &str) -> bool {
        self.classes
            .write()
            .map(|mut classes| classes.remove(class))
            .unwrap_or(false)
    }
}

impl LoadingIndicator for MarkerIndicator {
    fn show(&self) {
        self.add_class(SHOW_CLASS);
    }

    fn hide(&self) {
        self.remove_class(SHOW_CLASS);
    }
}
