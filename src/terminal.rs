//! 終端機版的文件：標準輸出是容器，視窗列數是可視範圍，stdin 的指令是捲動事件。

use std::sync::atomic::{AtomicU64, Ordering};

use crate::feed::{
    indicator::{LoadingIndicator, MarkerIndicator, SHOW_CLASS},
    render::{QuoteBlock, QuoteContainer},
    scroll::ScrollPosition,
};

/// 把區塊印到標準輸出，並記錄目前文件的總列數
#[derive(Debug, Default)]
pub struct TerminalContainer {
    height: AtomicU64,
}

impl TerminalContainer {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn height(&self) -> u64 {
        self.height.load(Ordering::Acquire)
    }

    fn grow(&self, block: &QuoteBlock) {
        // 區塊之間空一列
        self.height
            .fetch_add(block.line_count() + 1, Ordering::AcqRel);
    }
}

impl QuoteContainer for TerminalContainer {
    fn append(&self, block: QuoteBlock) {
        println!("{}\n", block.text);
        self.grow(&block);
    }
}

/// 只在狀態真的改變時才輸出提示
#[derive(Debug, Default)]
pub struct TerminalIndicator {
    marker: MarkerIndicator,
}

impl TerminalIndicator {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn is_shown(&self) -> bool {
        self.marker.is_shown()
    }
}

impl LoadingIndicator for TerminalIndicator {
    fn show(&self) {
        if self.marker.add_class(SHOW_CLASS) {
            eprintln!("… loading");
        }
    }

    fn hide(&self) {
        self.marker.remove_class(SHOW_CLASS);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 往下一頁畫面（Enter 或 `j`）
    Down,
    /// 往上一頁畫面（`k`）
    Up,
    /// 跳到最底（`G`）
    Bottom,
    /// 結束（`q`）
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Command> {
        match line.trim() {
            "" | "j" => Some(Command::Down),
            "k" => Some(Command::Up),
            "G" => Some(Command::Bottom),
            "q" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// 終端機的可視範圍
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    scroll_top: u64,
    rows: u64,
}

impl Viewport {
    pub fn new(rows: u64) -> Self {
        Viewport {
            scroll_top: 0,
            rows: rows.max(1),
        }
    }

    /// 套用指令並回傳捲動後的位置
    pub fn apply(&mut self, command: Command, document_height: u64) -> ScrollPosition {
        let max_top = document_height.saturating_sub(self.rows);

        self.scroll_top = match command {
            Command::Down => self.scroll_top.saturating_add(self.rows),
            Command::Up => self.scroll_top.saturating_sub(self.rows),
            Command::Bottom => max_top,
            Command::Quit => self.scroll_top,
        }
        .min(max_top);

        ScrollPosition::new(self.scroll_top, document_height, self.rows)
    }
}
