use std::sync::RwLock;

use crate::feed::quote::Quote;

/// 一則名言渲染後的區塊
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteBlock {
    pub id: u64,
    /// `<blockquote class="quote">…</blockquote>`
    pub markup: String,
    /// 終端機顯示用
    pub text: String,
}

impl From<Quote> for QuoteBlock {
    fn from(quote: Quote) -> Self {
        QuoteBlock {
            id: quote.id,
            markup: format!(
                "<blockquote class=\"quote\"><span>{})</span> {} <footer>{}</footer></blockquote>",
                quote.id, quote.quote, quote.author
            ),
            text: format!("{}) {}\n    — {}", quote.id, quote.quote, quote.author),
        }
    }
}

impl QuoteBlock {
    /// 區塊在終端機上佔用的列數
    pub fn line_count(&self) -> u64 {
        self.text.lines().count() as u64
    }
}

/// 接收渲染結果的容器，只能附加，不會清除或取代既有的內容
pub trait QuoteContainer: Send + Sync {
    fn append(&self, block: QuoteBlock);
}

/// 依輸入順序把每則名言附加到容器
pub fn render_quotes(container: &dyn QuoteContainer, quotes: Vec<Quote>) {
    for quote in quotes {
        container.append(QuoteBlock::from(quote));
    }
}

/// 保存在記憶體中的容器
#[derive(Debug, Default)]
pub struct MemoryContainer {
    blocks: RwLock<Vec<QuoteBlock>>,
}

impl MemoryContainer {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn blocks(&self) -> Vec<QuoteBlock> {
        self.blocks
            .read()
            .map(|blocks| blocks.clone())
            .unwrap_or_default()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.blocks().iter().map(|b| b.id).collect()
    }

    pub fn len(&self) -> usize {
        self.blocks.read().map(|blocks| blocks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl QuoteContainer for MemoryContainer {
    fn append(&self, block: QuoteBlock) {
        if let Ok(mut blocks) = self.blocks.write() {
            blocks.push(block);
        }
    }
}
