use std::{env, sync::Arc};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use quote_feed::{
    config::SETTINGS,
    feed::{FeedController, FeedOptions, HttpQuoteFetcher},
    logging,
    terminal::{Command, TerminalContainer, TerminalIndicator, Viewport},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let container = Arc::new(TerminalContainer::new());
    let controller = Arc::new(FeedController::new(
        Arc::new(HttpQuoteFetcher::new(SETTINGS.quote_api.base_url.clone())),
        container.clone(),
        Arc::new(TerminalIndicator::new()),
        FeedOptions::from(&SETTINGS.feed),
    ));

    logging::info_file_async(format!(
        "QuoteFeed 已啟動 Rust OS/Arch: {}/{} api: {} limit: {}",
        env::consts::OS,
        env::consts::ARCH,
        SETTINGS.quote_api.base_url,
        SETTINGS.feed.limit
    ));
    logging::info_console("Enter/j: down  k: up  G: bottom  q: quit");

    // 第一頁
    controller.start().await?;

    let mut viewport = Viewport::new(SETTINGS.feed.viewport_rows);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Some(Command::Quit) => break,
            Some(command) => command,
            None => {
                logging::info_console(format!("unknown command: {}", line.trim()));
                continue;
            }
        };

        let position = viewport.apply(command, container.height());
        // 不等待載入完成，下一個指令可以立即處理
        let _ = controller.on_scroll(position);
    }

    logging::info_file_async("QuoteFeed 結束");

    Ok(())
}
