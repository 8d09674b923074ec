pub mod config;
pub mod feed;
pub mod logging;
pub mod terminal;
pub mod util;
