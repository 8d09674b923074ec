use std::{
    env,
    fmt::Write as _,
    fs::{self, File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    thread,
};

use chrono::{format::DelayedFormat, Local};
use crossbeam_channel::{unbounded, Receiver, Sender};
use once_cell::sync::Lazy;

/// 存放 log 檔的目錄，可用環境變數覆蓋
pub const LOG_DIR: &str = "QUOTE_FEED_LOG_DIR";
const DEFAULT_LOG_DIR: &str = "log";
/// 批次寫入的緩衝大小
const BATCH_SIZE: usize = 2048;

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("default"));

/// 依等級分檔的非同步檔案 logger，每個等級各有一個寫檔線程
pub struct Logger {
    info_writer: Sender<String>,
    warn_writer: Sender<String>,
    error_writer: Sender<String>,
    debug_writer: Sender<String>,
}

impl Logger {
    pub fn new(log_name: &str) -> Self {
        Logger {
            info_writer: Self::create_writer(log_name, "info"),
            warn_writer: Self::create_writer(log_name, "warn"),
            error_writer: Self::create_writer(log_name, "error"),
            debug_writer: Self::create_writer(log_name, "debug"),
        }
    }

    pub fn info(&self, log: impl Into<String>) {
        self.send(log.into(), &self.info_writer);
    }

    pub fn warn(&self, log: impl Into<String>) {
        self.send(log.into(), &self.warn_writer);
    }

    pub fn error(&self, log: impl Into<String>) {
        self.send(log.into(), &self.error_writer);
    }

    pub fn debug(&self, log: impl Into<String>) {
        self.send(log.into(), &self.debug_writer);
    }

    fn send(&self, msg: String, writer: &Sender<String>) {
        if let Err(why) = writer.send(msg) {
            error_console(why.to_string());
        }
    }

    fn create_writer(log_name: &str, level: &str) -> Sender<String> {
        let (tx, rx) = unbounded::<String>();
        let log_path = Self::get_log_path(&format!("{}_{}", log_name, level));

        // 寫入檔案的操作使用另一個線程處理
        thread::spawn(move || {
            let file = log_path.as_deref().and_then(|path| {
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|why| {
                        error_console(format!(
                            "Failed to open log file({}) because {:?}",
                            path.display(),
                            why
                        ))
                    })
                    .ok()
            });

            match file {
                Some(file) => Self::drain_to_file(rx, file),
                // 開不了檔案就退回主控台，訊息不能丟
                None => {
                    for received in &rx {
                        info_console(received);
                    }
                }
            }
        });

        tx
    }

    fn drain_to_file(rx: Receiver<String>, file: File) {
        let mut writer = BufWriter::new(file);
        let mut line = String::with_capacity(BATCH_SIZE);

        for received in &rx {
            if writeln!(&mut line, "{} {}", Local::now().format("%F %X%.6f"), received).is_err() {
                continue;
            }

            if rx.is_empty() || line.len() >= BATCH_SIZE {
                if let Err(why) = writer.write_all(line.as_bytes()) {
                    error_console(format!(
                        "Failed to write to log file. because:{:#?}\r\nmsg:{}",
                        why, line
                    ));
                }

                if let Err(why) = writer.flush() {
                    error_console(format!("Failed to flush log file. because:{:#?}", why));
                }

                line.clear();
            }
        }
    }

    fn get_log_path(name: &str) -> Option<PathBuf> {
        let dir = env::var(LOG_DIR).unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
        let path = Path::new(&dir);

        if !path.exists() {
            fs::create_dir_all(path).ok()?;
        }

        Some(path.join(format!("{}_{}.log", Local::now().format("%Y-%m-%d"), name)))
    }
}

pub fn info_file_async(log: impl Into<String>) {
    LOGGER.info(log);
}

pub fn warn_file_async(log: impl Into<String>) {
    LOGGER.warn(log);
}

pub fn error_file_async(log: impl Into<String>) {
    LOGGER.error(log);
}

pub fn debug_file_async(log: impl Into<String>) {
    LOGGER.debug(log);
}

pub fn info_console(log: impl AsRef<str>) {
    println!(
        "{} Info {}",
        Local::now().format("%Y-%m-%d %H:%M:%S.%3f"),
        log.as_ref()
    );
}

pub fn error_console(log: impl AsRef<str>) {
    eprintln!(
        "{} Error {}",
        DelayedFormat::to_string(&Local::now().format("%Y-%m-%d %H:%M:%S.%3f")),
        log.as_ref()
    );
}
