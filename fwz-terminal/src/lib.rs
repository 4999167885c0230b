//! fwz 核销终端
//!
//! 商户核销终端的应用核心：
//! - core: 读卡桥接、导航栈、分页、核销流程、错误提示
//! - screens: 每个页面一个控制器，由 [`AppContext`] 驱动
//! - commands: `fwz` 命令行入口使用的处理函数

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub use fwz_client;
pub use shared;

pub mod commands;
pub mod config;
pub mod core;
pub mod events;
pub mod screens;

pub use crate::config::{AppSettings, Cli};
pub use crate::core::{AppContext, AppError, CardBridge, Navigator, Route};

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f")
        )
    }
}

/// Initialize logging: daily rolling file in `log_dir` plus stderr.
///
/// The returned guard flushes the file writer on drop and must be kept alive
/// for the lifetime of the process.
pub fn init_logging(log_dir: &Path, filter: Option<&str>) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = rolling::daily(log_dir, "fwz-terminal.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = if let Some(filter) = filter {
        EnvFilter::new(filter)
    } else if let Ok(from_env) = EnvFilter::try_from_default_env() {
        from_env
    } else if cfg!(debug_assertions) {
        EnvFilter::new("info,fwz_terminal=debug,fwz_client=debug")
    } else {
        EnvFilter::new("warn,fwz_terminal=info")
    };

    let file_layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_writer(non_blocking_file);

    // stdout carries command output, logs go to stderr
    let stderr_layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_ansi(true)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(std::io::Error::other)?;

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        let msg = info.to_string();
        eprintln!("!!! APPLICATION PANIC !!!\nMessage: {}\nBacktrace:\n{}", msg, backtrace);
        tracing::error!(target: "panic", message = %msg, backtrace = %backtrace, "panic occurred");
    }));

    tracing::info!(path = %log_dir.display(), "Tracing initialized successfully");
    Ok(guard)
}
