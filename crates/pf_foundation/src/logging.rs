// crates/pf_foundation/src/logging.rs

//! 日志初始化
//!
//! 库代码只通过 `log` 门面输出，由调用方决定是否安装后端。

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io::Write;

/// 初始化日志系统
///
/// # 参数
/// - `level`: 日志级别字符串（如 "info", "debug", "trace"），None 则使用 `RUST_LOG`
///
/// 重复调用是安全的，已安装的后端保持不变。
///
/// ```rust
/// pf_foundation::logging::init_logging(Some("debug"));
/// pf_foundation::logging::init_logging(Some("info"));
/// ```
pub fn init_logging(level: Option<&str>) {
    let mut builder = match level.and_then(|l| l.parse::<LevelFilter>().ok()) {
        Some(filter) => {
            let mut b = Builder::new();
            b.filter_level(filter);
            b
        }
        None => Builder::from_default_env(),
    };

    builder
        .target(Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{:<5} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        });

    // 已初始化时忽略
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice() {
        init_logging(Some("warn"));
        init_logging(Some("not-a-level"));
        log::warn!("logging initialized");
    }
}
