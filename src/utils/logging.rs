//! # 日志初始化
//!
//! 诊断信息走 `log` + `env_logger`，面向用户的消息仍由 `output` 打印。
//! `-v` 次数决定默认级别，`RUST_LOG` 可覆盖。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用

use log::LevelFilter;

/// `-v` 次数到日志级别
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(verbosity: u8) {
    env_logger::Builder::new()
        .filter_level(level_for(verbosity))
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0), LevelFilter::Warn);
        assert_eq!(level_for(2), LevelFilter::Debug);
        assert_eq!(level_for(9), LevelFilter::Trace);
    }
}
