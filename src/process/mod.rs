//! # 外部进程模块
//!
//! 启动外部 multiplet 可执行文件并转发其输出。
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 使用
//! - 子模块: lock, runner

pub mod lock;
pub mod runner;

pub use runner::{ConsoleLine, MultipletRun, RunState, StreamKind};
