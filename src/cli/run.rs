//! # run 子命令 CLI 定义
//!
//! 在输出目录中运行 multiplet，输入卡片经标准输入传入。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/run.rs`

use clap::Args;
use std::path::PathBuf;

/// run 子命令参数
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Input deck file
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory (working directory of the multiplet process)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Path to the multiplet executable
    #[arg(long = "exec", env = "MULTIPLET_EXEC")]
    pub executable: Option<PathBuf>,

    /// Append the console output to this file
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Skip the deck layout check before launching
    #[arg(long, default_value_t = false)]
    pub no_check: bool,

    /// Extra arguments passed to the executable
    #[arg(last = true)]
    pub exec_args: Vec<String>,
}
