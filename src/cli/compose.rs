//! # compose 子命令 CLI 定义
//!
//! 由参数文件生成 multiplet 输入卡片，或校验已有卡片。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/compose.rs`

use clap::Args;
use std::path::PathBuf;

/// compose 子命令参数
#[derive(Args, Debug)]
pub struct ComposeArgs {
    /// TOML parameter file (missing keys use the reference values)
    #[arg(short, long)]
    pub params: Option<PathBuf>,

    /// Output deck file
    #[arg(short, long, default_value = "multiplet_input.txt")]
    pub output: PathBuf,

    /// Print the deck to stdout instead of writing it
    #[arg(long, default_value_t = false)]
    pub preview: bool,

    /// Write the default parameters as a TOML template and exit
    #[arg(long, value_name = "FILE", conflicts_with_all = ["params", "preview", "check"])]
    pub template: Option<PathBuf>,

    /// Validate an existing deck file and exit
    #[arg(long, value_name = "FILE", conflicts_with_all = ["params", "preview"])]
    pub check: Option<PathBuf>,
}
