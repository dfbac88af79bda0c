//! # inspect 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/inspect.rs`

use clap::Args;
use std::path::PathBuf;

/// inspect 子命令参数
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// rpesalms.dat or rpesalms.edac file
    pub file: PathBuf,

    /// Number of strongest partial waves to list
    #[arg(short = 'n', long, default_value_t = 10)]
    pub top_n: usize,
}
