//! # convert 子命令 CLI 定义
//!
//! rpesalms.dat -> rpesalms.edac 转换；目录输入时批量并行转换。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/convert.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 支持的输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Fixed-column EDAC amplitude file
    Edac,
    /// Comma separated values with an intensity column
    Csv,
}

impl OutputFormat {
    /// 输出文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Edac => "edac",
            OutputFormat::Csv => "csv",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// convert 子命令参数
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input rpesalms.dat file, or a directory of them
    pub input: PathBuf,

    /// Output file (or directory for directory input); defaults next to the input
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Target output format
    #[arg(short, long, value_enum, default_value = "edac")]
    pub format: OutputFormat,

    /// Glob pattern(s) for directory input, comma separated
    #[arg(short, long, default_value = "*.dat")]
    pub pattern: String,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Overwrite existing output files in directory mode
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
