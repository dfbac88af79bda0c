//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `config.rs`, `parsers/`, `models/`, `process/`, `batch/`, `utils/`
//! - 子模块: compose, run, convert, inspect

pub mod compose;
pub mod convert;
pub mod inspect;
pub mod run;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Compose(args) => compose::execute(args),
        Commands::Run(args) => run::execute(args),
        Commands::Convert(args) => convert::execute(args),
        Commands::Inspect(args) => inspect::execute(args),
    }
}
