//! # multiplet-kit - Multiplet RPES 前端工具
//!
//! 为外部 multiplet 程序（共振光电子/Auger 多重态谱计算）提供命令行前端。
//!
//! ## 子命令
//! - `compose` - 由参数生成定长格式输入卡片
//! - `run`     - 运行 multiplet，卡片经标准输入传入，转发输出
//! - `convert` - rpesalms.dat -> rpesalms.edac (或 CSV)
//! - `inspect` - rpesalms 文件概要
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── config.rs  (参数文件与可执行文件定位)
//!   │     ├── parsers/   (卡片校验, rpesalms 读写, Fortran 数值)
//!   │     ├── models/    (数据模型)
//!   │     ├── process/   (外部进程)
//!   │     └── batch/     (批量转换)
//!   ├── utils/      (输出、进度条、日志)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod config;
mod error;
mod models;
mod parsers;
mod process;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    utils::logging::init(cli.verbose);

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
