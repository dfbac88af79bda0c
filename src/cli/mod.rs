//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `compose`: 生成 multiplet 输入卡片
//! - `run`: 运行 multiplet 并转发输出
//! - `convert`: rpesalms.dat -> rpesalms.edac
//! - `inspect`: 查看 rpesalms 文件概要
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: compose, run, convert, inspect

pub mod compose;
pub mod convert;
pub mod inspect;
pub mod run;

use clap::{ArgAction, Parser, Subcommand};

/// multiplet-kit - Multiplet RPES 输入/运行/转换工具
#[derive(Parser)]
#[command(name = "multiplet-kit")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(
    about = "Compose input decks, run the multiplet code and convert its rpesalms output",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase diagnostic output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Compose a multiplet input deck from parameters
    Compose(compose::ComposeArgs),

    /// Run the multiplet executable with an input deck on stdin
    Run(run::RunArgs),

    /// Convert rpesalms.dat files to rpesalms.edac (or CSV)
    Convert(convert::ConvertArgs),

    /// Summarize an rpesalms.dat or rpesalms.edac file
    Inspect(inspect::InspectArgs),
}
