//! # compose 命令实现
//!
//! 生成 multiplet 输入卡片。
//!
//! ## 功能
//! - 从 TOML 参数文件（或参考数值）排版 39 行卡片
//! - 预览到标准输出或写入文件
//! - 导出参数模板
//! - 校验已有卡片
//!
//! ## 依赖关系
//! - 使用 `cli/compose.rs` 定义的参数
//! - 使用 `config.rs`, `models/deck.rs`, `parsers/deck.rs`
//! - 使用 `utils/output.rs`

use crate::cli::compose::ComposeArgs;
use crate::config;
use crate::error::{MultipletError, Result};
use crate::models::{DeckParams, InputDeck};
use crate::parsers::deck;
use crate::utils::output;

use std::fs;
use std::path::Path;

/// 执行 compose 命令
pub fn execute(args: ComposeArgs) -> Result<()> {
    if let Some(ref path) = args.template {
        write_file(path, &config::params_template()?)?;
        output::print_success(&format!("Parameter template written to {}", path.display()));
        return Ok(());
    }

    if let Some(ref path) = args.check {
        deck::read_deck_file(path)?;
        output::print_success(&format!("{} is a valid multiplet input deck", path.display()));
        return Ok(());
    }

    let params = match args.params {
        Some(ref path) => {
            log::info!("loading parameters from {}", path.display());
            config::load_params(path)?
        }
        None => DeckParams::default(),
    };

    let text = compose_text(&params)?;

    if args.preview {
        println!("{}", text);
        return Ok(());
    }

    write_file(&args.output, &text)?;
    output::print_success(&format!("Input file saved to {}", args.output.display()));
    Ok(())
}

/// 排版卡片；晶体场矩阵不对称时给出警告
fn compose_text(params: &DeckParams) -> Result<String> {
    for (i, j) in params.asymmetric_crystal_field() {
        output::print_warning(&format!(
            "Crystal field matrix is not symmetric at ({}, {}) / ({}, {})",
            i, j, j, i
        ));
    }
    let deck = InputDeck::compose(params)?;
    log::debug!("composed deck with {} lines", deck.lines().len());
    Ok(deck.to_text())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| MultipletError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}
