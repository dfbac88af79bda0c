//! # run 命令实现
//!
//! 在输出目录中运行 multiplet，卡片经标准输入传入，输出实时转发到终端。
//!
//! ## 功能
//! - 校验输入卡片（可用 `--no-check` 跳过）
//! - 定位 multiplet 可执行文件
//! - 转发 stdout/stderr，可选同时写入日志文件
//! - 非零退出码作为错误返回
//!
//! ## 依赖关系
//! - 使用 `cli/run.rs` 定义的参数
//! - 使用 `config.rs`, `parsers/deck.rs`, `process/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::run::RunArgs;
use crate::config;
use crate::error::{MultipletError, Result};
use crate::parsers::deck;
use crate::process::{MultipletRun, RunState, StreamKind};
use crate::utils::{output, progress};

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// 执行 run 命令
pub fn execute(args: RunArgs) -> Result<()> {
    output::print_header("Running Multiplet");

    let input = args
        .input
        .as_deref()
        .ok_or_else(|| MultipletError::InvalidArgument("Please select an input file".into()))?;
    let output_dir = args.output_dir.as_deref().ok_or_else(|| {
        MultipletError::InvalidArgument("Please select an output directory".into())
    })?;

    let deck_text = if args.no_check {
        read_input(input)?
    } else {
        deck::read_deck_file(input)?
    };

    let executable = config::resolve_executable(args.executable.as_deref());
    output::print_info(&format!("Executable: {}", executable.display()));
    output::print_info(&format!("Output directory: {}", output_dir.display()));

    let mut log_file = match args.log {
        Some(ref path) => Some(open_log(path)?),
        None => None,
    };

    let mut run = MultipletRun::new(executable, output_dir).args(&args.exec_args);
    let spinner = progress::create_spinner("multiplet running");

    let mut log_error = None;
    let state = run.execute(&deck_text, |line| {
        spinner.suspend(|| output::print_console(line));
        if let Some(file) = log_file.as_mut() {
            let tag = match line.stream {
                StreamKind::Stdout => "",
                StreamKind::Stderr => "[stderr] ",
            };
            if let Err(e) = writeln!(file, "{}{}", tag, line.text) {
                log_error.get_or_insert(e);
            }
        }
    });
    spinner.finish_and_clear();
    state?;

    if let (Some(e), Some(path)) = (log_error, args.log.as_ref()) {
        output::print_warning(&format!("Console log {} is incomplete: {}", path.display(), e));
    }

    match run.state() {
        RunState::Succeeded => {
            output::print_done("Multiplet calculation completed successfully!");
            Ok(())
        }
        failed => failed.into_result(),
    }
}

fn read_input(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(MultipletError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    fs::read_to_string(path).map_err(|e| MultipletError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })
}

fn open_log(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| MultipletError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })
}
