//! # convert 命令实现
//!
//! rpesalms.dat 转换为 rpesalms.edac（或 CSV）。
//!
//! ## 功能
//! - 单文件：默认输出到输入文件旁，同名换扩展名
//! - 目录：按 glob 模式收集文件并行转换，已存在的输出默认跳过
//!
//! ## 依赖关系
//! - 使用 `cli/convert.rs` 定义的参数
//! - 使用 `parsers/rpesalms.rs`, `batch/`
//! - 使用 `utils/output.rs`

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::convert::{ConvertArgs, OutputFormat};
use crate::error::{MultipletError, Result};
use crate::parsers::rpesalms;
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};

/// 执行 convert 命令
pub fn execute(args: ConvertArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(MultipletError::FileNotFound {
            path: args.input.display().to_string(),
        });
    }

    if args.input.is_dir() {
        return convert_directory(&args);
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input, args.format));

    let records = convert_file(&args.input, &output_path, args.format)?;
    output::print_conversion(
        &args.input.display().to_string(),
        &output_path.display().to_string(),
    );
    output::print_done(&format!("Conversion successful! {} records written", records));
    Ok(())
}

/// 输入文件旁的同名输出，例如 `run1/rpesalms.dat` -> `run1/rpesalms.edac`
pub fn default_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    input.with_extension(format.extension())
}

/// 转换单个文件，返回记录数
pub fn convert_file(input: &Path, output: &Path, format: OutputFormat) -> Result<usize> {
    match format {
        OutputFormat::Edac => rpesalms::convert_rpesalms(input, output),
        OutputFormat::Csv => {
            let spectrum = rpesalms::parse_dat_file(input)?;
            rpesalms::write_csv(&spectrum, output)?;
            Ok(spectrum.len())
        }
    }
}

fn convert_directory(args: &ConvertArgs) -> Result<()> {
    output::print_header(&format!("Converting rpesalms files to {} format", args.format));

    let output_dir = args.output.clone().unwrap_or_else(|| args.input.clone());
    fs::create_dir_all(&output_dir).map_err(|e| MultipletError::FileWriteError {
        path: output_dir.display().to_string(),
        source: e,
    })?;

    let files = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No files matched '{}' under {}",
            args.pattern,
            args.input.display()
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} files to convert", files.len()));

    let result = BatchRunner::new(args.jobs).run(files, |input| {
        let target = batch_output_path(&args.input, &output_dir, input, args.format);
        let name = input.display().to_string();

        if target.exists() && !args.overwrite {
            return ProcessResult::Skipped(name);
        }
        if let Some(parent) = target.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                return ProcessResult::Failed(name, e.to_string());
            }
        }

        match convert_file(input, &target, args.format) {
            Ok(_) => ProcessResult::Success(name),
            Err(e) => ProcessResult::Failed(name, e.to_string()),
        }
    })?;

    output::print_separator();
    output::print_done(&format!(
        "Converted {} file(s) to '{}' in '{}' ({} skipped, {} failed)",
        result.success,
        args.format,
        output_dir.display(),
        result.skipped,
        result.failed
    ));

    if result.failed > 0 {
        return Err(MultipletError::Other(format!(
            "{} of {} file(s) failed to convert",
            result.failed,
            result.total()
        )));
    }
    Ok(())
}

/// 批量模式下保持输入目录的相对结构
fn batch_output_path(
    input_root: &Path,
    output_root: &Path,
    input: &Path,
    format: OutputFormat,
) -> PathBuf {
    let relative = input.strip_prefix(input_root).unwrap_or(input);
    let relative = match relative.file_name() {
        Some(_) => relative.to_path_buf(),
        None => PathBuf::from("rpesalms"),
    };
    output_root.join(relative).with_extension(format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const DAT: &str = "12.5 1 0 1 0.5 0.0\n12.5 3 -2 -1 0.125D-01 -0.2\n";

    fn args(input: PathBuf) -> ConvertArgs {
        ConvertArgs {
            input,
            output: None,
            format: OutputFormat::Edac,
            pattern: "*.dat".to_string(),
            recursive: false,
            jobs: 2,
            overwrite: false,
        }
    }

    #[test]
    fn test_default_output_path() {
        let input = Path::new("scan/rpesalms.dat");
        assert_eq!(
            default_output_path(input, OutputFormat::Edac),
            PathBuf::from("scan/rpesalms.edac")
        );
        assert_eq!(
            default_output_path(input, OutputFormat::Csv),
            PathBuf::from("scan/rpesalms.csv")
        );
    }

    #[test]
    fn test_single_file_default_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("rpesalms.dat");
        fs::write(&input, DAT).unwrap();

        execute(args(input)).unwrap();
        let text = fs::read_to_string(dir.path().join("rpesalms.edac")).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_directory_mode() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("omega_652");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.path().join("a.dat"), DAT).unwrap();
        fs::write(nested.join("b.dat"), DAT).unwrap();
        let out = dir.path().join("edac");

        let mut batch = args(dir.path().to_path_buf());
        batch.recursive = true;
        batch.output = Some(out.clone());
        execute(batch).unwrap();

        assert!(out.join("a.edac").exists());
        assert!(out.join("omega_652").join("b.edac").exists());
    }

    #[test]
    fn test_directory_mode_reports_failures() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("good.dat"), DAT).unwrap();
        fs::write(dir.path().join("bad.dat"), "12.5 1 0\n").unwrap();

        let err = execute(args(dir.path().to_path_buf())).unwrap_err();
        assert!(err.to_string().contains("1 of 2"));
        assert!(dir.path().join("good.edac").exists());
        assert!(!dir.path().join("bad.edac").exists());
    }

    #[test]
    fn test_csv_format() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("rpesalms.dat");
        fs::write(&input, DAT).unwrap();
        let output = dir.path().join("alms.csv");

        let n = convert_file(&input, &output, OutputFormat::Csv).unwrap();
        assert_eq!(n, 2);
        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("12.5,3,-2,-1,0.0125,-0.2,"));
    }

    #[test]
    fn test_missing_input() {
        let dir = tempdir().unwrap();
        let err = execute(args(dir.path().join("none.dat"))).unwrap_err();
        assert!(matches!(err, MultipletError::FileNotFound { .. }));
    }
}
