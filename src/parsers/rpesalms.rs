//! # rpesalms 格式解析与写出
//!
//! multiplet 写出的分波振幅文件 `rpesalms.dat`，以及下游 EDAC 使用的 `rpesalms.edac`。
//!
//! ## rpesalms.dat 格式说明
//! ```text
//!   12.500000   1  -1   1  0.12345679E+00 -0.98765432D-01
//! ```
//! 每个非空行一条记录：E_kin, l, m, s, Re(A), Im(A)，
//! 字段以空白分隔，允许 Fortran `D` 指数。
//!
//! ## rpesalms.edac 格式说明
//! ```text
//!        N
//! (F14.6, 3I4, 2E17.8)   # 每条记录一行
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs`, `commands/convert.rs`, `commands/inspect.rs` 使用
//! - 使用 `models/spectrum.rs`, `parsers/fortran.rs`

use crate::error::{MultipletError, Result};
use crate::models::{Spectrum, SpectrumRecord};
use crate::parsers::fortran;

use std::fs;
use std::path::Path;

/// `.edac` 中振幅的有效数字
const AMPLITUDE_DIGITS: usize = 8;

/// F14.6 能量列宽
const ENERGY_WIDTH: usize = 14;

/// I4 整数列最多容纳的字符数，保留一个前导空格以便按空白回读
const INDEX_CHARS: usize = 3;

/// 读取 rpesalms.dat
pub fn parse_dat_file(path: &Path) -> Result<Spectrum> {
    let content = read_text(path)?;
    parse_dat_content(&content, &path.display().to_string())
}

/// 从字符串解析 rpesalms.dat，`origin` 仅用于错误信息
pub fn parse_dat_content(content: &str, origin: &str) -> Result<Spectrum> {
    let records = numbered_records(content, origin)?
        .into_iter()
        .map(|(_, record)| record)
        .collect();
    Ok(Spectrum::new(records))
}

/// 带源文件行号的记录
fn numbered_records(content: &str, origin: &str) -> Result<Vec<(usize, SpectrumRecord)>> {
    let mut records = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        records.push((idx + 1, parse_record(line, origin, idx + 1)?));
    }

    Ok(records)
}

/// 读取 rpesalms.edac（首行为记录数）
pub fn parse_edac_file(path: &Path) -> Result<Spectrum> {
    let content = read_text(path)?;
    parse_edac_content(&content, &path.display().to_string())
}

pub fn parse_edac_content(content: &str, origin: &str) -> Result<Spectrum> {
    let mut lines = content
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty());

    let (header_idx, header) = lines
        .next()
        .ok_or_else(|| MultipletError::format(origin, 1, "missing record count"))?;
    let expected: usize = header.trim().parse().map_err(|_| {
        MultipletError::format(
            origin,
            header_idx + 1,
            format!("invalid record count '{}'", header.trim()),
        )
    })?;

    let mut records = Vec::with_capacity(expected);
    for (idx, line) in lines {
        records.push(parse_record(line, origin, idx + 1)?);
    }

    if records.len() != expected {
        return Err(MultipletError::format(
            origin,
            header_idx + 1,
            format!(
                "header announces {} records but {} were found",
                expected,
                records.len()
            ),
        ));
    }

    Ok(Spectrum::new(records))
}

/// 解析单行记录，`line_no` 从 1 开始
fn parse_record(line: &str, origin: &str, line_no: usize) -> Result<SpectrumRecord> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != SpectrumRecord::FIELD_COUNT {
        return Err(MultipletError::format(
            origin,
            line_no,
            format!(
                "expected {} fields, found {}",
                SpectrumRecord::FIELD_COUNT,
                parts.len()
            ),
        ));
    }

    let real = |i: usize, name: &str| {
        fortran::parse_real(parts[i]).ok_or_else(|| {
            MultipletError::format(origin, line_no, format!("invalid {} '{}'", name, parts[i]))
        })
    };
    let int = |i: usize, name: &str| {
        fortran::parse_int(parts[i]).ok_or_else(|| {
            MultipletError::format(origin, line_no, format!("invalid {} '{}'", name, parts[i]))
        })
    };

    Ok(SpectrumRecord {
        energy: real(0, "energy")?,
        l: int(1, "l")?,
        m: int(2, "m")?,
        spin: int(3, "spin")?,
        re: real(4, "Re(A)")?,
        im: real(5, "Im(A)")?,
    })
}

/// 检查记录能否写入 .edac 的定宽列而不与相邻列粘连
fn check_edac_columns(record: &SpectrumRecord) -> std::result::Result<(), String> {
    let energy = format!("{:.6}", record.energy);
    if energy.len() > ENERGY_WIDTH {
        return Err(format!(
            "energy {} does not fit the F14.6 column",
            energy
        ));
    }
    for (name, value) in [("l", record.l), ("m", record.m), ("spin", record.spin)] {
        if value.to_string().len() > INDEX_CHARS {
            return Err(format!(
                "{} = {} does not fit the I4 column (allowed -99..=999)",
                name, value
            ));
        }
    }
    Ok(())
}

/// 生成 .edac 文本；列宽需先经 `check_edac_columns` 确认
pub fn to_edac_string(spectrum: &Spectrum) -> String {
    let mut result = String::new();
    result.push_str(&format!("{:>8}\n", spectrum.len()));

    for r in &spectrum.records {
        result.push_str(&format!(
            "{:>14.6}{:>4}{:>4}{:>4}{:>17}{:>17}\n",
            r.energy,
            r.l,
            r.m,
            r.spin,
            fortran::format_e(r.re, AMPLITUDE_DIGITS),
            fortran::format_e(r.im, AMPLITUDE_DIGITS),
        ));
    }

    result
}

/// 写出 CSV（附带强度列）
pub fn write_csv(spectrum: &Spectrum, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["energy_eV", "l", "m", "spin", "re", "im", "intensity"])?;

    for r in &spectrum.records {
        wtr.write_record(&[
            r.energy.to_string(),
            r.l.to_string(),
            r.m.to_string(),
            r.spin.to_string(),
            r.re.to_string(),
            r.im.to_string(),
            r.intensity().to_string(),
        ])?;
    }

    wtr.flush().map_err(|e| MultipletError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// rpesalms.dat -> rpesalms.edac
///
/// 返回写出的记录数。相同输入重复转换得到逐字节相同的输出。
pub fn convert_rpesalms(input: &Path, output: &Path) -> Result<usize> {
    let content = read_text(input)?;
    let origin = input.display().to_string();

    let numbered = numbered_records(&content, &origin)?;
    for (line_no, record) in &numbered {
        check_edac_columns(record)
            .map_err(|reason| MultipletError::format(&origin, *line_no, reason))?;
    }

    let spectrum = Spectrum::new(numbered.into_iter().map(|(_, r)| r).collect());
    log::debug!(
        "parsed {} records from {}",
        spectrum.len(),
        input.display()
    );

    fs::write(output, to_edac_string(&spectrum)).map_err(|e| MultipletError::FileWriteError {
        path: output.display().to_string(),
        source: e,
    })?;

    Ok(spectrum.len())
}

fn read_text(path: &Path) -> Result<String> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE_DAT: &str = "  12.500000   1  -1   1  0.12345679E+00 -0.98765432D-01
  12.500000   1   0   1  0.50000000E+00  0.00000000E+00

  12.500000   3   2  -1 -0.25000000E-02  0.75000000E-03
  14.250000   1   1   1  0.10000000E+01 -0.20000000E+00
";

    #[test]
    fn test_parse_dat_content() {
        let spectrum = parse_dat_content(SAMPLE_DAT, "rpesalms.dat").unwrap();
        assert_eq!(spectrum.len(), 4);

        let first = spectrum.records[0];
        assert_eq!(first.energy, 12.5);
        assert_eq!((first.l, first.m, first.spin), (1, -1, 1));
        assert_eq!(first.re, 0.12345679);
        assert_eq!(first.im, -0.098765432);

        assert_eq!(spectrum.records[2].spin, -1);
    }

    #[test]
    fn test_short_line_reports_line_number() {
        let content = "12.5 1 0 1 0.5 0.0\n\n12.5 1 1 0.5 0.0\n";
        let err = parse_dat_content(content, "rpesalms.dat").unwrap_err();
        match err {
            MultipletError::FormatError { line, reason, .. } => {
                assert_eq!(line, 3);
                assert!(reason.contains("expected 6 fields, found 5"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_integer_field() {
        let err = parse_dat_content("12.5 1.5 0 1 0.5 0.0\n", "x").unwrap_err();
        assert!(matches!(err, MultipletError::FormatError { line: 1, .. }));
        assert!(err.to_string().contains("invalid l '1.5'"));
    }

    #[test]
    fn test_overflow_field_rejected() {
        let err = parse_dat_content("12.5 1 0 1 ************ 0.0\n", "x").unwrap_err();
        assert!(matches!(err, MultipletError::FormatError { line: 1, .. }));
    }

    #[test]
    fn test_edac_layout() {
        let spectrum = parse_dat_content(SAMPLE_DAT, "x").unwrap();
        let text = to_edac_string(&spectrum);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "       4");
        assert_eq!(
            lines[1],
            "     12.500000   1  -1   1   0.12345679E+00  -0.98765432E-01"
        );
        assert_eq!(lines.len(), 5);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_edac_preserves_values() {
        let spectrum = parse_dat_content(SAMPLE_DAT, "x").unwrap();
        let back = parse_edac_content(&to_edac_string(&spectrum), "x").unwrap();
        assert_eq!(back, spectrum);
    }

    #[test]
    fn test_edac_count_mismatch() {
        let err = parse_edac_content("       2\n 1.0 1 0 1 0.1 0.2\n", "x").unwrap_err();
        assert!(err.to_string().contains("announces 2 records but 1"));
    }

    #[test]
    fn test_convert_rpesalms_counts_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("rpesalms.dat");
        let first = dir.path().join("first.edac");
        let second = dir.path().join("second.edac");
        fs::write(&input, SAMPLE_DAT).unwrap();

        let n1 = convert_rpesalms(&input, &first).unwrap();
        let n2 = convert_rpesalms(&input, &second).unwrap();
        assert_eq!(n1, 4);
        assert_eq!(n2, 4);

        let a = fs::read(&first).unwrap();
        let b = fs::read(&second).unwrap();
        assert_eq!(a, b);

        let emitted = parse_edac_file(&first).unwrap();
        let source = parse_dat_file(&input).unwrap();
        assert_eq!(emitted.len(), source.len());
    }

    #[test]
    fn test_convert_rejects_values_wider_than_columns() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("rpesalms.dat");
        let output = dir.path().join("rpesalms.edac");

        fs::write(&input, "12.5 1 0 1 0.5 0.0\n\n12.5 1 -1000 1 0.5 0.0\n").unwrap();
        let err = convert_rpesalms(&input, &output).unwrap_err();
        match err {
            MultipletError::FormatError { line, reason, .. } => {
                assert_eq!(line, 3);
                assert!(reason.contains("m = -1000"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!output.exists());

        fs::write(&input, "12345678.5 1 0 1 0.5 0.0\n").unwrap();
        let err = convert_rpesalms(&input, &output).unwrap_err();
        assert!(err.to_string().contains("F14.6"));
    }

    #[test]
    fn test_widest_indices_read_back() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("rpesalms.dat");
        let output = dir.path().join("rpesalms.edac");
        fs::write(&input, "-99999.5 999 -99 -1 0.5 0.0\n").unwrap();

        convert_rpesalms(&input, &output).unwrap();
        let back = parse_edac_file(&output).unwrap();
        assert_eq!(back, parse_dat_file(&input).unwrap());
    }

    #[test]
    fn test_convert_missing_input() {
        let dir = tempdir().unwrap();
        let err = convert_rpesalms(&dir.path().join("nope.dat"), &dir.path().join("out.edac"))
            .unwrap_err();
        assert!(matches!(err, MultipletError::FileNotFound { .. }));
    }

    #[test]
    fn test_convert_unwritable_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("rpesalms.dat");
        fs::write(&input, SAMPLE_DAT).unwrap();

        let output = dir.path().join("missing-dir").join("rpesalms.edac");
        let err = convert_rpesalms(&input, &output).unwrap_err();
        assert!(matches!(err, MultipletError::FileWriteError { .. }));
    }

    #[test]
    fn test_write_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rpesalms.csv");
        let spectrum = parse_dat_content(SAMPLE_DAT, "x").unwrap();
        write_csv(&spectrum, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("energy_eV,l,m,spin,re,im,intensity")
        );
        assert_eq!(lines.count(), 4);
    }
}
