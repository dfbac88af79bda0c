//! # inspect 命令实现
//!
//! 读取 rpesalms.dat 或 rpesalms.edac，打印概要和最强分波表格。
//!
//! ## 依赖关系
//! - 使用 `cli/inspect.rs` 定义的参数
//! - 使用 `parsers/rpesalms.rs`, `models/spectrum.rs`
//! - 使用 `utils/output.rs`, `tabled`

use crate::cli::inspect::InspectArgs;
use crate::error::Result;
use crate::models::Spectrum;
use crate::parsers::{fortran, rpesalms};
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

/// 表格中的一行
#[derive(Debug, Clone, Tabled)]
struct RecordRow {
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "E (eV)")]
    energy: String,
    #[tabled(rename = "l")]
    l: i32,
    #[tabled(rename = "m")]
    m: i32,
    #[tabled(rename = "s")]
    spin: i32,
    #[tabled(rename = "|A|²")]
    intensity: String,
    #[tabled(rename = "Share (%)")]
    share: String,
}

/// 执行 inspect 命令
pub fn execute(args: InspectArgs) -> Result<()> {
    let spectrum = load_spectrum(&args.file)?;

    output::print_header(&format!("Summary of {}", args.file.display()));

    if spectrum.is_empty() {
        output::print_warning("File contains no records.");
        return Ok(());
    }

    output::print_field("Records", &spectrum.len().to_string());
    output::print_field("Energy points", &spectrum.distinct_energies().to_string());
    if let Some((lo, hi)) = spectrum.energy_range() {
        output::print_field("Energy range (eV)", &format!("{:.4} .. {:.4}", lo, hi));
    }
    if let Some((lo, hi)) = spectrum.l_range() {
        output::print_field("l range", &format!("{} .. {}", lo, hi));
    }
    let total = spectrum.total_intensity();
    output::print_field("Total |A|²", &fortran::format_e(total, 6));

    if args.top_n > 0 {
        println!();
        println!("{}", Table::new(strongest_rows(&spectrum, args.top_n)));
    }

    Ok(())
}

/// 按扩展名选择解析器：`.edac` 为目标格式，其余按 rpesalms.dat 处理
fn load_spectrum(path: &Path) -> Result<Spectrum> {
    let is_edac = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("edac"));

    if is_edac {
        rpesalms::parse_edac_file(path)
    } else {
        rpesalms::parse_dat_file(path)
    }
}

fn strongest_rows(spectrum: &Spectrum, n: usize) -> Vec<RecordRow> {
    let total = spectrum.total_intensity();
    spectrum
        .strongest(n)
        .into_iter()
        .enumerate()
        .map(|(i, r)| RecordRow {
            rank: i + 1,
            energy: format!("{:.4}", r.energy),
            l: r.l,
            m: r.m,
            spin: r.spin,
            intensity: fortran::format_e(r.intensity(), 6),
            share: if total > 0.0 {
                format!("{:.2}", 100.0 * r.intensity() / total)
            } else {
                "-".to_string()
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const DAT: &str = "12.5 1 0 1 0.6 0.0\n12.5 3 -2 -1 0.0 0.8\n";

    #[test]
    fn test_strongest_rows() {
        let spectrum = rpesalms::parse_dat_content(DAT, "x").unwrap();
        let rows = strongest_rows(&spectrum, 5);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].l, 3);
        assert_eq!(rows[0].share, "64.00");
        assert_eq!(rows[1].share, "36.00");
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempdir().unwrap();
        let dat = dir.path().join("rpesalms.dat");
        let edac = dir.path().join("rpesalms.edac");
        fs::write(&dat, DAT).unwrap();
        rpesalms::convert_rpesalms(&dat, &edac).unwrap();

        let a = load_spectrum(&dat).unwrap();
        let b = load_spectrum(&edac).unwrap();
        assert_eq!(a, b);

        execute(InspectArgs {
            file: edac,
            top_n: 3,
        })
        .unwrap();
    }
}
