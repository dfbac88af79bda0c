//! # 输入卡片校验
//!
//! 读取已有的 multiplet 输入卡片，按 39 行布局逐行核对字段数和数值语法。
//! 用于 `compose --check` 以及 `run` 启动前的检查。
//!
//! ## 依赖关系
//! - 被 `commands/compose.rs`, `commands/run.rs` 使用
//! - 使用 `models/deck.rs` 的行布局

use crate::error::{MultipletError, Result};
use crate::models::deck::{deck_layout, FieldKind, DECK_LINES};
use crate::parsers::fortran;

use std::fs;
use std::path::Path;

/// 读取并校验卡片文件，返回文件内容
pub fn read_deck_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(MultipletError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| MultipletError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    validate_deck(&content, &path.display().to_string())?;
    Ok(content)
}

/// 校验卡片文本；末尾的空行被忽略
pub fn validate_deck(content: &str, origin: &str) -> Result<()> {
    let mut lines: Vec<&str> = content.lines().collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    let layout = deck_layout();

    for (idx, (line, spec)) in lines.iter().zip(&layout).enumerate() {
        let line_no = idx + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if tokens.len() != spec.arity {
            return Err(MultipletError::format(
                origin,
                line_no,
                format!(
                    "{}: expected {} fields, found {}",
                    spec.label,
                    spec.arity,
                    tokens.len()
                ),
            ));
        }

        for (i, token) in tokens.into_iter().enumerate() {
            let ok = match spec.field_kind(i) {
                FieldKind::Real => fortran::is_real_literal(token),
                FieldKind::Integer => fortran::is_integer_literal(token),
            };
            if !ok {
                return Err(MultipletError::format(
                    origin,
                    line_no,
                    format!("{}: invalid value '{}'", spec.label, token),
                ));
            }
        }
    }

    if lines.len() != DECK_LINES {
        let line_no = lines.len().min(DECK_LINES) + 1;
        return Err(MultipletError::format(
            origin,
            line_no,
            format!("expected {} lines, found {}", DECK_LINES, lines.len()),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeckParams, InputDeck};
    use tempfile::tempdir;

    fn default_text() -> String {
        InputDeck::compose(&DeckParams::default())
            .unwrap()
            .to_text()
    }

    #[test]
    fn test_composed_deck_is_valid() {
        validate_deck(&default_text(), "deck").unwrap();
        // 附加末尾换行同样可以接受
        validate_deck(&format!("{}\n\n", default_text()), "deck").unwrap();
    }

    #[test]
    fn test_short_line_names_line_number() {
        let text = default_text().replacen("0 3.6848 0 2.0936", "0 3.6848 0", 1);
        let err = validate_deck(&text, "deck").unwrap_err();
        match err {
            MultipletError::FormatError { line, reason, .. } => {
                assert_eq!(line, 16);
                assert!(reason.starts_with("G_k(2p,3d)"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_lines() {
        let text: Vec<String> = default_text().lines().take(30).map(String::from).collect();
        let err = validate_deck(&text.join("\n"), "deck").unwrap_err();
        assert!(matches!(err, MultipletError::FormatError { line: 31, .. }));
    }

    #[test]
    fn test_extra_lines() {
        let text = format!("{}\n1 2 3", default_text());
        let err = validate_deck(&text, "deck").unwrap_err();
        assert!(err.to_string().contains("expected 39 lines, found 40"));
    }

    #[test]
    fn test_integer_line() {
        let text = default_text().replacen("\n5\n", "\n5.0\n", 1);
        let err = validate_deck(&text, "deck").unwrap_err();
        assert!(matches!(err, MultipletError::FormatError { line: 9, .. }));
    }

    #[test]
    fn test_gamma_flag_must_be_integer() {
        let text = default_text().replacen("2. 0.4 0\n", "2. 0.4 0.\n", 1);
        assert_ne!(text, default_text());
        let err = validate_deck(&text, "deck").unwrap_err();
        match err {
            MultipletError::FormatError { line, reason, .. } => {
                assert_eq!(line, 8);
                assert!(reason.contains("invalid value '0.'"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // compose 拒绝同样的值
        let mut params = DeckParams::default();
        params.photon.gamma_flag = "0.".to_string();
        assert!(InputDeck::compose(&params).is_err());
    }

    #[test]
    fn test_read_deck_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("multiplet_input.txt");
        fs::write(&path, default_text()).unwrap();
        assert_eq!(read_deck_file(&path).unwrap(), default_text());

        let missing = read_deck_file(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(missing, MultipletError::FileNotFound { .. }));
    }
}
