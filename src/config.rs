//! # 配置
//!
//! - 卡片参数文件 (TOML)：缺省的键沿用参考卡片的数值，可以只覆盖部分字段
//! - multiplet 可执行文件的定位
//!
//! ## 参数文件示例
//! ```toml
//! [energy]
//! e2p = "-639"
//!
//! [photon]
//! omega_start = "640."
//! omega_stop = "660."
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/compose.rs`, `commands/run.rs` 使用
//! - 使用 `models/deck.rs`
//! - 使用 `serde` + `toml`

use crate::error::{MultipletError, Result};
use crate::models::DeckParams;

use std::fs;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// multiplet 可执行文件名
pub const EXECUTABLE_NAME: &str = if cfg!(windows) {
    "multiplet.exe"
} else {
    "multiplet"
};

/// 读取参数文件并叠加到默认参数上
pub fn load_params(path: &Path) -> Result<DeckParams> {
    if !path.exists() {
        return Err(MultipletError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| MultipletError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_params(&content, &path.display().to_string())
}

pub fn parse_params(content: &str, origin: &str) -> Result<DeckParams> {
    let to_params_error = |e: toml::de::Error| MultipletError::ParamsError {
        path: origin.to_string(),
        source: e,
    };

    let overrides: Table = content.parse().map_err(to_params_error)?;

    let mut merged = match Value::try_from(DeckParams::default())? {
        Value::Table(t) => t,
        _ => return Err(MultipletError::Other("default parameters are not a table".into())),
    };
    merge_tables(&mut merged, overrides);

    Value::Table(merged).try_into().map_err(to_params_error)
}

/// 深度合并：`overrides` 中的子表逐键覆盖，其余值整体替换
fn merge_tables(base: &mut Table, overrides: Table) {
    for (key, value) in overrides {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(dst)), Value::Table(src)) => merge_tables(dst, src),
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// 默认参数的 TOML 模板
pub fn params_template() -> Result<String> {
    let body = toml::to_string_pretty(&DeckParams::default())?;
    Ok(format!(
        "# multiplet input deck parameters\n\
         # Values are written to the deck exactly as typed.\n\n{}",
        body
    ))
}

/// 定位 multiplet 可执行文件
///
/// 顺序：显式指定 -> 与本程序同目录 -> 交给 PATH 查找
pub fn resolve_executable(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        let candidate = dir.join(EXECUTABLE_NAME);
        if candidate.is_file() {
            return candidate;
        }
    }

    PathBuf::from(EXECUTABLE_NAME)
}
