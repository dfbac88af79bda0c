//! # Fortran 数值读写工具
//!
//! multiplet 由 Fortran 写出数据，这里处理两边的数值约定：
//! - 读取：接受 `D` 指数 (`1.0D-03`)、省略整数位 (`-.19047`)、省略小数位 (`90.`)
//! - 写出：`Ew.d` 描述符风格 (`0.12345679E+01`)
//!
//! ## 依赖关系
//! - 被 `parsers/rpesalms.rs`, `parsers/deck.rs`, `models/deck.rs` 使用
//! - 使用 `regex` 校验数值字面量

use regex::Regex;
use std::sync::OnceLock;

/// Fortran 数值字面量（实数或整数）
fn real_literal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eEdD][+-]?\d+)?$").expect("valid literal pattern")
    })
}

fn integer_literal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+-]?\d+$").expect("valid literal pattern"))
}

/// 是否为合法的 Fortran 实数字面量
pub fn is_real_literal(token: &str) -> bool {
    real_literal().is_match(token)
}

/// 是否为合法的整数字面量
pub fn is_integer_literal(token: &str) -> bool {
    integer_literal().is_match(token)
}

/// 解析 Fortran 实数，拒绝 NaN/Infinity 及溢出的 `****`
pub fn parse_real(token: &str) -> Option<f64> {
    if !is_real_literal(token) {
        return None;
    }
    let normalized = token.replace(['D', 'd'], "E");
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 解析整数
pub fn parse_int(token: &str) -> Option<i32> {
    if !is_integer_literal(token) {
        return None;
    }
    token.parse().ok()
}

/// 以 Fortran `E` 描述符格式化：尾数落在 [0.1, 1)，`digits` 位有效数字
///
/// 指数至少两位，超过 99 时写成三位并保留 `E`（如 `0.15E-119`），
/// 而标准 `Ew.d` 会省略 `E` 写成 `0.15-119`；保留 `E` 以便 `parse_real` 回读。
pub fn format_e(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if value == 0.0 {
        return format!("0.{}E+00", "0".repeat(digits));
    }

    // Rust 的 `{:e}` 给出 d.ddddde±x，改写为 0.dddddE±(x+1)
    let sci = format!("{:.*e}", digits - 1, value.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0) + 1;
    let mantissa_digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();

    let sign = if value < 0.0 { "-" } else { "" };
    let exp_sign = if exponent < 0 { '-' } else { '+' };
    format!(
        "{}0.{}E{}{:02}",
        sign,
        mantissa_digits,
        exp_sign,
        exponent.abs()
    )
}
