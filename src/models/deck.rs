//! # multiplet 输入卡片数据模型
//!
//! 输入卡片是 39 行定长、按位置解释的文本，由 multiplet 从标准输入读取。
//! 每个字段都保存为用户输入的原始文本（与 GUI 的自由文本框一致），
//! 只校验数值字面量语法和每行字段数，不做物理量范围检查。
//!
//! ## 行布局
//! ```text
//!  1      E(2p) E(3d)
//!  2-6    5x5 晶体场矩阵
//!  7      B 场强度 (eV), theta (deg)
//!  8      ω 起点, ω 终点, Δω, Γ, Γ flag
//!  9-12   d 电子数, 活跃壳层 l 值, SOC 参数, 偶极矩阵元
//! 13-20   基态       (组态数, 占据数, Slater-Condon 参数 x6)
//! 21-28   末态
//! 29-36   中间态
//! 37-39   Auger 衰变积分 R_k(2p,np/nf/nh;3d,3d)
//! ```
//!
//! ## 依赖关系
//! - 被 `config.rs`, `parsers/deck.rs`, `commands/compose.rs` 使用
//! - 使用 `parsers/fortran.rs` 校验字面量

use crate::error::{MultipletError, Result};
use crate::parsers::fortran;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────
// 行布局
// ─────────────────────────────────────────────────────────────

/// 字段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Real,
    Integer,
}

/// 卡片中一行的规格
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpec {
    pub label: &'static str,
    pub arity: usize,
    pub kind: FieldKind,
    /// 最后一个字段是整数标志，其余按 `kind`
    pub integer_flag: bool,
}

impl LineSpec {
    /// 第 `index` 个字段（从 0 开始）的类型
    pub fn field_kind(&self, index: usize) -> FieldKind {
        if self.integer_flag && index + 1 == self.arity {
            FieldKind::Integer
        } else {
            self.kind
        }
    }
}

const fn real(label: &'static str, arity: usize) -> LineSpec {
    LineSpec {
        label,
        arity,
        kind: FieldKind::Real,
        integer_flag: false,
    }
}

const fn int(label: &'static str, arity: usize) -> LineSpec {
    LineSpec {
        label,
        arity,
        kind: FieldKind::Integer,
        integer_flag: false,
    }
}

/// 每个态块的 8 行
const STATE_BLOCK: [LineSpec; 8] = [
    int("configuration count", 1),
    int("occupation numbers", 5),
    real("F_k(2p,3d)", 3),
    real("G_k(2p,3d)", 4),
    real("F_k(2p,3d) #2", 3),
    real("F_k(2p,3d) #3", 3),
    real("G_k(2p,3d) #2", 4),
    real("F_k(3d,3d)", 5),
];

/// 整张卡片的行数
pub const DECK_LINES: usize = 39;

/// 完整的 39 行布局
pub fn deck_layout() -> Vec<LineSpec> {
    let mut layout = vec![real("E(2p) E(3d)", 2)];
    layout.extend(std::iter::repeat(real("crystal field row", 5)).take(5));
    layout.push(real("B-field, theta", 2));
    layout.push(LineSpec {
        label: "photon energy window",
        arity: 5,
        kind: FieldKind::Real,
        integer_flag: true,
    });
    layout.push(int("number of d electrons", 1));
    layout.push(int("l values", 5));
    layout.push(real("SOC parameters", 5));
    layout.push(real("dipole matrix elements", 3));
    for _ in 0..3 {
        layout.extend(STATE_BLOCK);
    }
    layout.push(real("R_k(2p,np;3d,3d)", 4));
    layout.push(real("R_k(2p,nf;3d,3d)", 4));
    layout.push(real("R_k(2p,nh;3d,3d)", 4));
    layout
}

// ─────────────────────────────────────────────────────────────
// 参数
// ─────────────────────────────────────────────────────────────

/// 能级与晶体场
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnergyParams {
    pub e2p: String,
    pub e3d: String,
    pub crystal_field: [[String; 5]; 5],
}

/// 外加磁场
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MagneticField {
    /// 场强 (eV)
    pub strength: String,
    /// 极角 (deg)
    pub theta: String,
}

/// 入射光子能量扫描
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhotonParams {
    pub omega_start: String,
    pub omega_stop: String,
    pub delta_omega: String,
    pub gamma: String,
    pub gamma_flag: String,
}

/// 电子组态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    pub d_electrons: String,
    pub l_values: String,
    pub soc: String,
    pub dipole: String,
}

/// 一个态（基态/末态/中间态）的组态与 Slater-Condon 参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateParams {
    pub count: String,
    pub occupation: String,
    pub f_2p3d: String,
    pub g_2p3d: String,
    pub f_2p3d_2: String,
    pub f_2p3d_3: String,
    pub g_2p3d_2: String,
    pub f_3d3d: String,
}

/// Auger 衰变径向积分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AugerParams {
    pub r_2p_np: String,
    pub r_2p_nf: String,
    pub r_2p_nh: String,
}

/// 组成输入卡片的全部参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeckParams {
    pub energy: EnergyParams,
    pub magnetic_field: MagneticField,
    pub photon: PhotonParams,
    pub configuration: Configuration,
    pub ground: StateParams,
    #[serde(rename = "final")]
    pub final_state: StateParams,
    pub intermediate: StateParams,
    pub auger: AugerParams,
}

fn s(v: &str) -> String {
    v.to_string()
}

impl StateParams {
    fn with(occupation: &str, f_3d3d: &str) -> Self {
        StateParams {
            count: s("1"),
            occupation: s(occupation),
            f_2p3d: s("0 0 5.0568"),
            g_2p3d: s("0 3.6848 0 2.0936"),
            f_2p3d_2: s("0 0 5.0568"),
            f_2p3d_3: s("0 0 5.0568"),
            g_2p3d_2: s("0 3.6848 0 2.0936"),
            f_3d3d: s(f_3d3d),
        }
    }

    fn fields(&self) -> [&str; 8] {
        [
            &self.count,
            &self.occupation,
            &self.f_2p3d,
            &self.g_2p3d,
            &self.f_2p3d_2,
            &self.f_2p3d_3,
            &self.g_2p3d_2,
            &self.f_3d3d,
        ]
    }
}

impl Default for DeckParams {
    /// 参考卡片 (Mn 2p-3d RPES) 的数值
    fn default() -> Self {
        let cf = |row: [&str; 5]| row.map(s);
        DeckParams {
            energy: EnergyParams {
                e2p: s("-639"),
                e3d: s("-1.e-6"),
                crystal_field: [
                    cf(["-0.024", "0.", "0.", "-0.056", "0."]),
                    cf(["0.", "0.064", "0.", "0.", "0.056"]),
                    cf(["0.", "0.", "-0.177", "0.", "0."]),
                    cf(["-0.056", "0.", "0.", "0.064", "0."]),
                    cf(["0.", "0.056", "0.", "0.", "-0.024"]),
                ],
            },
            magnetic_field: MagneticField {
                strength: s("1.e-3"),
                theta: s("90."),
            },
            photon: PhotonParams {
                omega_start: s("651.8"),
                omega_stop: s("651.8"),
                delta_omega: s("2."),
                gamma: s("0.4"),
                gamma_flag: s("0"),
            },
            configuration: Configuration {
                d_electrons: s("5"),
                l_values: s("1 2 1 3 5"),
                soc: s("6.846  0.040 0 0 0"),
                dipole: s("2.064  0.02161  0.09695"),
            },
            ground: StateParams::with("6 5 0 0 0", "0 0 9.4752 0 5.9256"),
            final_state: StateParams::with("6 4 0 0 0", "0 0 9.4752 0 5.9256"),
            intermediate: StateParams::with("5 6  0 0 0", "0 0 8.9240 0 5.5528"),
            auger: AugerParams {
                r_2p_np: s("0. -.19047  0. -.15644"),
                r_2p_nf: s("0. 0.7079   0. 0.44937"),
                r_2p_nh: s("0. 0.       0. 0.28778"),
            },
        }
    }
}

impl DeckParams {
    /// 晶体场矩阵中数值不对称的元素位置 (i, j)，i < j，从 1 开始
    pub fn asymmetric_crystal_field(&self) -> Vec<(usize, usize)> {
        let m = &self.energy.crystal_field;
        let mut result = Vec::new();
        for i in 0..5 {
            for j in (i + 1)..5 {
                let a = fortran::parse_real(m[i][j].trim());
                let b = fortran::parse_real(m[j][i].trim());
                if a != b {
                    result.push((i + 1, j + 1));
                }
            }
        }
        result
    }
}

// ─────────────────────────────────────────────────────────────
// 卡片
// ─────────────────────────────────────────────────────────────

/// 已排版的输入卡片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDeck {
    lines: Vec<String>,
}

impl InputDeck {
    /// 校验参数并按 multiplet 的定长约定排版
    pub fn compose(params: &DeckParams) -> Result<Self> {
        let layout = deck_layout();
        let mut lines: Vec<String> = Vec::with_capacity(DECK_LINES);

        let energy = &params.energy;
        lines.push(join_cells(&[
            scalar("energy.e2p", &energy.e2p, FieldKind::Real)?,
            scalar("energy.e3d", &energy.e3d, FieldKind::Real)?,
        ]));

        for (i, row) in energy.crystal_field.iter().enumerate() {
            let mut cells = Vec::with_capacity(5);
            for (j, value) in row.iter().enumerate() {
                let name = format!("energy.crystal_field[{}][{}]", i + 1, j + 1);
                let token = scalar(&name, value, FieldKind::Real)?;
                cells.push(format!("{:<6}", sign_column(token)));
            }
            let mut line = join_cells(&cells);
            // 最后一行之外都以一个空格结尾
            if i < 4 {
                line.push(' ');
            }
            lines.push(line);
        }

        let field = &params.magnetic_field;
        lines.push(join_cells(&[
            sign_column(scalar("magnetic_field.strength", &field.strength, FieldKind::Real)?),
            scalar("magnetic_field.theta", &field.theta, FieldKind::Real)?.to_string(),
        ]));

        let photon = &params.photon;
        lines.push(join_cells(&[
            format!(
                "{:<7}",
                scalar("photon.omega_start", &photon.omega_start, FieldKind::Real)?
            ),
            format!(
                "{:<8}",
                scalar("photon.omega_stop", &photon.omega_stop, FieldKind::Real)?
            ),
            scalar("photon.delta_omega", &photon.delta_omega, FieldKind::Real)?.to_string(),
            scalar("photon.gamma", &photon.gamma, FieldKind::Real)?.to_string(),
            scalar("photon.gamma_flag", &photon.gamma_flag, FieldKind::Integer)?.to_string(),
        ]));

        let conf = &params.configuration;
        let free_lines: Vec<(String, &str)> = [
            ("configuration.d_electrons", conf.d_electrons.as_str()),
            ("configuration.l_values", conf.l_values.as_str()),
            ("configuration.soc", conf.soc.as_str()),
            ("configuration.dipole", conf.dipole.as_str()),
        ]
        .into_iter()
        .map(|(name, v)| (name.to_string(), v))
        .chain(state_fields("ground", &params.ground))
        .chain(state_fields("final", &params.final_state))
        .chain(state_fields("intermediate", &params.intermediate))
        .chain([
            ("auger.r_2p_np".to_string(), params.auger.r_2p_np.as_str()),
            ("auger.r_2p_nf".to_string(), params.auger.r_2p_nf.as_str()),
            ("auger.r_2p_nh".to_string(), params.auger.r_2p_nh.as_str()),
        ])
        .collect();

        for (name, value) in free_lines {
            let spec = layout[lines.len()];
            lines.push(free_line(&name, value, spec)?);
        }

        debug_assert_eq!(lines.len(), DECK_LINES);
        Ok(InputDeck { lines })
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 卡片文本：行间 `\n`，末尾不加换行
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

fn state_fields<'a>(
    prefix: &'static str,
    state: &'a StateParams,
) -> impl Iterator<Item = (String, &'a str)> {
    const NAMES: [&str; 8] = [
        "count",
        "occupation",
        "f_2p3d",
        "g_2p3d",
        "f_2p3d_2",
        "f_2p3d_3",
        "g_2p3d_2",
        "f_3d3d",
    ];
    NAMES
        .into_iter()
        .zip(state.fields())
        .map(move |(name, value)| (format!("{}.{}", prefix, name), value))
}

/// 单值字段：去掉首尾空白后必须是一个合法字面量
fn scalar<'a>(name: &str, value: &'a str, kind: FieldKind) -> Result<&'a str> {
    let token = value.trim();
    if token.is_empty() {
        return Err(invalid(name, value, "value is required"));
    }
    check_token(name, value, token, kind)?;
    Ok(token)
}

/// 多值行：按用户输入原样输出（仅去掉首尾空白），字段数必须与布局一致
fn free_line(name: &str, value: &str, spec: LineSpec) -> Result<String> {
    let text = value.trim();
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != spec.arity {
        return Err(invalid(
            name,
            value,
            &format!("expected {} values, found {}", spec.arity, tokens.len()),
        ));
    }
    for (i, token) in tokens.into_iter().enumerate() {
        check_token(name, value, token, spec.field_kind(i))?;
    }
    Ok(text.to_string())
}

fn check_token(name: &str, value: &str, token: &str, kind: FieldKind) -> Result<()> {
    let ok = match kind {
        FieldKind::Real => fortran::is_real_literal(token),
        FieldKind::Integer => fortran::is_integer_literal(token),
    };
    if ok {
        Ok(())
    } else {
        let reason = match kind {
            FieldKind::Real => format!("'{}' is not a number", token),
            FieldKind::Integer => format!("'{}' is not an integer", token),
        };
        Err(invalid(name, value, &reason))
    }
}

fn invalid(name: &str, value: &str, reason: &str) -> MultipletError {
    MultipletError::InvalidField {
        field: name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// 非负数前面保留一个符号位
fn sign_column(token: &str) -> String {
    if token.starts_with('-') || token.starts_with('+') {
        token.to_string()
    } else {
        format!(" {}", token)
    }
}

/// 依次拼接单元格；两个单元格之间若没有空白则补一个空格
fn join_cells<S: AsRef<str>>(cells: &[S]) -> String {
    let mut line = String::new();
    for cell in cells {
        let cell = cell.as_ref();
        let touching = line.chars().last().is_some_and(|c| !c.is_whitespace())
            && cell.chars().next().is_some_and(|c| !c.is_whitespace());
        if touching {
            line.push(' ');
        }
        line.push_str(cell);
    }
    line
}
