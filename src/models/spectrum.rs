//! # 光电子分波振幅数据模型
//!
//! `rpesalms.dat` / `rpesalms.edac` 中的每一行对应一个 `SpectrumRecord`：
//! 某一动能下 (l, m, 自旋) 分波的复振幅 A_lms。
//!
//! ## 依赖关系
//! - 被 `parsers/rpesalms.rs` 使用
//! - 被 `commands/convert.rs`, `commands/inspect.rs` 使用

/// 单条分波振幅记录
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumRecord {
    /// 光电子动能 (eV)
    pub energy: f64,
    /// 轨道角动量量子数
    pub l: i32,
    /// 磁量子数
    pub m: i32,
    /// 自旋通道 (2·m_s)
    pub spin: i32,
    /// Re A_lms
    pub re: f64,
    /// Im A_lms
    pub im: f64,
}

impl SpectrumRecord {
    /// 每条记录的字段数
    pub const FIELD_COUNT: usize = 6;

    /// 强度 |A|²
    pub fn intensity(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }
}

/// 一个文件中的全部记录
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spectrum {
    pub records: Vec<SpectrumRecord>,
}

impl Spectrum {
    pub fn new(records: Vec<SpectrumRecord>) -> Self {
        Spectrum { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 能量范围 (min, max)
    pub fn energy_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.records.iter().map(|r| r.energy);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), e| (lo.min(e), hi.max(e))))
    }

    /// 不同能量点的个数（按出现顺序去重）
    pub fn distinct_energies(&self) -> usize {
        let mut seen: Vec<f64> = Vec::new();
        for r in &self.records {
            if !seen.contains(&r.energy) {
                seen.push(r.energy);
            }
        }
        seen.len()
    }

    /// l 的范围
    pub fn l_range(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.l).min()?;
        let max = self.records.iter().map(|r| r.l).max()?;
        Some((min, max))
    }

    pub fn total_intensity(&self) -> f64 {
        self.records.iter().map(SpectrumRecord::intensity).sum()
    }

    /// 按强度降序排列的前 n 条记录
    pub fn strongest(&self, n: usize) -> Vec<SpectrumRecord> {
        let mut sorted = self.records.clone();
        sorted.sort_by(|a, b| {
            b.intensity()
                .partial_cmp(&a.intensity())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted.truncate(n);
        sorted
    }
}
