//! # 数据模型模块
//!
//! 输入卡片参数与 rpesalms 分波振幅数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `config.rs` 和 `commands/` 使用
//! - 子模块: deck, spectrum

pub mod deck;
pub mod spectrum;

pub use deck::{DeckParams, InputDeck};
pub use spectrum::{Spectrum, SpectrumRecord};
