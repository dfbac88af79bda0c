//! # 解析器模块
//!
//! multiplet 相关文本格式的读写。
//!
//! ## 依赖关系
//! - 被 `commands/`, `models/deck.rs` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: fortran, deck, rpesalms

pub mod deck;
pub mod fortran;
pub mod rpesalms;
