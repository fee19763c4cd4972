//! RFP Match
//!
//! RFP文書の収集・要求仕様抽出・SKU照合・見積/MTO判定を行うCLIのライブラリ部分。
//! 照合・判定の本体は `rfp_match_common` にある。

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod normalizer;
pub mod pipeline;
pub mod review;
pub mod scanner;

pub use error::{Result, RfpMatchError};
