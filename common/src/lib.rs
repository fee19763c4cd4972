//! RFP Match Common Library
//!
//! RFPの要求仕様とSKUマスタの照合・判定・見積・MTO依頼生成。
//! ファイル入出力を持たない純粋な処理のみを置く。

pub mod types;
pub mod error;
pub mod classification;
pub mod matching;
pub mod comparison;
pub mod catalog;
pub mod pricing;
pub mod mto;
pub mod decision;
pub mod export;

pub use types::{Armoured, MatchField, MatchTier, RequirementSet, RfpMeta, SkuRecord};
pub use error::{Error, Result};
pub use classification::{classify_match, voltage_mismatch, PARTIAL_MATCH_THRESHOLD, STRONG_MATCH_THRESHOLD};
pub use matching::{compute_spec_match, RankedSku};
pub use comparison::{build_comparison_table, ComparisonTable};
pub use catalog::{SkuCatalog, Table};
pub use pricing::{compute_pricing, PriceLine, TestPriceTable};
pub use mto::{generate_mto_request, MtoRequest};
pub use decision::{consolidate, evaluate_rfp, ConsolidatedReport, EvaluationOptions, Outcome, RfpEvaluation, Route};
