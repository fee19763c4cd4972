//! 要求仕様の抽出モジュール
//!
//! RFP本文から技術要件セクションを切り出し、照合5項目を抽出する。
//!
//! ## 処理フロー
//! 1. 開始/終了キーワードでセクションを切り出す
//! 2. 電圧・導体・絶縁・心線数・外装を個別に抽出
//! 3. 抽出できなかった項目は未設定のまま残す（照合では不一致扱い）

pub mod fields;
pub mod section;

use rfp_match_common::RequirementSet;
use serde::{Deserialize, Serialize};

pub use fields::{extract_armouring, extract_conductor, extract_cores, extract_insulation, extract_voltage};
pub use section::find_section;

/// セクション切り出しのキーワード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionKeywords {
    pub starts: Vec<String>,
    pub ends: Vec<String>,
}

impl Default for SectionKeywords {
    fn default() -> Self {
        Self {
            starts: vec!["technical requirements".into(), "scope of supply".into()],
            ends: vec!["integration approach".into(), "security".into()],
        }
    }
}

/// 本文から要求仕様を抽出する
///
/// # Arguments
/// * `text` - RFP本文
/// * `keywords` - セクション切り出しのキーワード
pub fn extract_requirements(text: &str, keywords: &SectionKeywords) -> RequirementSet {
    let section = find_section(text, &keywords.starts, &keywords.ends);

    if section.is_empty() {
        tracing::warn!(
            starts = ?keywords.starts,
            "技術要件セクションが見つかりません。要求仕様は未設定になります"
        );
    }

    let requirements = RequirementSet {
        voltage_kv: extract_voltage(section),
        conductor: extract_conductor(section),
        insulation: extract_insulation(section),
        cores: extract_cores(section),
        armoured: extract_armouring(section),
    };

    let missing = requirements.missing_fields();
    if !missing.is_empty() {
        tracing::debug!(missing = ?missing, "抽出できなかった項目があります");
    }

    requirements
}
