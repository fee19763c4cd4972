//! 仕様照合エンジン
//!
//! SKUマスタの各行を要求仕様と突き合わせて照合率を算出し、
//! 照合率の降順・単価の昇順で並べる。
//!
//! ## 照合ルール
//! - 5項目を均等配点で比較（大文字小文字・前後空白は無視）
//! - 数値は表記を揃えて比較（`11` と `11.0` は一致）
//! - 要求側が未抽出の項目は常に不一致（ワイルドカード扱いしない）
//! - マスタ側が空セルの項目も不一致

use crate::classification::{classify_match, voltage_mismatch};
use crate::types::{normalize_token, MatchField, MatchTier, RequirementSet, SkuRecord};
use serde::{Deserialize, Serialize};

/// 項目ごとの照合結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMatch {
    pub field: MatchField,
    pub matched: bool,
}

/// 照合・判定済みのSKU
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSku {
    pub sku: SkuRecord,
    pub field_matches: Vec<FieldMatch>,
    pub matched_count: usize,
    pub match_pct: f64,
    pub tier: MatchTier,
    /// 電圧ゲート（true なら判定区分に関係なく MTO）
    pub voltage_mismatch: bool,
}

impl RankedSku {
    pub fn field_matched(&self, field: MatchField) -> bool {
        self.field_matches
            .iter()
            .any(|m| m.field == field && m.matched)
    }

    /// 標準品として見積できない（NO_MATCH または電圧不一致）
    pub fn requires_mto(&self) -> bool {
        self.tier == MatchTier::NoMatch || self.voltage_mismatch
    }

    pub fn is_priceable(&self) -> bool {
        !self.requires_mto()
    }
}

/// 1項目を比較する
pub fn field_matches(required: Option<&str>, offered: Option<&str>) -> bool {
    match (required, offered) {
        (Some(r), Some(o)) => normalize_token(r) == normalize_token(o),
        _ => false,
    }
}

/// 1件のSKUを採点する
pub fn score_sku(sku: &SkuRecord, requirements: &RequirementSet) -> RankedSku {
    let field_matches: Vec<FieldMatch> = MatchField::ALL
        .iter()
        .map(|&field| FieldMatch {
            field,
            matched: field_matches(
                requirements.value_text(field).as_deref(),
                sku.value_text(field).as_deref(),
            ),
        })
        .collect();

    let matched_count = field_matches.iter().filter(|m| m.matched).count();
    // 整数で掛けてから割る（0/20/40/60/80/100 を正確に出す）
    let match_pct = (matched_count * 100) as f64 / MatchField::ALL.len() as f64;

    RankedSku {
        sku: sku.clone(),
        field_matches,
        matched_count,
        match_pct,
        tier: classify_match(match_pct),
        voltage_mismatch: voltage_mismatch(requirements, sku),
    }
}

/// マスタ全体を照合し、順位付けした結果を返す
///
/// 入力のマスタは変更しない。同じ入力からは常に同じ順序が得られる。
pub fn compute_spec_match(catalog: &[SkuRecord], requirements: &RequirementSet) -> Vec<RankedSku> {
    let mut ranked: Vec<RankedSku> = catalog
        .iter()
        .map(|sku| score_sku(sku, requirements))
        .collect();
    rank(&mut ranked);
    ranked
}

/// 照合率の降順、同率なら単価の昇順（安定ソート）
pub fn rank(entries: &mut [RankedSku]) {
    entries.sort_by(|a, b| {
        b.match_pct
            .total_cmp(&a.match_pct)
            .then_with(|| a.sku.unit_price.cmp(&b.sku.unit_price))
    });
}
