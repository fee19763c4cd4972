//! 上位SKUの比較表
//!
//! 行 = 照合項目、列 = 要求値 + 上位N件のSKU。

use crate::matching::RankedSku;
use crate::types::{MatchField, RequirementSet};
use serde::{Deserialize, Serialize};

/// 比較表のデフォルト件数
pub const DEFAULT_TOP_N: usize = 3;

/// 比較表の1行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub field: MatchField,
    pub label: String,
    /// RFP要求値（未抽出なら None）
    pub required: Option<String>,
    /// SKUごとの値（`ComparisonTable::sku_ids` と同じ順）
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonTable {
    pub sku_ids: Vec<String>,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn is_empty(&self) -> bool {
        self.sku_ids.is_empty()
    }
}

/// 順位付け済みの結果から上位 `top_n` 件の比較表を作る
pub fn build_comparison_table(
    ranked: &[RankedSku],
    requirements: &RequirementSet,
    top_n: usize,
) -> ComparisonTable {
    let top = &ranked[..ranked.len().min(top_n)];

    let rows = MatchField::ALL
        .iter()
        .map(|&field| ComparisonRow {
            field,
            label: field.label().to_string(),
            required: requirements.value_text(field),
            values: top
                .iter()
                .map(|r| r.sku.value_text(field).unwrap_or_default())
                .collect(),
        })
        .collect();

    ComparisonTable {
        sku_ids: top.iter().map(|r| r.sku.sku_id.clone()).collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::compute_spec_match;
    use crate::types::{Armoured, SkuRecord};
    use rust_decimal::Decimal;

    fn catalog() -> Vec<SkuRecord> {
        (1..=5)
            .map(|i| SkuRecord {
                sku_id: format!("SKU-{}", i),
                voltage_kv: "11".to_string(),
                conductor: if i % 2 == 0 { "Copper" } else { "Aluminium" }.to_string(),
                insulation: "XLPE".to_string(),
                cores: i.to_string(),
                armoured: Armoured::Yes,
                unit_price: Decimal::from(100 * i),
                ..Default::default()
            })
            .collect()
    }

    fn requirement() -> RequirementSet {
        RequirementSet {
            voltage_kv: Some(11.0),
            conductor: Some("Aluminium".to_string()),
            insulation: Some("XLPE".to_string()),
            cores: None,
            armoured: Armoured::Yes,
        }
    }

    #[test]
    fn test_top_three_columns_in_rank_order() {
        let ranked = compute_spec_match(&catalog(), &requirement());
        let table = build_comparison_table(&ranked, &requirement(), DEFAULT_TOP_N);

        // 奇数番はAluminiumで80%、安い順
        assert_eq!(table.sku_ids, vec!["SKU-1", "SKU-3", "SKU-5"]);
        assert_eq!(table.rows.len(), 5);
        assert_eq!(table.rows[0].label, "Voltage (kV)");
        assert_eq!(table.rows[0].required.as_deref(), Some("11"));
        assert_eq!(table.rows[3].field, MatchField::Cores);
        assert_eq!(table.rows[3].required, None);
        assert_eq!(table.rows[3].values, vec!["1", "3", "5"]);
    }

    #[test]
    fn test_fewer_skus_than_top_n() {
        let ranked = compute_spec_match(&catalog()[..2], &requirement());
        let table = build_comparison_table(&ranked, &requirement(), 3);
        assert_eq!(table.sku_ids.len(), 2);
        assert!(table.rows.iter().all(|r| r.values.len() == 2));
    }

    #[test]
    fn test_empty_ranking() {
        let table = build_comparison_table(&[], &requirement(), 3);
        assert!(table.is_empty());
        assert_eq!(table.rows.len(), 5);
    }
}
