//! MTO（受注生産）依頼の生成
//!
//! 標準SKUで要求を満たせない場合に、最も近いSKUとの差分表と概算見積を添えて
//! 新規SKU依頼を作成する。

use crate::matching::{field_matches, RankedSku};
use crate::types::{MatchField, MatchTier, RequirementSet, RfpMeta, SkuRecord};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const MTO_WORKFLOW: &str = "MTO_NEW_SKU_REQUEST";

/// 最寄りSKU単価に上乗せする割合のデフォルト
pub const DEFAULT_MTO_PREMIUM: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

pub const REASON_NO_STANDARD_SKU: &str = "No standard SKU meets mandatory requirements";
pub const REASON_VOLTAGE_MISMATCH: &str =
    "Voltage class of the closest standard SKU differs from the requirement";
pub const REASON_EMPTY_CATALOG: &str = "SKU catalog is empty";

pub const MTO_ACTIONS: [&str; 5] = [
    "Engineering feasibility check",
    "Design/BOM finalization",
    "Prototype/test sample if required",
    "Finalize new SKU code and lead time",
    "Commercial approval for deviations",
];

/// 差分表の1行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapRow {
    #[serde(rename = "Parameter")]
    pub parameter: String,

    #[serde(rename = "RFP Requirement")]
    pub rfp_requirement: Option<String>,

    #[serde(rename = "Closest SKU Value")]
    pub closest_sku_value: Option<String>,

    #[serde(rename = "Match")]
    pub matched: bool,
}

/// 最寄りSKUの要約
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosestSku {
    #[serde(rename = "SKU_ID")]
    pub sku_id: String,

    #[serde(rename = "Product_Category")]
    pub product_category: Option<String>,

    #[serde(rename = "Unit_Price_per_km_INR")]
    pub unit_price: Decimal,

    pub match_pct: f64,
}

/// 概算見積（試験費は未確定）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MtoEstimate {
    pub quantity_km: Decimal,
    pub premium_fraction: Decimal,
    /// 最寄りSKUがない場合は None
    pub estimated_material_cost: Option<Decimal>,
    /// 新規SKUの試験内容が決まるまで None
    pub test_cost: Option<Decimal>,
}

/// MTO依頼
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MtoRequest {
    pub rfp_id: String,
    pub due_date: Option<NaiveDate>,
    pub workflow: String,
    pub reason: String,
    pub rfp_specs: RequirementSet,
    pub closest_sku: Option<ClosestSku>,
    pub gap_table: Vec<GapRow>,
    pub estimate: MtoEstimate,
    pub actions: Vec<String>,
}

/// 要求仕様と最寄りSKUの差分表
pub fn build_gap_table(requirements: &RequirementSet, closest: Option<&SkuRecord>) -> Vec<GapRow> {
    MatchField::ALL
        .iter()
        .map(|&field| {
            let required = requirements.value_text(field);
            let offered = closest.and_then(|sku| sku.value_text(field));
            GapRow {
                parameter: field.label().to_string(),
                matched: field_matches(required.as_deref(), offered.as_deref()),
                rfp_requirement: required,
                closest_sku_value: offered,
            }
        })
        .collect()
}

/// 概算材料費 = 最寄りSKU単価 × 数量 × (1 + 上乗せ率)
pub fn estimate_material_cost(unit_price: Decimal, quantity_km: Decimal, premium_fraction: Decimal) -> Decimal {
    unit_price * quantity_km * (Decimal::ONE + premium_fraction)
}

/// MTO依頼を作成する
///
/// `closest` は順位付け結果の先頭（照合率最大・同率なら最安）を渡す。
pub fn generate_mto_request(
    rfp: &RfpMeta,
    requirements: &RequirementSet,
    closest: Option<&RankedSku>,
    quantity_km: Decimal,
    premium_fraction: Decimal,
) -> MtoRequest {
    let reason = match closest {
        None => REASON_EMPTY_CATALOG,
        Some(top) if top.voltage_mismatch && top.tier != MatchTier::NoMatch => REASON_VOLTAGE_MISMATCH,
        Some(_) => REASON_NO_STANDARD_SKU,
    };

    MtoRequest {
        rfp_id: rfp.rfp_id.clone(),
        due_date: rfp.due_date,
        workflow: MTO_WORKFLOW.to_string(),
        reason: reason.to_string(),
        rfp_specs: requirements.clone(),
        closest_sku: closest.map(|top| ClosestSku {
            sku_id: top.sku.sku_id.clone(),
            product_category: top.sku.product_category.clone(),
            unit_price: top.sku.unit_price,
            match_pct: top.match_pct,
        }),
        gap_table: build_gap_table(requirements, closest.map(|top| &top.sku)),
        estimate: MtoEstimate {
            quantity_km,
            premium_fraction,
            estimated_material_cost: closest
                .map(|top| estimate_material_cost(top.sku.unit_price, quantity_km, premium_fraction)),
            test_cost: None,
        },
        actions: MTO_ACTIONS.iter().map(|a| a.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::compute_spec_match;
    use crate::types::Armoured;

    fn requirement() -> RequirementSet {
        RequirementSet {
            voltage_kv: Some(11.0),
            conductor: Some("Aluminium".to_string()),
            insulation: Some("XLPE".to_string()),
            cores: Some(3),
            armoured: Armoured::Yes,
        }
    }

    fn meta() -> RfpMeta {
        RfpMeta {
            rfp_id: "RFP-2026-014".to_string(),
            due_date: NaiveDate::from_ymd_opt(2026, 11, 30),
        }
    }

    fn copper_sku(voltage: &str) -> SkuRecord {
        SkuRecord {
            sku_id: "SKU-CU".to_string(),
            product_category: Some("HT Power Cable".to_string()),
            voltage_kv: voltage.to_string(),
            conductor: "Copper".to_string(),
            insulation: "PVC".to_string(),
            cores: "4".to_string(),
            armoured: Armoured::Yes,
            unit_price: Decimal::from(2000),
        }
    }

    #[test]
    fn test_gap_table_flags() {
        let gap = build_gap_table(&requirement(), Some(&copper_sku("11.0")));

        assert_eq!(gap.len(), 5);
        assert_eq!(gap[0].parameter, "Voltage (kV)");
        assert!(gap[0].matched);
        assert_eq!(gap[1].rfp_requirement.as_deref(), Some("Aluminium"));
        assert_eq!(gap[1].closest_sku_value.as_deref(), Some("Copper"));
        assert!(!gap[1].matched);
        assert!(gap[4].matched);
    }

    #[test]
    fn test_gap_table_without_closest_sku() {
        let gap = build_gap_table(&requirement(), None);
        assert!(gap.iter().all(|g| !g.matched && g.closest_sku_value.is_none()));
    }

    #[test]
    fn test_generate_request_with_estimate() {
        let ranked = compute_spec_match(&[copper_sku("11")], &requirement());
        let request = generate_mto_request(&meta(), &requirement(), ranked.first(), Decimal::from(10), DEFAULT_MTO_PREMIUM);

        assert_eq!(request.workflow, MTO_WORKFLOW);
        assert_eq!(request.reason, REASON_NO_STANDARD_SKU);
        assert_eq!(request.actions.len(), 5);
        assert_eq!(request.actions[0], "Engineering feasibility check");

        let closest = request.closest_sku.as_ref().unwrap();
        assert_eq!(closest.sku_id, "SKU-CU");
        assert_eq!(closest.match_pct, 40.0);

        assert_eq!(request.estimate.estimated_material_cost, Some(Decimal::from(25000)));
        assert_eq!(request.estimate.test_cost, None);
    }

    #[test]
    fn test_voltage_reason() {
        let sku = SkuRecord {
            conductor: "Aluminium".to_string(),
            insulation: "XLPE".to_string(),
            cores: "3".to_string(),
            ..copper_sku("33")
        };
        let ranked = compute_spec_match(&[sku], &requirement());
        let request = generate_mto_request(&meta(), &requirement(), ranked.first(), Decimal::ONE, DEFAULT_MTO_PREMIUM);
        assert_eq!(request.reason, REASON_VOLTAGE_MISMATCH);
    }

    #[test]
    fn test_empty_catalog_request() {
        let request = generate_mto_request(&meta(), &requirement(), None, Decimal::from(10), DEFAULT_MTO_PREMIUM);
        assert_eq!(request.reason, REASON_EMPTY_CATALOG);
        assert!(request.closest_sku.is_none());
        assert_eq!(request.estimate.estimated_material_cost, None);
    }

    #[test]
    fn test_request_serializes_human_readable_keys() {
        let ranked = compute_spec_match(&[copper_sku("11")], &requirement());
        let request = generate_mto_request(&meta(), &requirement(), ranked.first(), Decimal::from(10), DEFAULT_MTO_PREMIUM);

        let json = serde_json::to_string_pretty(&request).expect("シリアライズ失敗");
        assert!(json.contains("\"workflow\": \"MTO_NEW_SKU_REQUEST\""));
        assert!(json.contains("\"SKU_ID\": \"SKU-CU\""));
        assert!(json.contains("\"RFP Requirement\""));
        assert!(json.contains("\"due_date\": \"2026-11-30\""));
        assert!(json.contains("\"test_cost\": null"));
    }

    #[test]
    fn test_estimate_keeps_paise() {
        let estimate = estimate_material_cost(Decimal::new(99999, 2), Decimal::new(15, 1), Decimal::new(1, 1));
        assert_eq!(estimate, Decimal::new(164998350, 5));
        assert_eq!(estimate.round_dp(2).to_string(), "1649.98");
    }
}
