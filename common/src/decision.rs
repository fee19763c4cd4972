//! RFP単位の判定と集約
//!
//! 1件のRFPについて 照合 → 比較表 → 見積 or MTO を決め、
//! 複数RFPの結果を明示的なリストとして集約する。

use crate::comparison::{build_comparison_table, ComparisonTable, DEFAULT_TOP_N};
use crate::matching::{compute_spec_match, RankedSku};
use crate::mto::{generate_mto_request, MtoRequest, DEFAULT_MTO_PREMIUM};
use crate::pricing::{compute_pricing, PriceLine, TestPriceTable};
use crate::types::{MatchTier, RequirementSet, RfpMeta, SkuRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 判定オプション
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOptions {
    pub quantity_km: Decimal,
    pub top_n: usize,
    pub mto_premium: Decimal,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            quantity_km: Decimal::from(10),
            top_n: DEFAULT_TOP_N,
            mto_premium: DEFAULT_MTO_PREMIUM,
        }
    }
}

/// 振り分け先
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Route {
    StandardPricing,
    MadeToOrder,
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Route::StandardPricing => write!(f, "STANDARD_PRICING"),
            Route::MadeToOrder => write!(f, "MTO"),
        }
    }
}

/// 判定結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Outcome {
    Priced { lines: Vec<PriceLine> },
    MadeToOrder { request: MtoRequest },
}

impl Outcome {
    pub fn route(&self) -> Route {
        match self {
            Outcome::Priced { .. } => Route::StandardPricing,
            Outcome::MadeToOrder { .. } => Route::MadeToOrder,
        }
    }
}

/// 1件のRFPの判定結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfpEvaluation {
    pub rfp: RfpMeta,
    pub requirements: RequirementSet,
    pub ranked: Vec<RankedSku>,
    pub comparison: ComparisonTable,
    pub outcome: Outcome,
}

impl RfpEvaluation {
    pub fn best(&self) -> Option<&RankedSku> {
        self.ranked.first()
    }

    pub fn route(&self) -> Route {
        self.outcome.route()
    }
}

/// 1件のRFPを判定する
///
/// 先頭SKUが NO_MATCH または電圧不一致なら MTO、そうでなければ見積対象SKUを見積る。
pub fn evaluate_rfp(
    rfp: &RfpMeta,
    requirements: &RequirementSet,
    catalog: &[SkuRecord],
    tests: &TestPriceTable,
    options: &EvaluationOptions,
) -> RfpEvaluation {
    let ranked = compute_spec_match(catalog, requirements);
    let comparison = build_comparison_table(&ranked, requirements, options.top_n);

    let outcome = match ranked.first() {
        Some(top) if top.is_priceable() => Outcome::Priced {
            lines: compute_pricing(&ranked, options.quantity_km, tests),
        },
        top => Outcome::MadeToOrder {
            request: generate_mto_request(
                rfp,
                requirements,
                top,
                options.quantity_km,
                options.mto_premium,
            ),
        },
    };

    tracing::debug!(
        rfp_id = %rfp.rfp_id,
        best = ranked.first().map(|r| r.sku.sku_id.as_str()).unwrap_or("-"),
        route = %outcome.route(),
        "RFP判定完了"
    );

    RfpEvaluation {
        rfp: rfp.clone(),
        requirements: requirements.clone(),
        ranked,
        comparison,
        outcome,
    }
}

/// 判定サマリの1行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRow {
    pub rfp_id: String,
    pub best_sku: Option<String>,
    pub match_pct: Option<f64>,
    pub classification: Option<MatchTier>,
    pub voltage_mismatch: bool,
    pub route: Route,
}

/// 見積サマリの1行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRow {
    pub rfp_id: String,
    pub sku_id: String,
    pub classification: MatchTier,
    pub material_cost: Decimal,
    pub test_cost: Decimal,
    pub total_cost: Decimal,
}

/// 複数RFPの集約結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedReport {
    pub decisions: Vec<DecisionRow>,
    pub pricing: Vec<PricingRow>,
    pub mto_requests: Vec<MtoRequest>,
}

/// 判定結果を集約する（入力順を保つ）
pub fn consolidate(evaluations: &[RfpEvaluation]) -> ConsolidatedReport {
    let mut report = ConsolidatedReport::default();

    for evaluation in evaluations {
        let best = evaluation.best();
        report.decisions.push(DecisionRow {
            rfp_id: evaluation.rfp.rfp_id.clone(),
            best_sku: best.map(|b| b.sku.sku_id.clone()),
            match_pct: best.map(|b| b.match_pct),
            classification: best.map(|b| b.tier),
            voltage_mismatch: best.map(|b| b.voltage_mismatch).unwrap_or(false),
            route: evaluation.route(),
        });

        match &evaluation.outcome {
            Outcome::Priced { lines } => {
                report.pricing.extend(lines.iter().map(|line| PricingRow {
                    rfp_id: evaluation.rfp.rfp_id.clone(),
                    sku_id: line.sku_id.clone(),
                    classification: line.tier,
                    material_cost: line.material_cost,
                    test_cost: line.test_cost,
                    total_cost: line.total_cost,
                }));
            }
            Outcome::MadeToOrder { request } => report.mto_requests.push(request.clone()),
        }
    }

    report
}
