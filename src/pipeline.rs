//! 一括処理パイプライン
//!
//! 選定済みRFPごとに 本文抽出 → 要求仕様抽出 → 照合 → 見積/MTO判定 を行い、
//! 結果を集約して返す。RFPは1件ずつ順番に処理し、状態は持ち越さない。

use crate::error::Result;
use crate::normalizer::{extract_requirements, SectionKeywords};
use crate::scanner::{self, prioritize_rfps, RfpDocument, RfpSource};
use chrono::NaiveDate;
use rfp_match_common::{
    consolidate, evaluate_rfp, ConsolidatedReport, EvaluationOptions, RfpEvaluation, SkuCatalog,
    TestPriceTable,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const PRODUCT_CATEGORY: &str = "LT Power Cables";
pub const SCOPE_HINT: &str = "Power / Control Cables";
pub const REQUIRED_TESTS: [&str; 3] = ["Routine Test", "Type Test", "Acceptance Test"];

/// 技術担当向けの要約
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSummary {
    pub rfp_id: String,
    pub product_category: String,
    pub scope_hint: String,
    pub document_path: PathBuf,
}

/// 見積担当向けの要約
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSummary {
    pub rfp_id: String,
    pub tests_required: Vec<String>,
    pub quantity_km: Decimal,
}

/// 営業側でまとめるRFP要約
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub technical_summary: TechnicalSummary,
    pub pricing_summary: PricingSummary,
}

pub fn prepare_sales_summary(rfp: &RfpDocument, quantity_km: Decimal) -> SalesSummary {
    SalesSummary {
        technical_summary: TechnicalSummary {
            rfp_id: rfp.meta.rfp_id.clone(),
            product_category: PRODUCT_CATEGORY.to_string(),
            scope_hint: SCOPE_HINT.to_string(),
            document_path: rfp.path.clone(),
        },
        pricing_summary: PricingSummary {
            rfp_id: rfp.meta.rfp_id.clone(),
            tests_required: REQUIRED_TESTS.iter().map(|t| t.to_string()).collect(),
            quantity_km,
        },
    }
}

/// 処理できなかったRFP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRfp {
    pub rfp_id: String,
    pub path: PathBuf,
    pub reason: String,
}

/// パイプラインの実行結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub summaries: Vec<SalesSummary>,
    pub evaluations: Vec<RfpEvaluation>,
    pub skipped: Vec<SkippedRfp>,
    pub report: ConsolidatedReport,
}

/// 処理対象のRFPを選ぶ
///
/// 期限が `today + days` 以内のものを期限順に並べ、`all_sources` でなければ
/// 本文を持つPDFのみに絞る。
pub fn select_rfps(
    rfps: &[RfpDocument],
    days: i64,
    today: NaiveDate,
    all_sources: bool,
) -> Vec<RfpDocument> {
    prioritize_rfps(rfps, days, today)
        .into_iter()
        .filter(|r| all_sources || r.source == RfpSource::Pdf)
        .collect()
}

/// 1件のRFP文書を判定する
pub fn evaluate_document(
    rfp: &RfpDocument,
    catalog: &SkuCatalog,
    tests: &TestPriceTable,
    options: &EvaluationOptions,
    keywords: &SectionKeywords,
) -> Result<(SalesSummary, RfpEvaluation)> {
    let summary = prepare_sales_summary(rfp, options.quantity_km);
    let text = scanner::extract_full_text(&summary.technical_summary.document_path)?;
    let requirements = extract_requirements(&text, keywords);
    let evaluation = evaluate_rfp(&rfp.meta, &requirements, catalog.records(), tests, options);
    Ok((summary, evaluation))
}

/// 選定済みRFPを順に判定し、結果を集約する
///
/// 本文を読めなかったRFPは警告を出してスキップし、`skipped` に記録する。
pub fn run_pipeline(
    rfps: &[RfpDocument],
    catalog: &SkuCatalog,
    tests: &TestPriceTable,
    options: &EvaluationOptions,
    keywords: &SectionKeywords,
) -> PipelineReport {
    let mut summaries = Vec::new();
    let mut evaluations = Vec::new();
    let mut skipped = Vec::new();

    for rfp in rfps {
        match evaluate_document(rfp, catalog, tests, options, keywords) {
            Ok((summary, evaluation)) => {
                tracing::info!(
                    rfp_id = %rfp.meta.rfp_id,
                    route = %evaluation.route(),
                    "RFPを判定しました"
                );
                summaries.push(summary);
                evaluations.push(evaluation);
            }
            Err(e) => {
                tracing::warn!(rfp_id = %rfp.meta.rfp_id, error = %e, "RFPの処理をスキップします");
                skipped.push(SkippedRfp {
                    rfp_id: rfp.meta.rfp_id.clone(),
                    path: rfp.path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let report = consolidate(&evaluations);

    PipelineReport {
        summaries,
        evaluations,
        skipped,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfp_match_common::RfpMeta;

    fn doc(id: &str, source: RfpSource, due: Option<NaiveDate>) -> RfpDocument {
        RfpDocument {
            meta: RfpMeta {
                rfp_id: id.to_string(),
                due_date: due,
            },
            source,
            path: PathBuf::from(format!("{}.dat", id)),
        }
    }

    #[test]
    fn test_sales_summary() {
        let rfp = doc("R-1", RfpSource::Pdf, None);
        let summary = prepare_sales_summary(&rfp, Decimal::from(10));
        assert_eq!(summary.technical_summary.product_category, "LT Power Cables");
        assert_eq!(summary.technical_summary.document_path, PathBuf::from("R-1.dat"));
        assert_eq!(summary.pricing_summary.tests_required.len(), 3);
        assert_eq!(summary.pricing_summary.quantity_km, Decimal::from(10));
    }

    #[test]
    fn test_select_rfps_pdf_only_by_default() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let due = NaiveDate::from_ymd_opt(2026, 11, 1);
        let rfps = vec![
            doc("MAIL", RfpSource::Email, due),
            doc("PDF", RfpSource::Pdf, due),
            doc("FAR", RfpSource::Pdf, NaiveDate::from_ymd_opt(2027, 12, 1)),
        ];

        let ids = |v: Vec<RfpDocument>| v.into_iter().map(|r| r.meta.rfp_id).collect::<Vec<_>>();
        assert_eq!(ids(select_rfps(&rfps, 90, today, false)), vec!["PDF"]);
        assert_eq!(ids(select_rfps(&rfps, 90, today, true)), vec!["MAIL", "PDF"]);
    }

    #[test]
    fn test_unreadable_document_is_skipped() {
        let rfps = vec![doc("GONE", RfpSource::Pdf, None)];
        let result = run_pipeline(
            &rfps,
            &SkuCatalog::default(),
            &TestPriceTable::default(),
            &EvaluationOptions::default(),
            &SectionKeywords::default(),
        );
        assert!(result.evaluations.is_empty());
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].rfp_id, "GONE");
        assert!(result.report.decisions.is_empty());
    }
}
