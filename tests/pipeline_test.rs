//! 一括処理の統合テスト
//!
//! 一時フォルダにSKUマスタ・試験価格表・RFP文書を作り、スキャンから集約までを通す。

mod support;

use rfp_match::normalizer::SectionKeywords;
use rfp_match::pipeline::{run_pipeline, select_rfps};
use rfp_match::{catalog, scanner};
use rfp_match_common::decision::Route;
use rfp_match_common::mto::{MTO_WORKFLOW, REASON_NO_STANDARD_SKU};
use rfp_match_common::{EvaluationOptions, MatchTier, Outcome};
use rust_decimal::Decimal;
use tempfile::tempdir;

#[test]
fn test_scan_and_prioritize() {
    let dir = tempdir().expect("一時ディレクトリ作成失敗");
    let folder = support::write_rfp_folder(dir.path());

    let rfps = scanner::scan_rfps(&folder).expect("スキャン失敗");
    assert_eq!(rfps.len(), 3, "3件とも解析できるべき");

    let prioritized = scanner::prioritize_rfps(&rfps, 90, support::today());
    let ids: Vec<&str> = prioritized.iter().map(|r| r.meta.rfp_id.as_str()).collect();
    assert_eq!(ids, vec!["WEB-002", "MAIL-001"], "期限順・90日以内のみ");

    // 既定ではPDFのみが処理対象
    assert!(select_rfps(&rfps, 90, support::today(), false).is_empty());
}

#[test]
fn test_full_pipeline_routes() {
    let dir = tempdir().expect("一時ディレクトリ作成失敗");
    let folder = support::write_rfp_folder(dir.path());
    let skus = catalog::load_skus(&support::write_catalog(dir.path())).expect("SKUマスタ読み込み失敗");
    let tests = catalog::load_test_prices(&support::write_test_prices(dir.path())).expect("試験価格表読み込み失敗");

    let rfps = scanner::scan_rfps(&folder).expect("スキャン失敗");
    let selected = select_rfps(&rfps, 90, support::today(), true);
    let result = run_pipeline(
        &selected,
        &skus,
        &tests,
        &EvaluationOptions::default(),
        &SectionKeywords::default(),
    );

    assert!(result.skipped.is_empty(), "スキップなし: {:?}", result.skipped);
    assert_eq!(result.evaluations.len(), 2);
    assert_eq!(result.summaries[0].technical_summary.rfp_id, "WEB-002");

    // WEB-002: 66kV 銅 PVC 4心 非外装 → 標準品なし
    let web = &result.evaluations[0];
    assert_eq!(web.requirements.voltage_kv, Some(66.0));
    assert_eq!(web.route(), Route::MadeToOrder);
    let Outcome::MadeToOrder { request } = &web.outcome else {
        panic!("MTOになるべき");
    };
    assert_eq!(request.workflow, MTO_WORKFLOW);
    assert_eq!(request.reason, REASON_NO_STANDARD_SKU);
    assert_eq!(request.closest_sku.as_ref().map(|c| c.sku_id.as_str()), Some("SKU-B"));
    assert_eq!(request.estimate.estimated_material_cost, Some(Decimal::from(10000)));

    // MAIL-001: 完全一致のSKU-Aが先頭、SKU-Cは電圧不一致で見積対象外
    let mail = &result.evaluations[1];
    assert_eq!(mail.route(), Route::StandardPricing);
    let best = mail.best().expect("先頭SKUがあるべき");
    assert_eq!(best.sku.sku_id, "SKU-A");
    assert_eq!(best.match_pct, 100.0);
    assert_eq!(best.tier, MatchTier::StrongMatch);

    let Outcome::Priced { lines } = &mail.outcome else {
        panic!("見積になるべき");
    };
    let priced: Vec<(&str, Decimal)> = lines.iter().map(|l| (l.sku_id.as_str(), l.total_cost)).collect();
    assert_eq!(priced, vec![("SKU-A", Decimal::from(32000)), ("SKU-B", Decimal::from(30000))]);

    // 集約結果
    assert_eq!(result.report.decisions.len(), 2);
    assert_eq!(result.report.pricing.len(), 2);
    assert_eq!(result.report.mto_requests.len(), 1);
    assert_eq!(result.report.mto_requests[0].rfp_id, "WEB-002");
}

#[test]
fn test_pipeline_is_deterministic() {
    let dir = tempdir().expect("一時ディレクトリ作成失敗");
    let folder = support::write_rfp_folder(dir.path());
    let skus = catalog::load_skus(&support::write_catalog(dir.path())).expect("SKUマスタ読み込み失敗");
    let tests = catalog::load_test_prices(&support::write_test_prices(dir.path())).expect("試験価格表読み込み失敗");

    let run = || {
        let rfps = scanner::scan_rfps(&folder).expect("スキャン失敗");
        let selected = select_rfps(&rfps, 90, support::today(), true);
        let result = run_pipeline(
            &selected,
            &skus,
            &tests,
            &EvaluationOptions::default(),
            &SectionKeywords::default(),
        );
        serde_json::to_string_pretty(&result).expect("シリアライズ失敗")
    };

    assert_eq!(run(), run(), "同じ入力なら同じ出力になるべき");
}
