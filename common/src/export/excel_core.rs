//! Excel生成（共通ライブラリ）
//!
//! 判定サマリ・見積サマリ・MTO差分・RFPごとの照合結果をシートに分けて出力する。

use crate::decision::{ConsolidatedReport, RfpEvaluation};
use crate::types::MatchField;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::*;

/// 1列目（ID列）の幅
const ID_COL_WIDTH: f64 = 22.0;
/// その他の列幅
const VALUE_COL_WIDTH: f64 = 16.0;
/// 金額の表示形式
const MONEY_FORMAT: &str = "#,##0.00";

struct Formats {
    header: Format,
    text: Format,
    money: Format,
    pct: Format,
}

impl Formats {
    fn new() -> Self {
        let border = |f: Format| {
            f.set_border(FormatBorder::Hair)
                .set_border_color(Color::RGB(0xAAAAAA))
        };
        Self {
            header: border(
                Format::new()
                    .set_bold()
                    .set_font_color(Color::RGB(0x333333))
                    .set_background_color(Color::RGB(0xF5F5F5))
                    .set_align(FormatAlign::Center),
            ),
            text: border(Format::new()),
            money: border(Format::new().set_num_format(MONEY_FORMAT)),
            pct: border(Format::new().set_num_format("0\"%\"")),
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn write_header(
    worksheet: &mut Worksheet,
    row: u32,
    headers: &[&str],
    format: &Format,
) -> Result<(), String> {
    for (col, title) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(row, col as u16, *title, format)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }
    Ok(())
}

fn set_widths(worksheet: &mut Worksheet, columns: usize) -> Result<(), String> {
    for col in 0..columns {
        let width = if col == 0 { ID_COL_WIDTH } else { VALUE_COL_WIDTH };
        worksheet
            .set_column_width(col as u16, width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
    }
    Ok(())
}

fn text(worksheet: &mut Worksheet, row: u32, col: u16, value: &str, format: &Format) -> Result<(), String> {
    worksheet
        .write_string_with_format(row, col, value, format)
        .map_err(|e| format!("セル書き込みエラー({}, {}): {}", row, col, e))?;
    Ok(())
}

fn number(worksheet: &mut Worksheet, row: u32, col: u16, value: f64, format: &Format) -> Result<(), String> {
    worksheet
        .write_number_with_format(row, col, value, format)
        .map_err(|e| format!("セル書き込みエラー({}, {}): {}", row, col, e))?;
    Ok(())
}

/// 金額セル（Excel上はf64）
fn money(worksheet: &mut Worksheet, row: u32, col: u16, value: Decimal, format: &Format) -> Result<(), String> {
    let amount = value
        .to_f64()
        .ok_or_else(|| format!("金額を数値に変換できません({}, {}): {}", row, col, value))?;
    number(worksheet, row, col, amount, format)
}

/// 判定レポートのExcelをバッファに生成
///
/// # Arguments
/// * `evaluations` - RFPごとの判定結果（`Match N` シートになる）
/// * `report` - 集約結果（`Decisions` / `Pricing` / `MTO` シート）
pub fn generate_report_buffer(
    evaluations: &[RfpEvaluation],
    report: &ConsolidatedReport,
) -> Result<Vec<u8>, String> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    // 判定サマリ
    {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name("Decisions")
            .map_err(|e| format!("シート名設定エラー: {}", e))?;
        let headers = ["RFP ID", "Best SKU", "Spec Match %", "Classification", "Voltage Gate", "Route"];
        set_widths(worksheet, headers.len())?;
        write_header(worksheet, 0, &headers, &formats.header)?;

        for (i, row) in report.decisions.iter().enumerate() {
            let r = i as u32 + 1;
            text(worksheet, r, 0, &row.rfp_id, &formats.text)?;
            text(worksheet, r, 1, row.best_sku.as_deref().unwrap_or("-"), &formats.text)?;
            match row.match_pct {
                Some(pct) => number(worksheet, r, 2, pct, &formats.pct)?,
                None => text(worksheet, r, 2, "-", &formats.text)?,
            }
            let tier = row.classification.map(|t| t.as_str()).unwrap_or("-");
            text(worksheet, r, 3, tier, &formats.text)?;
            let gate = if row.voltage_mismatch { "TRIPPED" } else { "OK" };
            text(worksheet, r, 4, gate, &formats.text)?;
            text(worksheet, r, 5, &row.route.to_string(), &formats.text)?;
        }
    }

    // 見積サマリ
    {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name("Pricing")
            .map_err(|e| format!("シート名設定エラー: {}", e))?;
        let headers = ["RFP ID", "SKU", "Classification", "Material Cost (₹)", "Test Cost (₹)", "Total Cost (₹)"];
        set_widths(worksheet, headers.len())?;
        write_header(worksheet, 0, &headers, &formats.header)?;

        for (i, row) in report.pricing.iter().enumerate() {
            let r = i as u32 + 1;
            text(worksheet, r, 0, &row.rfp_id, &formats.text)?;
            text(worksheet, r, 1, &row.sku_id, &formats.text)?;
            text(worksheet, r, 2, row.classification.as_str(), &formats.text)?;
            money(worksheet, r, 3, row.material_cost, &formats.money)?;
            money(worksheet, r, 4, row.test_cost, &formats.money)?;
            money(worksheet, r, 5, row.total_cost, &formats.money)?;
        }
    }

    // MTO差分（差分表を1行ずつ展開）
    {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name("MTO")
            .map_err(|e| format!("シート名設定エラー: {}", e))?;
        let headers = [
            "RFP ID",
            "Reason",
            "Closest SKU",
            "Estimate (₹)",
            "Parameter",
            "RFP Requirement",
            "Closest SKU Value",
            "Match",
        ];
        set_widths(worksheet, headers.len())?;
        write_header(worksheet, 0, &headers, &formats.header)?;

        let mut r: u32 = 1;
        for request in &report.mto_requests {
            let closest = request
                .closest_sku
                .as_ref()
                .map(|c| c.sku_id.as_str())
                .unwrap_or("-");
            for gap in &request.gap_table {
                text(worksheet, r, 0, &request.rfp_id, &formats.text)?;
                text(worksheet, r, 1, &request.reason, &formats.text)?;
                text(worksheet, r, 2, closest, &formats.text)?;
                match request.estimate.estimated_material_cost {
                    Some(cost) => money(worksheet, r, 3, cost, &formats.money)?,
                    None => text(worksheet, r, 3, "-", &formats.text)?,
                }
                text(worksheet, r, 4, &gap.parameter, &formats.text)?;
                text(worksheet, r, 5, gap.rfp_requirement.as_deref().unwrap_or("-"), &formats.text)?;
                text(worksheet, r, 6, gap.closest_sku_value.as_deref().unwrap_or("-"), &formats.text)?;
                text(worksheet, r, 7, yes_no(gap.matched), &formats.text)?;
                r += 1;
            }
        }
    }

    // RFPごとの照合結果
    for (index, evaluation) in evaluations.iter().enumerate() {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(format!("Match {}", index + 1))
            .map_err(|e| format!("シート名設定エラー: {}", e))?;

        let mut headers = vec!["SKU"];
        headers.extend(MatchField::ALL.iter().map(|f| f.label()));
        headers.extend(["Unit Price (₹/km)", "Matched", "Spec Match %", "Classification", "Voltage Gate"]);
        set_widths(worksheet, headers.len())?;

        text(worksheet, 0, 0, &format!("RFP: {}", evaluation.rfp.rfp_id), &formats.header)?;
        write_header(worksheet, 1, &headers, &formats.header)?;

        let field_count = MatchField::ALL.len() as u16;
        let mut r: u32 = 2;
        for entry in &evaluation.ranked {
            text(worksheet, r, 0, &entry.sku.sku_id, &formats.text)?;
            for (i, field) in MatchField::ALL.iter().enumerate() {
                let value = entry.sku.value_text(*field).unwrap_or_default();
                text(worksheet, r, 1 + i as u16, &value, &formats.text)?;
            }
            money(worksheet, r, 1 + field_count, entry.sku.unit_price, &formats.money)?;
            number(worksheet, r, 2 + field_count, entry.matched_count as f64, &formats.text)?;
            number(worksheet, r, 3 + field_count, entry.match_pct, &formats.pct)?;
            text(worksheet, r, 4 + field_count, entry.tier.as_str(), &formats.text)?;
            let gate = if entry.voltage_mismatch { "TRIPPED" } else { "OK" };
            text(worksheet, r, 5 + field_count, gate, &formats.text)?;
            r += 1;
        }

        // 上位SKUの比較表
        r += 1;
        let mut comparison_headers = vec!["Spec", "RFP Requirement"];
        comparison_headers.extend(evaluation.comparison.sku_ids.iter().map(|s| s.as_str()));
        write_header(worksheet, r, &comparison_headers, &formats.header)?;
        r += 1;
        for row in &evaluation.comparison.rows {
            text(worksheet, r, 0, &row.label, &formats.text)?;
            text(worksheet, r, 1, row.required.as_deref().unwrap_or("-"), &formats.text)?;
            for (i, value) in row.values.iter().enumerate() {
                text(worksheet, r, 2 + i as u16, value, &formats.text)?;
            }
            r += 1;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
