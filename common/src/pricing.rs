//! 見積計算
//!
//! - 材料費 = km単価 × 数量(km)
//! - 試験費 = 試験価格表の合計（全SKU共通）
//! - 合計 = 材料費 + 試験費
//!
//! 見積対象は STRONG_MATCH / PARTIAL_MATCH かつ電圧ゲートを通過したSKUのみ。

use crate::catalog::{parse_amount, Table};
use crate::error::{Error, Result};
use crate::matching::RankedSku;
use crate::types::MatchTier;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 価格列とみなす列名のキーワード
pub const PRICE_COLUMN_KEYWORDS: [&str; 4] = ["price", "cost", "amount", "inr"];

/// 試験1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestPrice {
    pub name: String,
    pub price: Decimal,
}

/// 試験価格表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestPriceTable {
    pub price_column: String,
    pub entries: Vec<TestPrice>,
}

impl TestPriceTable {
    /// 表から試験価格表を組み立てる
    ///
    /// 列名は前後空白除去・小文字化して扱う。価格列が見つからなければ設定エラー。
    pub fn from_table(table: &Table) -> Result<Self> {
        let headers: Vec<String> = table
            .headers
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let price_col = resolve_price_column(&headers)?;
        let name_col = (0..headers.len()).find(|&c| c != price_col);

        let mut entries = Vec::new();
        for row in 0..table.rows.len() {
            let raw = table.cell(row, price_col);
            if raw.is_empty() {
                continue;
            }

            let price = parse_amount(raw).ok_or_else(|| Error::InvalidPrice {
                row: row + 2,
                column: headers[price_col].clone(),
                value: raw.to_string(),
            })?;

            let name = name_col
                .map(|c| table.cell(row, c).to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("Test {}", row + 1));

            entries.push(TestPrice { name, price });
        }

        Ok(Self {
            price_column: headers[price_col].clone(),
            entries,
        })
    }

    /// 試験費の合計
    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|e| e.price).sum()
    }
}

/// 価格列を特定する
///
/// キーワードを含む最初の列（列順）を採用する。複数該当時は警告を出す。
pub fn resolve_price_column(headers: &[String]) -> Result<usize> {
    let candidates: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| {
            let h = h.to_lowercase();
            PRICE_COLUMN_KEYWORDS.iter().any(|k| h.contains(k))
        })
        .map(|(i, _)| i)
        .collect();

    match candidates.as_slice() {
        [] => Err(Error::MissingPriceColumn {
            columns: headers.to_vec(),
        }),
        [first, rest @ ..] => {
            if !rest.is_empty() {
                tracing::warn!(
                    selected = %headers[*first],
                    candidates = candidates.len(),
                    "価格列の候補が複数あります。先頭の列を使用します"
                );
            }
            Ok(*first)
        }
    }
}

/// SKUごとの見積行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLine {
    pub sku_id: String,
    pub tier: MatchTier,
    pub match_pct: f64,
    pub unit_price: Decimal,
    pub quantity_km: Decimal,
    pub material_cost: Decimal,
    pub test_cost: Decimal,
    pub total_cost: Decimal,
}

/// 見積対象SKUの見積を計算する（順位順を保つ）
pub fn compute_pricing(
    ranked: &[RankedSku],
    quantity_km: Decimal,
    tests: &TestPriceTable,
) -> Vec<PriceLine> {
    let test_cost = tests.total();

    ranked
        .iter()
        .filter(|r| r.is_priceable())
        .map(|r| {
            let material_cost = r.sku.unit_price * quantity_km;
            PriceLine {
                sku_id: r.sku.sku_id.clone(),
                tier: r.tier,
                match_pct: r.match_pct,
                unit_price: r.sku.unit_price,
                quantity_km,
                material_cost,
                test_cost,
                total_cost: material_cost + test_cost,
            }
        })
        .collect()
}
