//! SKUマスタ
//!
//! 表形式データ（ヘッダー行 + データ行）からSKUマスタを組み立てる。
//! ファイルの読み込み（xlsx/csv）はCLI側で行い、ここでは文字列の表だけを扱う。

use crate::error::{Error, Result};
use crate::types::{Armoured, MatchField, SkuRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const SKU_ID_COLUMN: &str = "SKU_ID";
pub const PRODUCT_CATEGORY_COLUMN: &str = "Product_Category";
pub const UNIT_PRICE_COLUMN: &str = "Unit_Price_per_km_INR";

/// 文字列化済みの表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// 列名から列番号を取得（大文字小文字・前後空白は無視）
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.headers
            .iter()
            .position(|h| h.trim().to_lowercase() == wanted)
    }

    /// セルの値（範囲外は空文字）
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|s| s.trim())
            .unwrap_or("")
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }
}

/// 読み込み済みSKUマスタ（実行中は読み取り専用）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkuCatalog {
    records: Vec<SkuRecord>,
}

impl SkuCatalog {
    pub fn new(records: Vec<SkuRecord>) -> Self {
        Self { records }
    }

    /// 表からSKUマスタを組み立てる
    ///
    /// 必須列: SKU_ID, Voltage_kV, Conductor, Insulation, Cores, Armoured,
    /// Unit_Price_per_km_INR。Product_Category は任意。
    pub fn from_table(table: &Table) -> Result<Self> {
        let id_col = table.require_column(SKU_ID_COLUMN)?;
        let price_col = table.require_column(UNIT_PRICE_COLUMN)?;
        let category_col = table.column_index(PRODUCT_CATEGORY_COLUMN);

        let mut field_cols = Vec::with_capacity(MatchField::ALL.len());
        for field in MatchField::ALL {
            field_cols.push((field, table.require_column(field.catalog_column())?));
        }

        let mut records = Vec::new();

        for row in 0..table.rows.len() {
            let sku_id = table.cell(row, id_col);
            if sku_id.is_empty() {
                if table.rows[row].iter().any(|c| !c.trim().is_empty()) {
                    tracing::warn!(row = row + 2, "SKU_IDが空の行をスキップ");
                }
                continue;
            }

            let raw_price = table.cell(row, price_col);
            let unit_price = parse_amount(raw_price).ok_or_else(|| Error::InvalidPrice {
                row: row + 2,
                column: UNIT_PRICE_COLUMN.to_string(),
                value: raw_price.to_string(),
            })?;

            let mut record = SkuRecord {
                sku_id: sku_id.to_string(),
                product_category: category_col
                    .map(|c| table.cell(row, c).to_string())
                    .filter(|c| !c.is_empty()),
                unit_price,
                ..Default::default()
            };

            for &(field, col) in &field_cols {
                let value = table.cell(row, col).to_string();
                match field {
                    MatchField::Voltage => record.voltage_kv = value,
                    MatchField::Conductor => record.conductor = value,
                    MatchField::Insulation => record.insulation = value,
                    MatchField::Cores => record.cores = value,
                    MatchField::Armoured => record.armoured = Armoured::parse(&value),
                }
            }

            records.push(record);
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[SkuRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, sku_id: &str) -> Option<&SkuRecord> {
        self.records.iter().find(|r| r.sku_id == sku_id)
    }
}

/// 金額文字列を10進数に変換（桁区切りのカンマ・₹記号は除去）
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .trim()
        .trim_start_matches('₹')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    Decimal::from_str(cleaned.trim()).ok()
}
