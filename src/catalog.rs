//! SKUマスタ・試験価格表の読み込み
//!
//! xlsx/xls/ods は calamine、csv は csv クレートで読み込み、
//! 文字列の表（先頭行がヘッダー）に揃えてから共通ライブラリに渡す。

use crate::error::{Result, RfpMatchError};
use calamine::{open_workbook_auto, Data, Reader};
use rfp_match_common::types::format_number;
use rfp_match_common::{SkuCatalog, Table, TestPriceTable};
use std::path::Path;

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// 表ファイルを読み込む（先頭シート・先頭行をヘッダーとする）
pub fn read_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(RfpMatchError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let table = if ext == "csv" {
        read_csv(path)?
    } else if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
        read_spreadsheet(path)?
    } else {
        return Err(RfpMatchError::UnsupportedFormat(path.display().to_string()));
    };

    tracing::debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "表を読み込みました"
    );
    Ok(table)
}

fn read_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|c| c.trim().to_string()).collect());
    }

    Ok(Table::new(headers, rows))
}

fn read_spreadsheet(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| RfpMatchError::InvalidTable(format!("{}: {}", path.display(), e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| RfpMatchError::InvalidTable(format!("{}: シートがありません", path.display())))?
        .map_err(|e| RfpMatchError::InvalidTable(format!("{}: {}", path.display(), e)))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header) => header.iter().map(cell_text).collect(),
        None => Vec::new(),
    };
    let rows = rows.map(|row| row.iter().map(cell_text).collect()).collect();

    Ok(Table::new(headers, rows))
}

/// セルを文字列化（数値は 11.0 → "11" のように揃える）
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// SKUマスタを読み込む
pub fn load_skus(path: &Path) -> Result<SkuCatalog> {
    let table = read_table(path)?;
    let catalog = SkuCatalog::from_table(&table)?;
    if catalog.is_empty() {
        tracing::warn!(path = %path.display(), "SKUマスタが空です。すべてのRFPがMTOになります");
    }
    Ok(catalog)
}

/// 試験価格表を読み込む
pub fn load_test_prices(path: &Path) -> Result<TestPriceTable> {
    let table = read_table(path)?;
    Ok(TestPriceTable::from_table(&table)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfp_match_common::Armoured;
    use rust_decimal::Decimal;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_read_csv_catalog() {
        let dir = tempdir().expect("一時ディレクトリ作成失敗");
        let path = dir.path().join("skus.csv");
        fs::write(
            &path,
            "\u{feff}SKU_ID,Product_Category,Voltage_kV,Conductor,Insulation,Cores,Armoured,Unit_Price_per_km_INR\n\
             SKU-1,LT Power,11,Aluminium,XLPE,3,Yes,\"1,20,000\"\n\
             SKU-2,LT Power,1.1,Copper,PVC,4,No,90000\n",
        )
        .unwrap();

        let catalog = load_skus(&path).expect("SKUマスタ読み込み失敗");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.records()[0].unit_price, Decimal::from(120000));
        assert_eq!(catalog.records()[1].armoured, Armoured::No);
    }

    #[test]
    fn test_read_csv_test_prices() {
        let dir = tempdir().expect("一時ディレクトリ作成失敗");
        let path = dir.path().join("tests.csv");
        fs::write(&path, " Test Name , Price (INR) \nRoutine,100\nType,250\n").unwrap();

        let prices = load_test_prices(&path).expect("試験価格表読み込み失敗");
        assert_eq!(prices.price_column, "price (inr)");
        assert_eq!(prices.total(), Decimal::from(350));
    }

    #[test]
    fn test_test_price_total_is_exact() {
        let dir = tempdir().expect("一時ディレクトリ作成失敗");
        let path = dir.path().join("tests.csv");
        fs::write(&path, "test,price
Routine,0.1
Type,0.2
").unwrap();

        let prices = load_test_prices(&path).expect("試験価格表読み込み失敗");
        assert_eq!(prices.total(), Decimal::new(3, 1));
        assert_eq!(serde_json::to_string(&prices.total()).unwrap(), "\"0.3\"");
    }

    #[test]
    fn test_missing_price_column_is_fatal() {
        let dir = tempdir().expect("一時ディレクトリ作成失敗");
        let path = dir.path().join("tests.csv");
        fs::write(&path, "test,remarks\nRoutine,ok\n").unwrap();

        let err = load_test_prices(&path).unwrap_err();
        assert!(matches!(
            err,
            RfpMatchError::Common(rfp_match_common::Error::MissingPriceColumn { .. })
        ));
    }

    #[test]
    fn test_missing_file_and_unknown_extension() {
        let dir = tempdir().expect("一時ディレクトリ作成失敗");
        assert!(matches!(
            read_table(&dir.path().join("none.csv")),
            Err(RfpMatchError::FileNotFound(_))
        ));

        let path = dir.path().join("skus.txt");
        fs::write(&path, "SKU_ID").unwrap();
        assert!(matches!(read_table(&path), Err(RfpMatchError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_cell_text_normalizes_numbers() {
        assert_eq!(cell_text(&Data::Float(11.0)), "11");
        assert_eq!(cell_text(&Data::Float(1.1)), "1.1");
        assert_eq!(cell_text(&Data::Int(3)), "3");
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String(" XLPE ".into())), "XLPE");
    }
}
