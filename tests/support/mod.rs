//! 統合テスト用のデータ作成

#![allow(dead_code)]

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("日付生成失敗")
}

pub fn write_catalog(dir: &Path) -> PathBuf {
    let path = dir.join("skus.csv");
    std::fs::write(
        &path,
        "SKU_ID,Product_Category,Voltage_kV,Conductor,Insulation,Cores,Armoured,Unit_Price_per_km_INR\n\
         SKU-A,LT Power Cables,11,Aluminium,XLPE,3,Yes,1000\n\
         SKU-B,LT Power Cables,11,Copper,XLPE,3,Yes,800\n\
         SKU-C,HT Power Cables,33,Aluminium,XLPE,3,Yes,900\n",
    )
    .expect("SKUマスタ作成失敗");
    path
}

pub fn write_test_prices(dir: &Path) -> PathBuf {
    let path = dir.join("test_prices.csv");
    std::fs::write(
        &path,
        "Test_Name,Price_INR\nRoutine Test,5000\nType Test,15000\nAcceptance Test,2000\n",
    )
    .expect("試験価格表作成失敗");
    path
}

/// メール・公告ページ・期限外のJSONを1件ずつ置いたRFPフォルダ
pub fn write_rfp_folder(dir: &Path) -> PathBuf {
    let folder = dir.join("rfps");
    std::fs::create_dir_all(&folder).expect("フォルダ作成失敗");

    std::fs::write(
        folder.join("01_mail.txt"),
        "Subject: Cable tender\n\
         RFP ID: MAIL-001\n\
         Due Date: 15-11-2026\n\
         \n\
         Technical Requirements\n\
         Supply of 11 kV Aluminium conductor, XLPE insulated, 3 core armoured cable.\n\
         Security\n\
         Bid security of 2%.\n",
    )
    .expect("メール作成失敗");

    std::fs::write(
        folder.join("02_notice.html"),
        "<html><body>\
         <h1>Tender notice</h1>\
         <p>RFP ID: WEB-002</p><p>Due Date: 01-11-2026</p>\
         <h2>Scope of Supply</h2>\
         <ul><li>66 kV copper cable</li><li>PVC insulation, 4 core</li><li>Unarmoured</li></ul>\
         <h2>Integration Approach</h2><p>aluminium trays</p>\
         </body></html>",
    )
    .expect("HTML作成失敗");

    std::fs::write(
        folder.join("03_portal.json"),
        r#"{"rfp_id": "JSON-003", "due_date": "2027-08-01", "title": "Technical Requirements: 11 kV"}"#,
    )
    .expect("JSON作成失敗");

    folder
}
