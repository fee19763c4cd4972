//! Excel生成（CLI版）
//!
//! 共通ライブラリでバッファを生成し、ファイルに書き出す。

use crate::error::{Result, RfpMatchError};
use rfp_match_common::export::excel_core::generate_report_buffer;
use rfp_match_common::{ConsolidatedReport, RfpEvaluation};
use std::path::Path;

pub fn generate_excel(
    evaluations: &[RfpEvaluation],
    report: &ConsolidatedReport,
    output_path: &Path,
) -> Result<()> {
    let buffer = generate_report_buffer(evaluations, report).map_err(RfpMatchError::ExcelGeneration)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, buffer)?;

    Ok(())
}
