pub mod excel;
pub mod mto;

use crate::cli::ExportFormat;
use crate::error::Result;
use crate::pipeline::PipelineReport;
use std::path::{Path, PathBuf};

/// 出力したファイル
#[derive(Debug, Clone, Default)]
pub struct ExportedFiles {
    pub json: Option<PathBuf>,
    pub excel: Option<PathBuf>,
    pub mto_requests: Vec<PathBuf>,
}

fn output_path_for_format(output: &Path, title: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", title, extension))
    } else {
        output.with_extension(extension)
    }
}

fn output_dir_of(output: &Path) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.to_path_buf()
    } else {
        output
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// 判定結果を出力する
///
/// MTO依頼ファイルは形式に関係なく出力先フォルダに書き出す。
pub fn export_report(
    pipeline: &PipelineReport,
    format: &ExportFormat,
    output: &Path,
    title: &str,
) -> Result<ExportedFiles> {
    let output_dir = output_dir_of(output);
    std::fs::create_dir_all(&output_dir)?;

    let mut files = ExportedFiles::default();

    if matches!(format, ExportFormat::Json | ExportFormat::Both) {
        let json_path = output_path_for_format(output, title, "json");
        println!("- JSONを生成中...");
        let json = serde_json::to_string_pretty(pipeline)?;
        std::fs::write(&json_path, json)?;
        println!("✔ JSON出力: {}", json_path.display());
        files.json = Some(json_path);
    }

    if matches!(format, ExportFormat::Excel | ExportFormat::Both) {
        let excel_path = output_path_for_format(output, title, "xlsx");
        println!("- Excelを生成中...");
        excel::generate_excel(&pipeline.evaluations, &pipeline.report, &excel_path)?;
        println!("✔ Excel出力: {}", excel_path.display());
        files.excel = Some(excel_path);
    }

    files.mto_requests = mto::write_mto_requests(&pipeline.report.mto_requests, &output_dir)?;
    for path in &files.mto_requests {
        println!("✔ MTO依頼: {}", path.display());
    }

    Ok(files)
}
