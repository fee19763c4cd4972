//! RFP文書の読み込み
//!
//! 形式ごとに本文を取り出し、RFP番号と提出期限を拾う。

use super::{RfpDocument, RfpSource};
use crate::error::{Result, RfpMatchError};
use chrono::NaiveDate;
use regex::Regex;
use rfp_match_common::RfpMeta;
use std::path::Path;

lazy_static::lazy_static! {
    static ref PDF_ID_RE: Regex = Regex::new(r"RFP\s*NO\.?\s*[:\-]?\s*(.+)").unwrap();
    static ref PDF_DUE_RE: Regex =
        Regex::new(r"Last date.*submission.*(\d{2}[/-]\d{2}[/-]\d{4})").unwrap();
    static ref NOTICE_ID_RE: Regex = Regex::new(r"RFP ID:\s*(\S+)").unwrap();
    static ref NOTICE_DUE_RE: Regex = Regex::new(r"Due Date:\s*(\d{2}-\d{2}-\d{4})").unwrap();
    static ref TAG_RE: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
    static ref SCRIPT_RE: Regex = Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").unwrap();
}

/// 日付を解釈（dd-mm-yyyy / dd/mm/yyyy）
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    ["%d-%m-%Y", "%d/%m/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// 文書の本文テキストを取得
pub fn extract_full_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(RfpMatchError::FileNotFound(path.display().to_string()));
    }

    match RfpSource::from_path(path) {
        Some(RfpSource::Pdf) => pdf_text(path),
        Some(RfpSource::Html) => Ok(strip_html(&std::fs::read_to_string(path)?)),
        Some(RfpSource::Email) => Ok(std::fs::read_to_string(path)?),
        Some(RfpSource::Json) => {
            let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
            let mut lines = Vec::new();
            collect_strings(&value, &mut lines);
            Ok(lines.join("\n"))
        }
        None => Err(RfpMatchError::UnsupportedFormat(path.display().to_string())),
    }
}

/// PDFの全ページからテキストを抽出（ページ間は改行）
pub fn pdf_text(path: &Path) -> Result<String> {
    let doc = lopdf::Document::load(path)
        .map_err(|e| RfpMatchError::DocumentParse(format!("{}: {}", path.display(), e)))?;

    let mut text = String::new();
    for page in doc.get_pages().keys() {
        match doc.extract_text(&[*page]) {
            Ok(page_text) if !page_text.trim().is_empty() => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(page, error = %e, "ページのテキスト抽出をスキップ"),
        }
    }
    Ok(text)
}

/// HTMLのタグを除去して本文だけにする
pub fn strip_html(html: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(html, " ");
    let text = TAG_RE.replace_all(&without_scripts, " ");
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn collect_strings(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::String(s) => out.push(s.clone()),
        serde_json::Value::Array(items) => items.iter().for_each(|v| collect_strings(v, out)),
        serde_json::Value::Object(map) => map.values().for_each(|v| collect_strings(v, out)),
        _ => {}
    }
}

/// PDF本文からRFP情報を取り出す
pub fn meta_from_pdf_text(text: &str) -> RfpMeta {
    let rfp_id = PDF_ID_RE
        .captures(text)
        .map(|c| c[1].trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| "UNKNOWN_PDF".to_string());
    let due_date = PDF_DUE_RE.captures(text).and_then(|c| parse_date(&c[1]));
    RfpMeta { rfp_id, due_date }
}

/// 公告ページ・メール本文からRFP情報を取り出す
pub fn meta_from_notice_text(text: &str, fallback_id: &str) -> RfpMeta {
    let rfp_id = NOTICE_ID_RE
        .captures(text)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| fallback_id.to_string());
    let due_date = NOTICE_DUE_RE.captures(text).and_then(|c| parse_date(&c[1]));
    RfpMeta { rfp_id, due_date }
}

/// JSON形式のRFP情報（due_date は必須）
pub fn meta_from_json(content: &str) -> Result<RfpMeta> {
    let value: serde_json::Value = serde_json::from_str(content)?;

    let rfp_id = value
        .get("rfp_id")
        .and_then(|v| v.as_str())
        .unwrap_or("UNKNOWN_JSON")
        .to_string();

    let raw_due = value
        .get("due_date")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RfpMatchError::DocumentParse("due_date がありません".into()))?;
    let due_date = NaiveDate::parse_from_str(raw_due.trim(), "%Y-%m-%d")
        .map_err(|e| RfpMatchError::DocumentParse(format!("due_date を解釈できません: {} ({})", raw_due, e)))?;

    Ok(RfpMeta {
        rfp_id,
        due_date: Some(due_date),
    })
}

/// 1ファイルを解析
pub fn parse_document(path: &Path, source: RfpSource) -> Result<RfpDocument> {
    let meta = match source {
        RfpSource::Pdf => meta_from_pdf_text(&pdf_text(path)?),
        RfpSource::Html => {
            let text = strip_html(&std::fs::read_to_string(path)?);
            meta_from_notice_text(&text, "UNKNOWN_HTML")
        }
        RfpSource::Email => {
            meta_from_notice_text(&std::fs::read_to_string(path)?, "UNKNOWN_EMAIL")
        }
        RfpSource::Json => meta_from_json(&std::fs::read_to_string(path)?)?,
    };

    Ok(RfpDocument {
        meta,
        source,
        path: path.to_path_buf(),
    })
}
