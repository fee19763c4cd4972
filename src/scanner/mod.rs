//! RFPフォルダのスキャンと優先度付け

pub mod document;

use crate::error::{Result, RfpMatchError};
use chrono::{Duration, NaiveDate};
use rfp_match_common::RfpMeta;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub use document::{extract_full_text, parse_date};

/// RFPの入手元
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RfpSource {
    Pdf,
    Html,
    Email,
    Json,
}

impl RfpSource {
    /// 拡張子から入手元を判定（対象外は None）
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "pdf" => Some(RfpSource::Pdf),
            "html" | "htm" => Some(RfpSource::Html),
            "txt" => Some(RfpSource::Email),
            "json" => Some(RfpSource::Json),
            _ => None,
        }
    }
}

impl std::fmt::Display for RfpSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RfpSource::Pdf => write!(f, "PDF"),
            RfpSource::Html => write!(f, "HTML"),
            RfpSource::Email => write!(f, "EMAIL"),
            RfpSource::Json => write!(f, "JSON"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfpDocument {
    pub meta: RfpMeta,
    pub source: RfpSource,
    pub path: PathBuf,
}

impl RfpDocument {
    /// 期限までの日数（期限切れは負、期限不明は None）
    pub fn days_left(&self, today: NaiveDate) -> Option<i64> {
        self.meta.due_date.map(|due| (due - today).num_days())
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// フォルダ直下のRFP文書を読み込む
///
/// 解析に失敗したファイルは警告を出してスキップする。
pub fn scan_rfps(folder: &Path) -> Result<Vec<RfpDocument>> {
    if !folder.is_dir() {
        return Err(RfpMatchError::FolderNotFound(folder.display().to_string()));
    }

    let mut rfps = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)  // 直下のみ（再帰しない）
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let Some(source) = RfpSource::from_path(path) else {
            tracing::debug!(path = %path.display(), "対象外のファイル");
            continue;
        };

        match document::parse_document(path, source) {
            Ok(doc) => {
                tracing::debug!(rfp_id = %doc.meta.rfp_id, source = %doc.source, "RFPを検出");
                rfps.push(doc);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "RFP文書の解析に失敗したためスキップします");
            }
        }
    }

    Ok(rfps)
}

/// 期限が `today + days` 以内のRFPを期限順に並べる
///
/// 期限切れは含め、期限不明は除く。日付の範囲を超える `days` は上限/下限で打ち切る。
pub fn prioritize_rfps(rfps: &[RfpDocument], days: i64, today: NaiveDate) -> Vec<RfpDocument> {
    let cutoff = Duration::try_days(days)
        .and_then(|d| today.checked_add_signed(d))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX });

    let mut eligible: Vec<RfpDocument> = rfps
        .iter()
        .filter(|r| r.meta.due_date.is_some_and(|due| due <= cutoff))
        .cloned()
        .collect();

    eligible.sort_by_key(|r| r.meta.due_date);
    eligible
}
