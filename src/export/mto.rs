//! MTO依頼ファイルの出力
//!
//! 依頼1件につき `mto_<rfp_id>.json` を1ファイル書き出す。

use crate::error::Result;
use rfp_match_common::MtoRequest;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// RFP番号からファイル名を作る（英数字・`-`・`_` 以外は `_` に置換）
pub fn mto_file_name(rfp_id: &str) -> String {
    let sanitized: String = rfp_id
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = if sanitized.is_empty() { "UNKNOWN".to_string() } else { sanitized };
    format!("mto_{}.json", stem)
}

/// MTO依頼を書き出す
///
/// 同じファイル名になる依頼が複数あれば `_2`, `_3` … を付ける。
pub fn write_mto_requests(requests: &[MtoRequest], output_dir: &Path) -> Result<Vec<PathBuf>> {
    if requests.is_empty() {
        return Ok(Vec::new());
    }

    std::fs::create_dir_all(output_dir)?;

    let mut used = HashSet::new();
    let mut written = Vec::with_capacity(requests.len());

    for request in requests {
        let base = mto_file_name(&request.rfp_id);
        let mut name = base.clone();
        let mut n = 2;
        while !used.insert(name.clone()) {
            name = format!("{}_{}.json", base.trim_end_matches(".json"), n);
            n += 1;
        }

        let path = output_dir.join(&name);
        let json = serde_json::to_string_pretty(request)?;
        std::fs::write(&path, json)?;
        tracing::debug!(path = %path.display(), "MTO依頼を出力");
        written.push(path);
    }

    Ok(written)
}
