//! 要求仕様の各項目の抽出
//!
//! どの関数も、空文字や該当なしの場合は None（`Armoured::Unknown`）を返す。

use regex::Regex;
use rfp_match_common::Armoured;

const CORE_WORDS: [(&str, u32); 13] = [
    ("single", 1),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
];

/// 電圧（kV）: 最初に現れる「数値 kV」
pub fn extract_voltage(text: &str) -> Option<f64> {
    lazy_static::lazy_static! {
        static ref VOLTAGE_RE: Regex = Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*kV").unwrap();
    }

    VOLTAGE_RE
        .captures(text)
        .and_then(|c| c[1].parse::<f64>().ok())
}

/// 導体: アルミ優先、次に銅
pub fn extract_conductor(text: &str) -> Option<String> {
    let t = text.to_lowercase();
    if t.contains("aluminium") {
        Some("Aluminium".to_string())
    } else if t.contains("copper") {
        Some("Copper".to_string())
    } else {
        None
    }
}

/// 絶縁: XLPE優先、次にPVC
pub fn extract_insulation(text: &str) -> Option<String> {
    let t = text.to_lowercase();
    if t.contains("xlpe") {
        Some("XLPE".to_string())
    } else if t.contains("pvc") {
        Some("PVC".to_string())
    } else {
        None
    }
}

/// 心線数
///
/// 対応する表記:
/// - `3 core` / `3-core` / `3 cores`
/// - `number of cores: 3`
/// - `three core` / `three-core construction`
pub fn extract_cores(text: &str) -> Option<u32> {
    lazy_static::lazy_static! {
        static ref NUMERIC_RE: Regex = Regex::new(r"\b(\d{1,2})\s*[- ]?\s*cores?\b").unwrap();
        static ref LABEL_RE: Regex =
            Regex::new(r"\bnumber\s+of\s+cores?\b\s*[:\-]?\s*(\d{1,2})\b").unwrap();
        static ref WORD_RE: Regex = Regex::new(
            r"\b(single|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve)\s*[- ]\s*cores?\b"
        )
        .unwrap();
    }

    // 空白を1つに揃えてから照合
    let t = text.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ");

    if let Some(c) = NUMERIC_RE.captures(&t) {
        return c[1].parse().ok();
    }
    if let Some(c) = LABEL_RE.captures(&t) {
        return c[1].parse().ok();
    }
    WORD_RE.captures(&t).and_then(|c| {
        CORE_WORDS
            .iter()
            .find(|(word, _)| *word == &c[1])
            .map(|(_, n)| *n)
    })
}

/// 外装（アーマー）の有無
///
/// 否定形（unarmoured / non-armoured）を先に判定する。
pub fn extract_armouring(text: &str) -> Armoured {
    lazy_static::lazy_static! {
        static ref NEGATED_RE: Regex = Regex::new(r"\b(un|non)[- ]?armou?red\b").unwrap();
        static ref ARMOURED_RE: Regex = Regex::new(r"\barmou?red\b").unwrap();
        static ref YES_RE: Regex = Regex::new(r"\byes\b").unwrap();
        static ref NO_RE: Regex = Regex::new(r"\bno\b").unwrap();
    }

    let t = text.to_lowercase();

    if NEGATED_RE.is_match(&t) {
        return Armoured::No;
    }
    if ARMOURED_RE.is_match(&t) {
        return Armoured::Yes;
    }
    if t.contains("armouring") {
        if YES_RE.is_match(&t) {
            return Armoured::Yes;
        }
        if NO_RE.is_match(&t) {
            return Armoured::No;
        }
    }
    Armoured::Unknown
}
