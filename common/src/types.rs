//! 照合で使う型定義
//!
//! CLIと照合エンジンで共有される型:
//! - RequirementSet: RFPから抽出した要求仕様
//! - SkuRecord: SKUマスタの1行
//! - MatchField / MatchTier: 照合項目と判定区分

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 外装（アーマー）有無の三値
///
/// 抽出できなかった場合やマスタのセルが空の場合は `Unknown`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<ArmouredRepr>", into = "Option<String>")]
pub enum Armoured {
    Yes,
    No,
    #[default]
    Unknown,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ArmouredRepr {
    Flag(bool),
    Text(String),
}

impl Armoured {
    /// 文字列から判定（大文字小文字は無視）
    pub fn parse(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" | "1" | "armoured" => Armoured::Yes,
            "no" | "n" | "false" | "0" | "unarmoured" | "non-armoured" => Armoured::No,
            _ => Armoured::Unknown,
        }
    }

    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Armoured::Yes => Some("Yes"),
            Armoured::No => Some("No"),
            Armoured::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Armoured::Unknown)
    }
}

impl From<Option<ArmouredRepr>> for Armoured {
    fn from(value: Option<ArmouredRepr>) -> Self {
        match value {
            Some(ArmouredRepr::Flag(true)) => Armoured::Yes,
            Some(ArmouredRepr::Flag(false)) => Armoured::No,
            Some(ArmouredRepr::Text(text)) => Armoured::parse(&text),
            None => Armoured::Unknown,
        }
    }
}

impl From<Armoured> for Option<String> {
    fn from(value: Armoured) -> Self {
        value.as_str().map(String::from)
    }
}

impl std::fmt::Display for Armoured {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().unwrap_or("-"))
    }
}

/// 照合対象の5項目（この順で比較・表示する）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchField {
    Voltage,
    Conductor,
    Insulation,
    Cores,
    Armoured,
}

impl MatchField {
    pub const ALL: [MatchField; 5] = [
        MatchField::Voltage,
        MatchField::Conductor,
        MatchField::Insulation,
        MatchField::Cores,
        MatchField::Armoured,
    ];

    /// 表示ラベル
    pub fn label(&self) -> &'static str {
        match self {
            MatchField::Voltage => "Voltage (kV)",
            MatchField::Conductor => "Conductor",
            MatchField::Insulation => "Insulation",
            MatchField::Cores => "Cores",
            MatchField::Armoured => "Armoured",
        }
    }

    /// 要求仕様JSONのキー
    pub fn requirement_key(&self) -> &'static str {
        match self {
            MatchField::Voltage => "voltage_kV",
            MatchField::Conductor => "conductor",
            MatchField::Insulation => "insulation",
            MatchField::Cores => "cores",
            MatchField::Armoured => "armoured",
        }
    }

    /// SKUマスタの列名
    pub fn catalog_column(&self) -> &'static str {
        match self {
            MatchField::Voltage => "Voltage_kV",
            MatchField::Conductor => "Conductor",
            MatchField::Insulation => "Insulation",
            MatchField::Cores => "Cores",
            MatchField::Armoured => "Armoured",
        }
    }
}

impl std::fmt::Display for MatchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 照合判定区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchTier {
    StrongMatch,
    PartialMatch,
    NoMatch,
}

impl MatchTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchTier::StrongMatch => "STRONG_MATCH",
            MatchTier::PartialMatch => "PARTIAL_MATCH",
            MatchTier::NoMatch => "NO_MATCH",
        }
    }
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// RFPから抽出した要求仕様
///
/// どの項目も抽出できなかった場合は `None`（`Unknown`）になる。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementSet {
    #[serde(rename = "voltage_kV", default)]
    pub voltage_kv: Option<f64>,

    #[serde(default)]
    pub conductor: Option<String>,

    #[serde(default)]
    pub insulation: Option<String>,

    #[serde(default)]
    pub cores: Option<u32>,

    #[serde(default)]
    pub armoured: Armoured,
}

impl RequirementSet {
    /// 比較用の文字列表現（未抽出なら `None`）
    pub fn value_text(&self, field: MatchField) -> Option<String> {
        match field {
            MatchField::Voltage => self.voltage_kv.map(format_number),
            MatchField::Conductor => non_empty(self.conductor.as_deref()),
            MatchField::Insulation => non_empty(self.insulation.as_deref()),
            MatchField::Cores => self.cores.map(|c| c.to_string()),
            MatchField::Armoured => self.armoured.as_str().map(String::from),
        }
    }

    /// 未抽出の項目一覧
    pub fn missing_fields(&self) -> Vec<MatchField> {
        MatchField::ALL
            .iter()
            .copied()
            .filter(|f| self.value_text(*f).is_none())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.missing_fields().len() == MatchField::ALL.len()
    }
}

/// SKUマスタの1行
///
/// 属性値はマスタのセル内容をそのまま保持する（数値セルは正規化済み文字列）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkuRecord {
    pub sku_id: String,

    #[serde(default)]
    pub product_category: Option<String>,

    #[serde(default)]
    pub voltage_kv: String,

    #[serde(default)]
    pub conductor: String,

    #[serde(default)]
    pub insulation: String,

    #[serde(default)]
    pub cores: String,

    #[serde(default)]
    pub armoured: Armoured,

    /// km当たり単価（INR）
    pub unit_price: Decimal,
}

impl SkuRecord {
    /// 比較用の文字列表現（空セルなら `None`）
    pub fn value_text(&self, field: MatchField) -> Option<String> {
        match field {
            MatchField::Voltage => non_empty(Some(&self.voltage_kv)),
            MatchField::Conductor => non_empty(Some(&self.conductor)),
            MatchField::Insulation => non_empty(Some(&self.insulation)),
            MatchField::Cores => non_empty(Some(&self.cores)),
            MatchField::Armoured => self.armoured.as_str().map(String::from),
        }
    }
}

/// RFPの識別情報
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfpMeta {
    pub rfp_id: String,

    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// 数値を比較用の文字列に変換（11.0 → "11"）
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

/// 比較用トークンに正規化
///
/// 前後空白除去・小文字化し、数値として読める場合は数値の表記に揃える。
pub fn normalize_token(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    match lowered.parse::<f64>() {
        Ok(n) if n.is_finite() => format_number(n),
        _ => lowered,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
