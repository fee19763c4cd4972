//! 照合率による判定区分と電圧ゲート

use crate::types::{MatchTier, RequirementSet, SkuRecord};

/// この値以上で STRONG_MATCH
pub const STRONG_MATCH_THRESHOLD: f64 = 80.0;
/// この値以上で PARTIAL_MATCH
pub const PARTIAL_MATCH_THRESHOLD: f64 = 50.0;

/// 照合率から判定区分を決める
pub fn classify_match(pct: f64) -> MatchTier {
    if pct >= STRONG_MATCH_THRESHOLD {
        MatchTier::StrongMatch
    } else if pct >= PARTIAL_MATCH_THRESHOLD {
        MatchTier::PartialMatch
    } else {
        MatchTier::NoMatch
    }
}

/// 電圧クラスの不一致を判定
///
/// 電圧は交渉不可の必須項目。照合率に関係なく、数値として異なれば MTO へ回す。
/// どちらかが欠けている、または数値として読めない場合は不一致としない。
pub fn voltage_mismatch(requirements: &RequirementSet, sku: &SkuRecord) -> bool {
    let Some(required) = requirements.voltage_kv else {
        return false;
    };
    match sku.voltage_kv.trim().parse::<f64>() {
        Ok(offered) if offered.is_finite() && required.is_finite() => offered != required,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn sku_with_voltage(voltage: &str) -> SkuRecord {
        SkuRecord {
            sku_id: "SKU-1".to_string(),
            voltage_kv: voltage.to_string(),
            unit_price: Decimal::from(1000),
            ..Default::default()
        }
    }

    fn requirement_with_voltage(voltage: Option<f64>) -> RequirementSet {
        RequirementSet {
            voltage_kv: voltage,
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify_match(100.0), MatchTier::StrongMatch);
        assert_eq!(classify_match(80.0), MatchTier::StrongMatch);
        assert_eq!(classify_match(79.9), MatchTier::PartialMatch);
        assert_eq!(classify_match(60.0), MatchTier::PartialMatch);
        assert_eq!(classify_match(50.0), MatchTier::PartialMatch);
        assert_eq!(classify_match(49.9), MatchTier::NoMatch);
        assert_eq!(classify_match(40.0), MatchTier::NoMatch);
        assert_eq!(classify_match(0.0), MatchTier::NoMatch);
    }

    #[test]
    fn test_classify_is_monotonic() {
        let rank = |tier: MatchTier| match tier {
            MatchTier::NoMatch => 0,
            MatchTier::PartialMatch => 1,
            MatchTier::StrongMatch => 2,
        };
        let mut prev = rank(classify_match(0.0));
        for step in 0..=100 {
            let current = rank(classify_match(step as f64));
            assert!(current >= prev, "{}%で区分が下がった", step);
            prev = current;
        }
    }

    #[test]
    fn test_voltage_numeric_equality() {
        let req = requirement_with_voltage(Some(11.0));
        assert!(!voltage_mismatch(&req, &sku_with_voltage("11.0")));
        assert!(!voltage_mismatch(&req, &sku_with_voltage("11")));
    }

    #[test]
    fn test_voltage_mismatch_trips() {
        let req = requirement_with_voltage(Some(11.0));
        assert!(voltage_mismatch(&req, &sku_with_voltage("33")));
    }

    #[test]
    fn test_voltage_missing_side_disables_gate() {
        assert!(!voltage_mismatch(&requirement_with_voltage(None), &sku_with_voltage("33")));
        assert!(!voltage_mismatch(&requirement_with_voltage(Some(11.0)), &sku_with_voltage("")));
    }

    #[test]
    fn test_voltage_non_numeric_degrades_to_no_mismatch() {
        let req = requirement_with_voltage(Some(11.0));
        assert!(!voltage_mismatch(&req, &sku_with_voltage("11 kV")));
        assert!(!voltage_mismatch(&req, &sku_with_voltage("NaN")));
    }
}
