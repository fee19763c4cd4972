use crate::error::{Result, RfpMatchError};
use crate::normalizer::SectionKeywords;
use rfp_match_common::comparison::DEFAULT_TOP_N;
use rfp_match_common::mto::DEFAULT_MTO_PREMIUM;
use rfp_match_common::EvaluationOptions;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 設定ファイルの場所を上書きする環境変数
pub const CONFIG_ENV: &str = "RFP_MATCH_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub test_prices_path: PathBuf,
    pub rfp_folder: PathBuf,
    pub quantity_km: Decimal,
    pub horizon_days: i64,
    pub top_n: usize,
    pub mto_premium: Decimal,
    pub section_keywords: SectionKeywords,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "設定を読み込みました");
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        // 環境変数を優先
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| RfpMatchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("rfp-match").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            catalog_path: PathBuf::from("data/skus/SKUs.xlsx"),
            test_prices_path: PathBuf::from("data/pricing/test_prices.xlsx"),
            rfp_folder: PathBuf::from("data/rfps_sales"),
            quantity_km: Decimal::from(10),
            horizon_days: 90,
            top_n: DEFAULT_TOP_N,
            mto_premium: DEFAULT_MTO_PREMIUM,
            section_keywords: SectionKeywords::default(),
        }
    }

    /// 判定オプション（数量はCLI指定があればそちらを使う）
    ///
    /// 数量は正、上乗せ率は0以上でなければ設定エラー。
    pub fn evaluation_options(&self, quantity_km: Option<Decimal>) -> Result<EvaluationOptions> {
        let quantity_km = validate_quantity(quantity_km.unwrap_or(self.quantity_km))?;
        if self.mto_premium < Decimal::ZERO {
            return Err(RfpMatchError::Config(format!(
                "MTO上乗せ率は0以上で指定してください: {}",
                self.mto_premium
            )));
        }

        Ok(EvaluationOptions {
            quantity_km,
            top_n: self.top_n,
            mto_premium: self.mto_premium,
        })
    }

    pub fn set_catalog(&mut self, path: PathBuf) -> Result<()> {
        self.catalog_path = path;
        self.save()
    }

    pub fn set_test_prices(&mut self, path: PathBuf) -> Result<()> {
        self.test_prices_path = path;
        self.save()
    }

    pub fn set_quantity(&mut self, quantity_km: Decimal) -> Result<()> {
        self.quantity_km = validate_quantity(quantity_km)?;
        self.save()
    }
}

fn validate_quantity(quantity_km: Decimal) -> Result<Decimal> {
    if quantity_km <= Decimal::ZERO {
        return Err(RfpMatchError::Config(format!(
            "数量は正の数で指定してください: {}",
            quantity_km
        )));
    }
    Ok(quantity_km)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.quantity_km, Decimal::from(10));
        assert_eq!(config.horizon_days, 90);
        assert_eq!(config.top_n, 3);
        assert_eq!(config.mto_premium, Decimal::new(25, 2));
        assert_eq!(config.catalog_path, PathBuf::from("data/skus/SKUs.xlsx"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().expect("一時ディレクトリ作成失敗");
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.quantity_km = Decimal::new(255, 1);
        config.save_to(&path).expect("保存失敗");

        let loaded = Config::load_from(&path).expect("読み込み失敗");
        assert_eq!(loaded.quantity_km, Decimal::new(255, 1));
        assert_eq!(loaded.section_keywords, config.section_keywords);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().expect("一時ディレクトリ作成失敗");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"top_n": 5, "quantity_km": 2.5}"#).expect("書き込み失敗");

        let loaded = Config::load_from(&path).expect("読み込み失敗");
        assert_eq!(loaded.top_n, 5);
        assert_eq!(loaded.quantity_km, Decimal::new(25, 1));
        assert_eq!(loaded.horizon_days, 90);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempdir().expect("一時ディレクトリ作成失敗");
        let loaded = Config::load_from(&dir.path().join("none.json")).expect("読み込み失敗");
        assert_eq!(loaded.quantity_km, Decimal::from(10));
    }

    #[test]
    fn test_evaluation_options_override() {
        let config = Config::default();
        let options = config.evaluation_options(None).expect("オプション作成失敗");
        assert_eq!(options.quantity_km, Decimal::from(10));

        let options = config
            .evaluation_options(Some(Decimal::new(35, 1)))
            .expect("オプション作成失敗");
        assert_eq!(options.quantity_km, Decimal::new(35, 1));
    }

    #[test]
    fn test_evaluation_options_rejects_non_positive_quantity() {
        let config = Config::default();
        for quantity in [Decimal::from(-5), Decimal::ZERO] {
            let err = config.evaluation_options(Some(quantity)).unwrap_err();
            assert!(matches!(err, RfpMatchError::Config(ref m) if m.contains("数量")));
        }
    }

    #[test]
    fn test_evaluation_options_checks_config_values() {
        let mut config = Config::default();
        config.quantity_km = Decimal::from(-1);
        assert!(config.evaluation_options(None).is_err());
        assert!(config.evaluation_options(Some(Decimal::ONE)).is_ok());

        config.mto_premium = Decimal::new(-1, 1);
        assert!(matches!(
            config.evaluation_options(Some(Decimal::ONE)),
            Err(RfpMatchError::Config(_))
        ));
    }
}
