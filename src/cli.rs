use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rfp-match")]
#[command(about = "RFP仕様抽出・SKU照合・見積/MTO判定ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// RFPフォルダをスキャンして期限順に一覧表示
    Scan {
        /// RFPフォルダ（省略時は設定値）
        folder: Option<PathBuf>,

        /// 対象とする期限（今日から何日以内か）
        #[arg(short, long)]
        days: Option<i64>,
    },

    /// RFP文書から要求仕様を抽出してJSONを出力
    Extract {
        /// RFP文書（pdf/html/txt/json）
        #[arg(required = true)]
        document: PathBuf,

        /// 出力JSONファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 要求仕様JSONとSKUマスタを照合
    Match {
        /// 要求仕様JSONファイル
        #[arg(short, long, required = true)]
        requirements: PathBuf,

        /// SKUマスタ（xlsx/csv）
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// 比較表に並べるSKU数
        #[arg(long)]
        top: Option<usize>,

        /// 出力JSONファイル（省略時は表示のみ）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// スキャンから判定・出力まで一括実行
    Run {
        /// RFPフォルダ（省略時は設定値）
        folder: Option<PathBuf>,

        /// SKUマスタ（xlsx/csv）
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// 試験価格表（xlsx/csv）
        #[arg(long)]
        test_prices: Option<PathBuf>,

        /// 数量（km）
        #[arg(short, long)]
        quantity: Option<Decimal>,

        /// 対象とする期限（今日から何日以内か）
        #[arg(short, long)]
        days: Option<i64>,

        /// PDF以外（HTML/メール/JSON）も処理する
        #[arg(long)]
        all_sources: bool,

        /// 出力ディレクトリ
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// 出力形式 (json/excel/both)
        #[arg(short, long, default_value = "both")]
        format: ExportFormat,

        /// 処理するRFPを対話式で選択
        #[arg(short, long)]
        interactive: bool,
    },

    /// 要求仕様JSONの未設定項目を対話式で入力
    Review {
        /// 要求仕様JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力先（省略時は上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// SKUマスタのパスを設定
        #[arg(long)]
        set_catalog: Option<PathBuf>,

        /// 試験価格表のパスを設定
        #[arg(long)]
        set_test_prices: Option<PathBuf>,

        /// 既定の数量（km）を設定
        #[arg(long)]
        set_quantity: Option<Decimal>,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Excel,
    #[default]
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use json, excel, or both", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Both => write!(f, "both"),
        }
    }
}
