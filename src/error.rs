use thiserror::Error;

#[derive(Error, Debug)]
pub enum RfpMatchError {
    #[error(transparent)]
    Common(#[from] rfp_match_common::Error),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("表ファイルの読み込みに失敗: {0}")]
    InvalidTable(String),

    #[error("未対応のファイル形式です: {0}")]
    UnsupportedFormat(String),

    #[error("RFP文書の解析に失敗: {0}")]
    DocumentParse(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("処理対象のRFPが見つかりません: {0}")]
    NoRfpsFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("CSV読み込みエラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, RfpMatchError>;
