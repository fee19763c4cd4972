//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 試験価格表に価格列がない（データ準備の前提条件違反）
    #[error("試験価格表に価格列がありません。検出した列: {columns:?}")]
    MissingPriceColumn { columns: Vec<String> },

    #[error("価格を数値として解釈できません（{row}行目, 列 {column}）: {value}")]
    InvalidPrice {
        row: usize,
        column: String,
        value: String,
    },

    #[error("カタログに必須列がありません: {0}")]
    MissingColumn(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
