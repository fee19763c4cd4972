//! CLIから使う出力処理の共通部分

#[cfg(feature = "excel")]
pub mod excel_core;
