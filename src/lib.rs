//! shelf-layout: 倉庫ビンラベルを棚ごとの列に並べたExcelを生成する

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod extractor;
