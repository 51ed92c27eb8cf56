//! Shelf Layout Common Library
//!
//! ラベル分類・列レイアウト・Excel出力のコア（CLIから利用）

pub mod types;
pub mod classifier;
pub mod layout;
pub mod palette;
pub mod error;
pub mod export;

pub use types::{Bucket, ExtractedLabel, Label, Rgb};
pub use classifier::classify;
pub use layout::{
    build_shelf_layout, pack, pack_by_fill, Column, ColumnKey, LayoutTable, PreviewGrid,
    SheetLayout, DEFAULT_PREVIEW_ROWS,
};
pub use palette::{ColorScheme, ThemeFillPolicy};
pub use error::{Error, Result};
