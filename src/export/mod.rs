//! 棚レイアウト生成
//!
//! 抽出 → 分類 → 列詰め → Excel出力 を一括で行う。途中で失敗した場合は何も出力しない。

pub mod preview;

use crate::error::{Result, ShelfLayoutError};
use crate::extractor::SheetLabels;
use shelf_layout_common::export::excel_core::{generate_excel_buffer, EmitOptions};
use shelf_layout_common::{build_shelf_layout, pack_by_fill, ColorScheme, PreviewGrid, SheetLayout};
use std::path::{Path, PathBuf};

pub use crate::config::DEFAULT_OUTPUT_NAME;

/// 列のまとめ方
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Grouping {
    /// ラベル9文字目の棚記号
    #[default]
    Shelf,
    /// 元セルの塗りつぶし色
    Fill,
}

impl std::str::FromStr for Grouping {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shelf" => Ok(Grouping::Shelf),
            "fill" | "color" | "colour" => Ok(Grouping::Fill),
            _ => Err(format!("Unknown grouping: {}. Use shelf or fill", s)),
        }
    }
}

impl std::fmt::Display for Grouping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grouping::Shelf => write!(f, "shelf"),
            Grouping::Fill => write!(f, "fill"),
        }
    }
}

/// 生成結果
#[derive(Debug, Clone)]
pub struct GeneratedLayout {
    /// xlsx のバイト列
    pub bytes: Vec<u8>,
    pub sheets: Vec<SheetLayout>,
    /// 先頭シートのプレビュー
    pub preview: PreviewGrid,
}

impl GeneratedLayout {
    pub fn preview_sheet(&self) -> &str {
        self.sheets.first().map(|s| s.name.as_str()).unwrap_or_default()
    }
}

/// シートごとに表を組む（シートをまたいで混ざらない）
pub fn build_layouts(sheets: Vec<SheetLabels>, grouping: Grouping) -> Vec<SheetLayout> {
    sheets
        .into_iter()
        .map(|sheet| {
            let table = match grouping {
                Grouping::Shelf => build_shelf_layout(sheet.labels),
                Grouping::Fill => pack_by_fill(sheet.labels),
            };
            SheetLayout::new(sheet.name, table)
        })
        .collect()
}

/// レイアウトExcelを生成する
///
/// ラベルが1件もなければ分類前に `NoLabels` を返す。
pub fn generate(
    sheets: Vec<SheetLabels>,
    grouping: Grouping,
    scheme: &ColorScheme,
    options: &EmitOptions,
    preview_rows: usize,
) -> Result<GeneratedLayout> {
    if sheets.is_empty() {
        return Err(ShelfLayoutError::NoLabels("入力にシートがありません".into()));
    }
    let total: usize = sheets.iter().map(|s| s.labels.len()).sum();
    if total == 0 {
        return Err(ShelfLayoutError::NoLabels("入力からラベルを抽出できませんでした".into()));
    }

    let layouts = build_layouts(sheets, grouping);
    for layout in &layouts {
        log::debug!(
            "シート '{}': {}列 x {}行",
            layout.name,
            layout.table.columns().len(),
            layout.table.row_count()
        );
    }

    let bytes = generate_excel_buffer(&layouts, scheme, options)?;
    let preview = layouts
        .first()
        .map(|s| s.table.preview(preview_rows))
        .unwrap_or(PreviewGrid { headers: Vec::new(), rows: Vec::new() });

    Ok(GeneratedLayout { bytes, sheets: layouts, preview })
}

/// 出力パス: ディレクトリ／拡張子なしなら既定ファイル名を付ける
pub fn output_path(output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) if path.is_dir() || path.extension().is_none() => path.join(DEFAULT_OUTPUT_NAME),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(DEFAULT_OUTPUT_NAME),
    }
}

/// 生成済みのバイト列を書き出す
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    log::info!("出力: {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
