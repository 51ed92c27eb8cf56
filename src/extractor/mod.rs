//! ラベル抽出モジュール
//!
//! 入力の形（貼り付けテキスト・表の1列・シート全体・ブック全体）から
//! ラベル列を取り出す。
//!
//! ## 入力モード
//! - Text: 改行・カンマ区切りのテキスト
//! - Column: CSV / Excel シートの指定列
//! - Sheet: 1シートの全セル（行優先）
//! - Workbook: 全シートの全セル（シートごとに独立）

pub mod column;
pub mod fills;
pub mod text;
pub mod workbook;

pub use column::ColumnSelector;
pub use workbook::SourceWorkbook;

use crate::error::{Result, ShelfLayoutError};
use shelf_layout_common::{ExtractedLabel, Label, Rgb, ThemeFillPolicy};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Text / CSV 入力の出力シート名
pub const FLAT_SHEET_NAME: &str = "Shelf Layout";

/// 抽出オプション
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// この文字列を含むラベルを除外（大文字小文字を区別しない）
    pub exclude: Option<String>,
    /// 元セルの塗りつぶし色を読む
    pub resolve_fills: bool,
    /// テーマ色・インデックス色の扱い
    pub theme_fill: ThemeFillPolicy,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            exclude: None,
            resolve_fills: true,
            theme_fill: ThemeFillPolicy::default(),
        }
    }
}

impl ExtractOptions {
    pub fn is_excluded(&self, text: &str) -> bool {
        match self.exclude.as_deref() {
            Some(pattern) if !pattern.is_empty() => {
                text.to_lowercase().contains(&pattern.to_lowercase())
            }
            _ => false,
        }
    }

    /// 空・除外対象なら `None`
    pub(crate) fn accept(&self, text: &str, fill: Option<Rgb>) -> Option<ExtractedLabel> {
        let label = Label::new(text)?;
        if self.is_excluded(label.as_str()) {
            log::trace!("除外: {}", label);
            return None;
        }
        Some(ExtractedLabel::new(label, fill))
    }
}

/// シート単位の抽出結果
#[derive(Debug, Clone)]
pub struct SheetLabels {
    pub name: String,
    pub labels: Vec<ExtractedLabel>,
}

/// 入力モード
#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Text,
    Column {
        sheet: Option<String>,
        column: ColumnSelector,
        has_header: bool,
    },
    Sheet {
        sheet: Option<String>,
    },
    Workbook,
}

impl InputMode {
    /// 拡張子から既定モードを決める
    pub fn infer(path: &Path) -> Self {
        match extension(path).as_deref() {
            Some("xlsx") | Some("xlsm") => InputMode::Workbook,
            Some("csv") => InputMode::Column {
                sheet: None,
                column: ColumnSelector::First,
                has_header: true,
            },
            _ => InputMode::Text,
        }
    }
}

/// 入力ソース（`-` は標準入力）
#[derive(Debug, Clone)]
pub struct InputSource {
    pub path: PathBuf,
    pub mode: InputMode,
}

impl InputSource {
    pub fn new(path: impl Into<PathBuf>, mode: InputMode) -> Self {
        Self { path: path.into(), mode }
    }

    pub fn is_stdin(&self) -> bool {
        self.path.as_os_str() == "-"
    }

    fn read_bytes(&self) -> Result<Vec<u8>> {
        if self.is_stdin() {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            return Ok(buf);
        }
        if !self.path.exists() {
            return Err(ShelfLayoutError::FileNotFound(self.path.display().to_string()));
        }
        std::fs::read(&self.path)
            .map_err(|e| ShelfLayoutError::InputRead(format!("{}: {}", self.path.display(), e)))
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

/// 入力ソースからラベルを抽出する
///
/// 読み込みに失敗した場合は部分的な結果を返さずエラーにする。
pub fn extract(source: &InputSource, options: &ExtractOptions) -> Result<Vec<SheetLabels>> {
    let bytes = source.read_bytes()?;

    let sheets = match &source.mode {
        InputMode::Text => {
            let content = String::from_utf8(bytes)
                .map_err(|e| ShelfLayoutError::InputRead(format!("UTF-8ではありません: {}", e)))?;
            vec![SheetLabels {
                name: FLAT_SHEET_NAME.to_string(),
                labels: text::extract_text(&content, options),
            }]
        }
        InputMode::Column { sheet, column, has_header } => {
            if extension(&source.path).as_deref() == Some("csv") || source.is_stdin() {
                let labels =
                    column::extract_csv_column(bytes.as_slice(), column, *has_header, options)?;
                vec![SheetLabels { name: FLAT_SHEET_NAME.to_string(), labels }]
            } else {
                let mut workbook = SourceWorkbook::from_bytes(bytes)?;
                let name = workbook.resolve_sheet(sheet.as_deref())?;
                vec![workbook.extract_column(&name, column, *has_header, options)?]
            }
        }
        InputMode::Sheet { sheet } => {
            let mut workbook = SourceWorkbook::from_bytes(bytes)?;
            let name = workbook.resolve_sheet(sheet.as_deref())?;
            vec![workbook.scan_sheet(&name, options)?]
        }
        InputMode::Workbook => {
            let mut workbook = SourceWorkbook::from_bytes(bytes)?;
            workbook.scan_all(options)?
        }
    };

    for sheet in &sheets {
        log::debug!("シート '{}': {}件のラベル", sheet.name, sheet.labels.len());
    }

    Ok(sheets)
}
