//! 棚レイアウトExcel生成（共通ライブラリ）
//!
//! シートごとに以下を出力する:
//! - 1行目: ヘッダー色のコード（#RRGGBB）、背景も同色
//! - 2行目: 列名（棚記号）、背景も同色
//! - 3行目以降: ラベル。Others 列は元セルの色を引き継ぐ

use crate::error::{Error, Result};
use crate::layout::{ColumnKey, SheetLayout};
use crate::palette::ColorScheme;
use crate::types::{Bucket, ExtractedLabel, Rgb};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use std::collections::HashMap;

/// 既定の列幅（文字数単位）
pub const DEFAULT_COLUMN_WIDTH: f64 = 22.0;

/// ヘッダー2行分
const HEADER_ROWS: u32 = 2;

/// 出力オプション
#[derive(Debug, Clone, PartialEq)]
pub struct EmitOptions {
    /// 全列共通の列幅
    pub column_width: f64,
    /// Others 列のラベルに元セルの塗りつぶし色を付ける
    pub preserve_others_fill: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            column_width: DEFAULT_COLUMN_WIDTH,
            preserve_others_fill: true,
        }
    }
}

fn excel_error(context: &'static str) -> impl Fn(XlsxError) -> Error {
    move |e| Error::ExcelGeneration(format!("{}: {}", context, e))
}

/// 列のヘッダー色
fn header_color(key: ColumnKey, scheme: &ColorScheme) -> Option<Rgb> {
    match key {
        ColumnKey::Shelf(bucket) => scheme.color_for(bucket),
        ColumnKey::Fill(fill) => fill,
    }
}

/// Excelをバッファに生成
///
/// # Arguments
/// * `sheets` - 出力シート（入力シートと同名・同順）
/// * `scheme` - 棚ごとのヘッダー色
/// * `options` - 列幅・Others色の引き継ぎ
pub fn generate_excel_buffer(
    sheets: &[SheetLayout],
    scheme: &ColorScheme,
    options: &EmitOptions,
) -> Result<Vec<u8>> {
    if sheets.is_empty() {
        return Err(Error::ExcelGeneration("出力するシートがありません".into()));
    }

    let mut workbook = Workbook::new();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&sheet.name)
            .map_err(excel_error("シート名設定エラー"))?;
        write_sheet(worksheet, sheet, scheme, options)?;
    }

    workbook
        .save_to_buffer()
        .map_err(excel_error("Excel保存エラー"))
}

fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &SheetLayout,
    scheme: &ColorScheme,
    options: &EmitOptions,
) -> Result<()> {
    let base_format = Format::new()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin);

    // 同じ色のセル書式は使い回す
    let mut fill_formats: HashMap<Rgb, Format> = HashMap::new();

    for (index, column) in sheet.table.columns().iter().enumerate() {
        let col = u16::try_from(index)
            .map_err(|_| Error::ExcelGeneration(format!("列数が多すぎます: {}", index + 1)))?;

        let name_format = match header_color(column.key, scheme) {
            Some(rgb) => {
                let filled = base_format.clone().set_background_color(Color::RGB(rgb.value()));
                worksheet
                    .write_string_with_format(0, col, rgb.hex(), &filled)
                    .map_err(excel_error("ヘッダー書き込みエラー"))?;
                filled.set_bold()
            }
            None => {
                worksheet
                    .write_blank(0, col, &base_format)
                    .map_err(excel_error("ヘッダー書き込みエラー"))?;
                base_format.clone().set_bold()
            }
        };

        worksheet
            .write_string_with_format(1, col, column.key.name(), &name_format)
            .map_err(excel_error("列名書き込みエラー"))?;

        let keep_fill =
            options.preserve_others_fill && column.key == ColumnKey::Shelf(Bucket::Others);

        for (offset, cell) in column.cells.iter().enumerate() {
            let Some(ExtractedLabel { label, fill }) = cell else {
                continue;
            };
            let row = HEADER_ROWS + offset as u32;

            match fill.filter(|_| keep_fill) {
                Some(rgb) => {
                    let format = fill_formats.entry(rgb).or_insert_with(|| {
                        Format::new()
                            .set_border(FormatBorder::Thin)
                            .set_background_color(Color::RGB(rgb.value()))
                    });
                    worksheet
                        .write_string_with_format(row, col, label.as_str(), format)
                        .map_err(excel_error("ラベル書き込みエラー"))?;
                }
                None => {
                    worksheet
                        .write_string(row, col, label.as_str())
                        .map_err(excel_error("ラベル書き込みエラー"))?;
                }
            }
        }

        worksheet
            .set_column_width(col, options.column_width)
            .map_err(excel_error("列幅設定エラー"))?;
    }

    Ok(())
}
