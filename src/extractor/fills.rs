//! セル塗りつぶし色の解決
//!
//! calamine はセルの書式を返さないため、xlsx（zip）内の XML を直接読む:
//! 1. xl/workbook.xml + rels: シート名 → シートXMLのパス
//! 2. シートXML: セル位置 → スタイル番号（`<c s="..">`）
//! 3. xl/styles.xml: スタイル番号 → cellXfs の fillId → fills の patternFill

use crate::error::{Result, ShelfLayoutError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader as XmlReader;
use shelf_layout_common::{Rgb, ThemeFillPolicy};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// patternFill に fgColor がないときの色
const UNSET_FG_COLOR: Rgb = Rgb::new(0x000000);

/// styles.xml の fill 1件分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillColor {
    /// 塗りつぶしなし（patternType なし／none、または fgColor が auto など）
    None,
    /// RGB直接指定
    Rgb(Rgb),
    /// テーマ色・インデックス色
    Themed,
}

impl FillColor {
    pub fn resolve(self, policy: ThemeFillPolicy) -> Option<Rgb> {
        match self {
            FillColor::None => None,
            FillColor::Rgb(rgb) => Some(rgb),
            FillColor::Themed => policy.resolve(),
        }
    }
}

/// スタイル番号 → 塗りつぶし
#[derive(Debug, Clone, Default)]
pub struct StyleFills {
    fills: Vec<FillColor>,
    xf_fill_ids: Vec<usize>,
}

impl StyleFills {
    pub fn parse(styles_xml: &str) -> Result<Self> {
        let mut reader = XmlReader::from_str(styles_xml);
        reader.config_mut().trim_text(true);
        let mut buf: Vec<u8> = Vec::new();

        let mut out = StyleFills::default();
        let mut in_fills = false;
        let mut in_cell_xfs = false;
        let mut pattern: Option<String> = None;
        let mut fg: Option<FillColor> = None;

        loop {
            let event = reader.read_event_into(&mut buf)?;
            let is_empty = matches!(event, Event::Empty(_));
            match event {
                Event::Start(e) | Event::Empty(e) => {
                    match e.local_name().as_ref() {
                        b"fills" => in_fills = !is_empty,
                        b"cellXfs" => in_cell_xfs = !is_empty,
                        b"fill" if in_fills => {
                            pattern = None;
                            fg = None;
                            if is_empty {
                                out.fills.push(FillColor::None);
                            }
                        }
                        b"patternFill" if in_fills => {
                            pattern = attr_value(&e, b"patternType");
                        }
                        b"fgColor" if in_fills => {
                            fg = Some(parse_color(&e));
                        }
                        b"xf" if in_cell_xfs => {
                            let fill_id = attr_value(&e, b"fillId")
                                .and_then(|v| v.parse::<usize>().ok())
                                .unwrap_or(0);
                            out.xf_fill_ids.push(fill_id);
                        }
                        _ => {}
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"fills" => in_fills = false,
                    b"cellXfs" => in_cell_xfs = false,
                    b"fill" if in_fills => {
                        let color = match pattern.as_deref() {
                            None | Some("none") => FillColor::None,
                            // fgColor 省略時の既定値は黒（rgb="00000000"）
                            Some(_) => fg.unwrap_or(FillColor::Rgb(UNSET_FG_COLOR)),
                        };
                        out.fills.push(color);
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(out)
    }

    /// スタイル番号の塗りつぶし（範囲外は塗りつぶしなし）
    pub fn fill_for_style(&self, style_id: u32) -> FillColor {
        self.xf_fill_ids
            .get(style_id as usize)
            .and_then(|&fill_id| self.fills.get(fill_id))
            .copied()
            .unwrap_or(FillColor::None)
    }
}

/// `<fgColor rgb=".." | theme=".." | indexed="..">`
fn parse_color(e: &BytesStart<'_>) -> FillColor {
    if let Some(rgb) = attr_value(e, b"rgb") {
        return Rgb::parse(&rgb).map(FillColor::Rgb).unwrap_or(FillColor::None);
    }
    if attr_value(e, b"theme").is_some() || attr_value(e, b"indexed").is_some() {
        return FillColor::Themed;
    }
    FillColor::None
}

fn attr_value(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// A1形式 → (行, 列)（0始まり）
pub fn cell_ref_to_position(a1: &str) -> Option<(u32, u32)> {
    let split = a1.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = a1.split_at(split);
    let col = super::column::column_letter_index(&letters.replace('$', ""))?;
    let row: u32 = digits.parse().ok()?;
    row.checked_sub(1).map(|r| (r, col))
}

/// シートXMLからセル位置 → スタイル番号を読む（スタイル0は省略）
pub fn parse_cell_styles(sheet_xml: &str) -> Result<HashMap<(u32, u32), u32>> {
    let mut reader = XmlReader::from_str(sheet_xml);
    reader.config_mut().trim_text(true);
    let mut buf: Vec<u8> = Vec::new();
    let mut out = HashMap::new();

    // r 属性がない場合の位置
    let mut row: u32 = 0;
    let mut next_col: u32 = 0;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"row" => {
                    row = attr_value(&e, b"r")
                        .and_then(|r| r.parse::<u32>().ok())
                        .and_then(|r| r.checked_sub(1))
                        .unwrap_or(row);
                    next_col = 0;
                }
                b"c" => {
                    let (r, c) = attr_value(&e, b"r")
                        .and_then(|a1| cell_ref_to_position(&a1))
                        .unwrap_or((row, next_col));
                    next_col = c + 1;

                    let style = attr_value(&e, b"s")
                        .and_then(|s| s.parse::<u32>().ok())
                        .unwrap_or(0);
                    if style != 0 {
                        out.insert((r, c), style);
                    }
                }
                _ => {}
            },
            Event::End(e) if e.local_name().as_ref() == b"row" => {
                row += 1;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

/// workbook.xml と rels からシート名 → zip内パス
pub fn parse_sheet_paths(workbook_xml: &str, rels_xml: &str) -> Result<HashMap<String, String>> {
    let mut targets: HashMap<String, String> = HashMap::new();
    let mut reader = XmlReader::from_str(rels_xml);
    reader.config_mut().trim_text(true);
    let mut buf: Vec<u8> = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (attr_value(&e, b"Id"), attr_value(&e, b"Target")) {
                    targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let mut paths = HashMap::new();
    buf.clear();
    let mut reader = XmlReader::from_str(workbook_xml);
    reader.config_mut().trim_text(true);
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                let name = attr_value(&e, b"name");
                let target = attr_value(&e, b"id").and_then(|id| targets.get(&id));
                if let (Some(name), Some(target)) = (name, target) {
                    paths.insert(name, normalize_target(target));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(paths)
}

/// rels の Target を zip 内パスにする
fn normalize_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    }
}

fn read_entry(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> Result<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| ShelfLayoutError::InputRead(format!("{}: {}", name, e)))?;
    Ok(Some(content))
}

/// シート1枚分の塗りつぶし色
#[derive(Debug, Clone, Default)]
pub struct SheetFills {
    cells: HashMap<(u32, u32), FillColor>,
}

impl SheetFills {
    pub fn get(&self, row: u32, col: u32, policy: ThemeFillPolicy) -> Option<Rgb> {
        self.cells
            .get(&(row, col))
            .and_then(|fill| fill.resolve(policy))
    }
}

/// xlsx パッケージから塗りつぶし色を読む
pub struct FillReader {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    styles: StyleFills,
    sheet_paths: HashMap<String, String>,
}

impl FillReader {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;

        let styles = match read_entry(&mut archive, "xl/styles.xml")? {
            Some(xml) => StyleFills::parse(&xml)?,
            None => StyleFills::default(),
        };

        let workbook_xml = read_entry(&mut archive, "xl/workbook.xml")?
            .ok_or_else(|| ShelfLayoutError::InputRead("xl/workbook.xml がありません".into()))?;
        let rels_xml = read_entry(&mut archive, "xl/_rels/workbook.xml.rels")?.unwrap_or_default();
        let sheet_paths = parse_sheet_paths(&workbook_xml, &rels_xml)?;

        Ok(Self { archive, styles, sheet_paths })
    }

    /// シートの塗りつぶし色を読む（シートXMLが見つからなければ空）
    pub fn sheet_fills(&mut self, sheet: &str) -> Result<SheetFills> {
        let Some(path) = self.sheet_paths.get(sheet).cloned() else {
            log::warn!("シートXMLが見つかりません: {}", sheet);
            return Ok(SheetFills::default());
        };
        let Some(xml) = read_entry(&mut self.archive, &path)? else {
            log::warn!("シートXMLが見つかりません: {}", path);
            return Ok(SheetFills::default());
        };

        let cells = parse_cell_styles(&xml)?
            .into_iter()
            .map(|(pos, style)| (pos, self.styles.fill_for_style(style)))
            .filter(|(_, fill)| *fill != FillColor::None)
            .collect();

        Ok(SheetFills { cells })
    }
}
