//! 基本型の定義
//!
//! - Label: 入力セル／行から取り出したラベル文字列
//! - Rgb: セル塗りつぶし・ヘッダー色
//! - Bucket: 棚（A〜O + Others）
//! - ExtractedLabel: ラベル + 元セルの塗りつぶし色

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 空でない、前後空白を除去済みのラベル
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// 前後の空白を除去し、空なら `None`
    pub fn new(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 24bit RGB色
///
/// `#RRGGBB` / `RRGGBB` / ARGB `AARRGGBB`（アルファは捨てる）を受け付ける。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(u32);

impl Rgb {
    pub const fn new(value: u32) -> Self {
        Self(value & 0x00FF_FFFF)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let hex = text.trim().trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(text.to_string()));
        }
        let hex = match hex.len() {
            8 => &hex[2..],
            6 => hex,
            _ => return Err(Error::InvalidColor(text.to_string())),
        };
        u32::from_str_radix(hex, 16)
            .map(Self::new)
            .map_err(|_| Error::InvalidColor(text.to_string()))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// `#RRGGBB`（大文字）
    pub fn hex(self) -> String {
        format!("#{:06X}", self.0)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

impl TryFrom<String> for Rgb {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.hex()
    }
}

impl std::str::FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// 棚（表示順に定義）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bucket {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    Others,
}

impl Bucket {
    /// 出力列の並び順
    pub const ALL: [Bucket; 16] = [
        Bucket::A,
        Bucket::B,
        Bucket::C,
        Bucket::D,
        Bucket::E,
        Bucket::F,
        Bucket::G,
        Bucket::H,
        Bucket::I,
        Bucket::J,
        Bucket::K,
        Bucket::L,
        Bucket::M,
        Bucket::N,
        Bucket::O,
        Bucket::Others,
    ];

    /// 'A'〜'O' 以外は `None`
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'A'..='O' => Some(Self::ALL[(letter as u8 - b'A') as usize]),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Bucket::A => "A",
            Bucket::B => "B",
            Bucket::C => "C",
            Bucket::D => "D",
            Bucket::E => "E",
            Bucket::F => "F",
            Bucket::G => "G",
            Bucket::H => "H",
            Bucket::I => "I",
            Bucket::J => "J",
            Bucket::K => "K",
            Bucket::L => "L",
            Bucket::M => "M",
            Bucket::N => "N",
            Bucket::O => "O",
            Bucket::Others => "Others",
        }
    }

    /// `ALL` 内の位置（= 出力列番号）
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 抽出済みラベル（元セルの塗りつぶし色付き）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedLabel {
    pub label: Label,
    pub fill: Option<Rgb>,
}

impl ExtractedLabel {
    pub fn new(label: Label, fill: Option<Rgb>) -> Self {
        Self { label, fill }
    }

    /// 塗りつぶし色なしで生成（空文字なら `None`）
    pub fn plain(text: &str) -> Option<Self> {
        Label::new(text).map(|label| Self { label, fill: None })
    }
}
