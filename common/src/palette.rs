//! ヘッダー配色
//!
//! 棚 → ヘッダー色の対応をデータとして持つ。組み込みプリセットか JSON で指定する。

use crate::error::{Error, Result};
use crate::types::{Bucket, Rgb};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// テーマ色・インデックス色の代替（明るい水色）
pub const DEFAULT_THEME_SUBSTITUTE: Rgb = Rgb::new(0x61CBF3);

/// 組み込みプリセット名
pub const PRESET_NAMES: &[&str] = &["template", "plain"];

/// 配色定義
///
/// `colors` にない棚はヘッダー色なし（白）。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColorScheme {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub colors: BTreeMap<Bucket, Rgb>,
}

impl ColorScheme {
    /// 組み込みプリセットを取得
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "template" | "default" => Some(Self::template_preset()),
            "plain" | "none" => Some(Self::plain_preset()),
            _ => None,
        }
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let scheme: Self = serde_json::from_str(json)?;
        Ok(scheme)
    }

    /// プリセット名、なければJSONファイルパスとして解決
    pub fn resolve(name_or_path: &str) -> Result<Self> {
        if let Some(scheme) = Self::from_preset(name_or_path) {
            return Ok(scheme);
        }
        let path = std::path::Path::new(name_or_path);
        if path.is_file() {
            let mut scheme = Self::from_file(path)?;
            if scheme.name.is_empty() {
                scheme.name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default();
            }
            return Ok(scheme);
        }
        Err(Error::UnknownPalette(name_or_path.to_string()))
    }

    pub fn color_for(&self, bucket: Bucket) -> Option<Rgb> {
        self.colors.get(&bucket).copied()
    }

    /// 倉庫テンプレートの配色
    ///
    /// A:緑 B:青 C:黄 D:水色 F:赤 H:橙 I:灰、それ以外と Others は色なし
    fn template_preset() -> Self {
        let colors = [
            (Bucket::A, 0x00B050),
            (Bucket::B, 0x0070C0),
            (Bucket::C, 0xFFFF00),
            (Bucket::D, 0x61CBF3),
            (Bucket::F, 0xCC0000),
            (Bucket::H, 0xFFC000),
            (Bucket::I, 0x808080),
        ]
        .into_iter()
        .map(|(b, c)| (b, Rgb::new(c)))
        .collect();

        Self { name: "template".into(), colors }
    }

    /// 色なし
    fn plain_preset() -> Self {
        Self { name: "plain".into(), colors: BTreeMap::new() }
    }
}

/// テーマ色・インデックス色（RGB直接指定でない塗りつぶし）の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeFillPolicy {
    /// 固定色に置き換える
    Substitute(Rgb),
    /// 色なしとして扱う
    Drop,
}

impl Default for ThemeFillPolicy {
    fn default() -> Self {
        ThemeFillPolicy::Substitute(DEFAULT_THEME_SUBSTITUTE)
    }
}

impl ThemeFillPolicy {
    pub fn resolve(self) -> Option<Rgb> {
        match self {
            ThemeFillPolicy::Substitute(rgb) => Some(rgb),
            ThemeFillPolicy::Drop => None,
        }
    }
}

impl std::str::FromStr for ThemeFillPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "drop" | "none" => Ok(ThemeFillPolicy::Drop),
            "substitute" => Ok(ThemeFillPolicy::default()),
            _ => {
                let color = lower.strip_prefix("substitute:").unwrap_or(&lower);
                Rgb::parse(color).map(ThemeFillPolicy::Substitute).map_err(|_| {
                    format!("Unknown theme fill policy: {}. Use drop, substitute or substitute:#RRGGBB", s)
                })
            }
        }
    }
}

impl std::fmt::Display for ThemeFillPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeFillPolicy::Substitute(rgb) => write!(f, "substitute:{}", rgb),
            ThemeFillPolicy::Drop => write!(f, "drop"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_preset() {
        let scheme = ColorScheme::from_preset("template").unwrap();
        assert_eq!(scheme.color_for(Bucket::A), Some(Rgb::new(0x00B050)));
        assert_eq!(scheme.color_for(Bucket::I), Some(Rgb::new(0x808080)));
        assert_eq!(scheme.color_for(Bucket::E), None);
        assert_eq!(scheme.color_for(Bucket::Others), None);
    }

    #[test]
    fn test_plain_preset_has_no_colors() {
        let scheme = ColorScheme::from_preset("PLAIN").unwrap();
        assert!(Bucket::ALL.iter().all(|&b| scheme.color_for(b).is_none()));
    }

    #[test]
    fn test_unknown_preset() {
        assert!(ColorScheme::from_preset("rainbow").is_none());
        let err = ColorScheme::resolve("rainbow-does-not-exist").unwrap_err();
        assert!(matches!(err, Error::UnknownPalette(_)));
    }

    #[test]
    fn test_from_json() {
        let scheme = ColorScheme::from_json(
            r##"{ "name": "cold", "colors": { "A": "#0000FF", "Others": "DDDDDD" } }"##,
        )
        .unwrap();
        assert_eq!(scheme.name, "cold");
        assert_eq!(scheme.color_for(Bucket::A), Some(Rgb::new(0x0000FF)));
        assert_eq!(scheme.color_for(Bucket::Others), Some(Rgb::new(0xDDDDDD)));
        assert_eq!(scheme.color_for(Bucket::B), None);
    }

    #[test]
    fn test_from_json_rejects_bad_color() {
        let result = ColorScheme::from_json(r#"{ "colors": { "A": "green" } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_theme_policy_parse() {
        assert_eq!("drop".parse::<ThemeFillPolicy>().unwrap(), ThemeFillPolicy::Drop);
        assert_eq!(
            "substitute".parse::<ThemeFillPolicy>().unwrap(),
            ThemeFillPolicy::Substitute(DEFAULT_THEME_SUBSTITUTE)
        );
        assert_eq!(
            "substitute:#FFFFCC".parse::<ThemeFillPolicy>().unwrap(),
            ThemeFillPolicy::Substitute(Rgb::new(0xFFFFCC))
        );
        assert!("sometimes".parse::<ThemeFillPolicy>().is_err());
    }

    #[test]
    fn test_theme_policy_serde() {
        let json = serde_json::to_string(&ThemeFillPolicy::Drop).unwrap();
        assert_eq!(json, "\"drop\"");
        let policy: ThemeFillPolicy = serde_json::from_str(r##"{"substitute":"#61CBF3"}"##).unwrap();
        assert_eq!(policy.resolve(), Some(DEFAULT_THEME_SUBSTITUTE));
    }
}
