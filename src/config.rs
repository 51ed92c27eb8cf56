use crate::error::{Result, ShelfLayoutError};
use serde::{Deserialize, Serialize};
use shelf_layout_common::export::excel_core::{EmitOptions, DEFAULT_COLUMN_WIDTH};
use shelf_layout_common::{ColorScheme, ThemeFillPolicy, DEFAULT_PREVIEW_ROWS};
use std::path::PathBuf;

/// 既定の除外文字列（大文字小文字を区別しない）
pub const DEFAULT_EXCLUDE: &str = "bin";

/// 既定の出力ファイル名
pub const DEFAULT_OUTPUT_NAME: &str = "shelf_labels_layout_colours.xlsx";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 配色（プリセット名またはJSONファイルパス）
    pub palette: String,
    /// この文字列を含むラベルを除外する。`None` で除外しない
    pub exclude: Option<String>,
    /// テーマ色・インデックス色の扱い
    pub theme_fill: ThemeFillPolicy,
    /// 列幅
    pub column_width: f64,
    /// Others 列に元セルの色を引き継ぐ
    pub preserve_others_fill: bool,
    /// プレビュー行数
    pub preview_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            log::debug!("設定を読み込みました: {}", config_path.display());
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ShelfLayoutError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("shelf-layout").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            palette: "template".into(),
            exclude: Some(DEFAULT_EXCLUDE.into()),
            theme_fill: ThemeFillPolicy::default(),
            column_width: DEFAULT_COLUMN_WIDTH,
            preserve_others_fill: true,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }

    /// 配色を解決（プリセット → JSONファイル）
    pub fn color_scheme(&self) -> Result<ColorScheme> {
        Ok(ColorScheme::resolve(&self.palette)?)
    }

    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            column_width: self.column_width,
            preserve_others_fill: self.preserve_others_fill,
        }
    }

    /// 配色を変更して保存（解決できない値は拒否）
    pub fn set_palette(&mut self, palette: String) -> Result<()> {
        ColorScheme::resolve(&palette)?;
        self.palette = palette;
        self.save()
    }
}
