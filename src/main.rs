use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use shelf_layout::{cli, config, export, extractor};
use shelf_layout_common::palette::PRESET_NAMES;
use shelf_layout_common::{classify, Bucket, ColorScheme};
use cli::{Cli, Commands, Progress};
use config::Config;
use extractor::{ExtractOptions, InputSource};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    let config = Config::load().context("設定の読み込みに失敗しました")?;

    match cli.command {
        Commands::Generate {
            input,
            output,
            mode,
            sheet,
            column,
            no_header,
            palette,
            exclude,
            no_exclude,
            theme_fill,
            group_by,
            no_others_fill,
            preview_rows,
            json,
        } => {
            let mut progress = Progress::new(std::io::stdout(), json);
            progress.line("📦 shelf-layout - 棚レイアウト生成\n");

            let scheme = match palette.as_deref() {
                Some(name) => ColorScheme::resolve(name)
                    .with_context(|| format!("配色を解決できません: {}", name))?,
                None => config.color_scheme()?,
            };
            let options = ExtractOptions {
                exclude: if no_exclude { None } else { exclude.or_else(|| config.exclude.clone()) },
                resolve_fills: true,
                theme_fill: theme_fill.unwrap_or(config.theme_fill),
            };
            let mut emit = config.emit_options();
            if no_others_fill {
                emit.preserve_others_fill = false;
            }
            let mode = cli::resolve_mode(&input, mode, sheet, column, no_header);
            log::debug!("入力モード: {:?}, 配色: {}, まとめ方: {}", mode, scheme.name, group_by);

            // 1. 抽出
            progress.line("[1/3] ラベルを抽出中...");
            let source = InputSource::new(&input, mode);
            let sheets = extractor::extract(&source, &options)
                .with_context(|| format!("入力を読み込めません: {}", input.display()))?;
            let total: usize = sheets.iter().map(|s| s.labels.len()).sum();
            progress.line(format_args!("✔ {}件のラベルを抽出 ({}シート)\n", total, sheets.len()));

            // 2. 分類・レイアウト
            progress.line("[2/3] 棚ごとに配置中...");
            let generated = export::generate(
                sheets,
                group_by,
                &scheme,
                &emit,
                preview_rows.unwrap_or(config.preview_rows),
            )?;
            progress.line("✔ 配置完了\n");

            // 3. 書き出し
            progress.line("[3/3] Excelを保存中...");
            let path = export::output_path(output.as_deref());
            export::write_output(&path, &generated.bytes)
                .with_context(|| format!("出力を書き込めません: {}", path.display()))?;
            progress.line(format_args!("✔ 保存: {}\n", path.display()));

            if json {
                println!("{}", serde_json::to_string_pretty(&generated.preview)?);
            } else {
                println!("プレビュー ({}):", generated.preview_sheet());
                print!("{}", export::preview::render_table(&generated.preview));
            }

            progress.line("\n✅ 完了");
        }

        Commands::Classify { labels } => {
            for label in &labels {
                println!("{}\t{}", classify(label), label.trim());
            }
        }

        Commands::Palettes { name } => {
            let schemes = match name {
                Some(name) => vec![ColorScheme::resolve(&name)?],
                None => PRESET_NAMES
                    .iter()
                    .filter_map(|n| ColorScheme::from_preset(n))
                    .collect(),
            };
            for scheme in schemes {
                println!("{}:", scheme.name);
                for bucket in Bucket::ALL {
                    match scheme.color_for(bucket) {
                        Some(rgb) => println!("  {:<6} {}", bucket.name(), rgb),
                        None => println!("  {:<6} -", bucket.name()),
                    }
                }
            }
        }

        Commands::Config { set_palette, show } => {
            let mut config = config;

            if let Some(palette) = set_palette {
                config.set_palette(palette)?;
                println!("✔ 配色を設定しました: {}", config.palette);
            }

            if show {
                println!("設定:");
                println!("  配色: {}", config.palette);
                println!("  除外: {}", config.exclude.as_deref().unwrap_or("なし"));
                println!("  テーマ色: {}", config.theme_fill);
                println!("  列幅: {}", config.column_width);
                println!("  Others の色を引き継ぐ: {}", config.preserve_others_fill);
                println!("  プレビュー行数: {}", config.preview_rows);
                if let Ok(path) = Config::config_path() {
                    println!("  パス: {}", path.display());
                }
            }
        }
    }

    Ok(())
}
