//! 貼り付けテキストからの抽出

use super::ExtractOptions;
use regex::Regex;
use shelf_layout_common::ExtractedLabel;

/// 改行で分割し、さらにカンマで分割する
pub fn extract_text(content: &str, options: &ExtractOptions) -> Vec<ExtractedLabel> {
    lazy_static::lazy_static! {
        static ref SEPARATOR: Regex = Regex::new(r"\r\n|\r|\n|,").unwrap();
    }

    SEPARATOR
        .split(content)
        .filter_map(|part| options.accept(part, None))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(labels: &[ExtractedLabel]) -> Vec<&str> {
        labels.iter().map(|l| l.label.as_str()).collect()
    }

    #[test]
    fn test_lines_and_commas() {
        let labels = extract_text(
            "HAZ-A101A110, HAZ-A101I123\nX\r\n\n  ,  \nHAZ-A101B001",
            &ExtractOptions::default(),
        );
        assert_eq!(
            texts(&labels),
            vec!["HAZ-A101A110", "HAZ-A101I123", "X", "HAZ-A101B001"]
        );
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_text("", &ExtractOptions::default()).is_empty());
        assert!(extract_text("\n\n , ,", &ExtractOptions::default()).is_empty());
    }

    #[test]
    fn test_exclusion_applies() {
        let options = ExtractOptions {
            exclude: Some("bin".into()),
            ..Default::default()
        };
        let labels = extract_text("HAZ-A101BIN45\nHAZ-A101A110", &options);
        assert_eq!(texts(&labels), vec!["HAZ-A101A110"]);
    }

    #[test]
    fn test_text_has_no_fill() {
        let labels = extract_text("X", &ExtractOptions::default());
        assert_eq!(labels[0].fill, None);
    }
}
