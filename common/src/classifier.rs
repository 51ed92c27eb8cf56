//! 棚判定
//!
//! ラベルIDは固定桁の採番ルールで、9文字目が棚記号。
//! 例: `HAZ-A101I123` → 9文字目 = 'I' → 棚 I

use crate::types::Bucket;

/// 棚記号の位置（0始まり）
const SHELF_POSITION: usize = 8;

/// ラベルを棚に振り分ける
///
/// 9文字未満、または9文字目が A〜O 以外なら `Others`。大文字小文字は区別しない。
pub fn classify(label: &str) -> Bucket {
    let Some(ch) = label.trim().chars().nth(SHELF_POSITION) else {
        return Bucket::Others;
    };

    let mut upper = ch.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(letter), None) => Bucket::from_letter(letter).unwrap_or(Bucket::Others),
        _ => Bucket::Others,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_warehouse_labels() {
        assert_eq!(classify("HAZ-A101A110"), Bucket::A);
        assert_eq!(classify("HAZ-A101I123"), Bucket::I);
        assert_eq!(classify("X"), Bucket::Others);
    }

    #[test]
    fn test_short_labels_are_others() {
        for label in ["", "A", "HAZ-A101", "ABCDEFGH"] {
            assert_eq!(classify(label), Bucket::Others, "{}", label);
        }
    }

    #[test]
    fn test_exactly_nine_chars() {
        assert_eq!(classify("HAZ-A101O"), Bucket::O);
        assert_eq!(classify("HAZ-A101P"), Bucket::Others);
    }

    #[test]
    fn test_lowercase_is_upcased() {
        assert_eq!(classify("haz-a101b999"), Bucket::B);
        assert_eq!(classify("........Z1"), Bucket::Others);
        assert_eq!(classify("........z2"), Bucket::Others);
    }

    #[test]
    fn test_only_ninth_char_matters() {
        let a = classify("XXXXXXXXC-anything");
        let b = classify("12345678c");
        assert_eq!(a, Bucket::C);
        assert_eq!(a, b);
    }

    #[test]
    fn test_digit_and_symbol_are_others() {
        assert_eq!(classify("HAZ-A1019123"), Bucket::Others);
        assert_eq!(classify("HAZ-A101-123"), Bucket::Others);
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        assert_eq!(classify("   HAZ-A101D1  "), Bucket::D);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // 全角文字も1文字として数える
        assert_eq!(classify("棚番号ABCDEF"), Bucket::F);
    }
}
