use std::path::Path;

const TITLE_SCAN_LINES: usize = 5;
const TITLE_MIN_CHARS: usize = 5;
const TITLE_MAX_CHARS: usize = 100;

/// Picks the first title-like line among the first few non-empty lines,
/// falling back to the filename without its extension.
pub fn derive_title(text: &str, filename: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(TITLE_SCAN_LINES)
        .find(|line| {
            let n = line.chars().count();
            n > TITLE_MIN_CHARS && n < TITLE_MAX_CHARS
        })
        .map(str::to_owned)
        .unwrap_or_else(|| filename_stem(filename))
}

fn filename_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(filename)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_reasonable_line_wins() {
        let text = "\n\nQ3\nQuarterly Report\nSecond candidate line";
        assert_eq!(derive_title(text, "report.pdf"), "Quarterly Report");
    }

    #[test]
    fn bounds_are_exclusive() {
        // exactly 5 chars is too short, 6 is fine
        assert_eq!(derive_title("abcde", "x.pdf"), "x");
        assert_eq!(derive_title("abcdef", "x.pdf"), "abcdef");
        let hundred = "a".repeat(100);
        assert_eq!(derive_title(&hundred, "x.pdf"), "x");
        let ninety_nine = "a".repeat(99);
        assert_eq!(derive_title(&ninety_nine, "x.pdf"), ninety_nine);
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 6 Hangul syllables, 18 bytes
        assert_eq!(derive_title("분기별보고서", "a.pdf"), "분기별보고서");
    }

    #[test]
    fn only_first_five_non_empty_lines_are_scanned() {
        let text = "a\n\nb\nc\n\nd\ne\nThis line is long enough";
        assert_eq!(derive_title(text, "memo.final.pdf"), "memo.final");
    }

    #[test]
    fn filename_without_extension_is_kept() {
        assert_eq!(derive_title("", "README"), "README");
        assert_eq!(derive_title("", ".pdf"), ".pdf");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(derive_title("   Annual Plan 2025   ", "a.pdf"), "Annual Plan 2025");
    }
}
