//! Line reader for raw device output.

use regex::Regex;
use std::sync::LazyLock;

/// One line of raw output with its zero-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedLine {
    pub index: usize,
    pub text: String,
}

impl IndexedLine {
    /// The line with surrounding whitespace removed, as rules see it.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }
}

/// Strips terminal artifacts that never carry data: ANSI escapes, `\r`
/// line endings and backspace overstrikes left by paging.
pub fn normalize_output(raw: &str) -> String {
    static ANSI_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("static regex must compile")
    });
    static OVERSTRIKE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^\x08]\x08").expect("static regex must compile"));

    let stripped = ANSI_RE.replace_all(raw, "");
    let mut cleaned = stripped.into_owned();
    while OVERSTRIKE_RE.is_match(&cleaned) {
        cleaned = OVERSTRIKE_RE.replace_all(&cleaned, "").into_owned();
    }
    cleaned.replace("\r\n", "\n").replace('\r', "\n")
}

/// Splits normalized output into indexed lines, keeping order and leading
/// whitespace.
pub fn to_indexed_lines(normalized: &str) -> Vec<IndexedLine> {
    normalized
        .lines()
        .enumerate()
        .map(|(index, text)| IndexedLine {
            index,
            text: text.trim_end().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crlf_and_ansi_are_removed() {
        let raw = "\x1b[1mInterface\x1b[0m   PIM\r\n  Address: FE80::1\r\n";
        let lines = to_indexed_lines(&normalize_output(raw));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Interface   PIM");
        assert_eq!(lines[1].text, "  Address: FE80::1");
        assert_eq!(lines[1].trimmed(), "Address: FE80::1");
    }

    #[test]
    fn test_blank_lines_keep_their_position() {
        let lines = to_indexed_lines(&normalize_output("\nGroup(s) 224.0.0.0/4\n\n  RP: 1.1.1.1 (?)\n"));
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].text, "");
        assert_eq!(lines[3].index, 3);
    }

    #[test]
    fn test_overstrike_is_collapsed() {
        assert_eq!(normalize_output("PIM\x08M: enabled"), "PIM: enabled");
    }
}
