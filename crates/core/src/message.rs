use std::sync::LazyLock;

use regex::Regex;

/// ANSI CSI/OSC sequences and bare two-byte escapes.
#[allow(clippy::expect_used)]
static ESCAPES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b(?:\[[0-9;?]*[ -/]*[@-~]|\][^\x07\x1b]*(?:\x07|\x1b\\)|[@-Z\\-_])")
        .expect("escape pattern compiles")
});

/// Log level, pid tag and test API direction markers at the start of a line.
#[allow(clippy::expect_used)]
static PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\[(?:debug|info|warn|warning|error)\]\s*)?(?:\[pid:\d+\]\s*)?(?:(?:<<<|>>>)\s*)?")
        .expect("prefix pattern compiles")
});

/// Prepare a raw log message for display in a tooltip.
pub fn clean_message(raw: &str) -> String {
    let without_escapes = ESCAPES.replace_all(raw, "");
    let printable: String = without_escapes
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();
    PREFIX.replace(&printable, "").trim_end().to_string()
}
