use regex::Regex;
use std::sync::OnceLock;

/// Splits on `\n`, dropping a `\r` that precedes it. Line indices match the editor's.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l))
}

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(#+)\s*(.*)").expect("valid heading regex"))
}

/// `Some((level, text))` when `line` starts with a `#` run. `text` is trimmed and may be empty.
pub fn heading(line: &str) -> Option<(usize, &str)> {
    let caps = heading_re().captures(line)?;
    let level = caps.get(1)?.as_str().len();
    let text = caps.get(2).map_or("", |m| m.as_str().trim());
    Some((level, text))
}

/// Heading depth of a raw line; `0` for text lines.
pub fn heading_level(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b'#').count()
}
