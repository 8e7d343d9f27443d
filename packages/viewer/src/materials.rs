//! Materials display: the editor stores free text with best-effort `1. `
//! numbering, so the viewer strips blanks and leftover bare numbers and
//! renumbers what remains.

pub fn display_materials(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter_map(item_content)
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect()
}

/// The item text of one line, with any `N.` prefix stripped. Blank lines and
/// bare prefixes carry no item.
fn item_content(line: &str) -> Option<&str> {
    if line.is_empty() {
        return None;
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 && line[digits..].starts_with('.') {
        let content = line[digits + 1..].trim();
        return (!content.is_empty()).then_some(content);
    }
    Some(line)
}
