/// Canonical form for municipality identifiers coming out of census
/// exports: stray BOM/zero-width characters removed, whitespace collapsed
/// to single hyphens, lowercased. "  Duduwa  Rural Municipality" and
/// "duduwa-rural-municipality" key the same directory entry.
pub fn normalize_identifier(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_ascii_lowercase()
}
