//! Text helpers for sort keys and scan placeholder rows.

/// Longest title stored for a placeholder row derived from a filename.
const MAX_TITLE_CHARS: usize = 128;

/// Strips a leading English article ("a ", "an ", "the ") for sorting.
///
/// The match is case-insensitive on the article only; the remainder keeps
/// its original case. Never mutates stored data, sort keys only.
pub fn trim_article(title: &str) -> &str {
    for article in ["a ", "an ", "the "] {
        if let Some(prefix) = title.get(..article.len()) {
            if prefix.eq_ignore_ascii_case(article) {
                return &title[article.len()..];
            }
        }
    }
    title
}

/// Derives a display title from a storage-relative file path: last path
/// segment, extension stripped, capped at 128 characters.
pub fn title_from_path(path: &str) -> String {
    let name = path.rfind('/').map_or(path, |i| &path[i + 1..]);
    let stem = name.rfind('.').map_or(name, |i| &name[..i]);
    if stem.chars().count() > MAX_TITLE_CHARS {
        stem.chars().take(MAX_TITLE_CHARS).collect()
    } else {
        stem.to_string()
    }
}

/// Content hash recorded for a metadata row, derived from the relative
/// path rather than the file bytes.
pub fn path_hash(path: &str) -> String {
    format!("{:x}", md5::compute(path.as_bytes()))
}
