use chrono::NaiveDate;

/// Name used when sanitizing leaves nothing behind.
pub const FALLBACK_FOLDER_NAME: &str = "UnknownJob";

/// Maximum length of a sanitized name, in characters.
pub const MAX_FOLDER_NAME_CHARS: usize = 150;

/// `"{YYYY-MM-DD} {company} - {title}"`, unsanitized.
pub fn default_folder_name(date: NaiveDate, company: &str, title: &str) -> String {
    format!("{} {company} - {title}", date.format("%Y-%m-%d"))
}

/// Windows-safe folder name.
///
/// Forbidden characters become `_`, whitespace runs collapse to one space,
/// the ends are trimmed and the result is capped at 150 characters.
/// Applying it twice gives the same result as applying it once.
pub fn sanitize_folder_name(input: &str) -> String {
    let mut collapsed = String::with_capacity(input.len());
    let mut pending_space = false;
    for c in input.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !collapsed.is_empty() {
            collapsed.push(' ');
        }
        pending_space = false;
        collapsed.push(if is_forbidden(c) { '_' } else { c });
    }

    let mut name: String = collapsed.chars().take(MAX_FOLDER_NAME_CHARS).collect();
    // Truncation can expose a trailing space.
    name.truncate(name.trim_end().len());

    if name.is_empty() {
        FALLBACK_FOLDER_NAME.to_string()
    } else {
        name
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
}
