use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// An empty cell is represented as a missing value.
pub fn text_cell(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// A name usable as a file name for the chart of a group.
///
/// Letters and digits are kept, everything else becomes an underscore.
pub fn chart_file_stem(lead_name: &str) -> String {
    let s: String = lead_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if s.is_empty() {
        "lead".to_string()
    } else {
        s
    }
}
