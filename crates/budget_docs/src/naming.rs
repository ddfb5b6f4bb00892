use budget_core::{ExportFormat, Language};

/// File stem used when the project has no name.
pub const DEFAULT_FILE_STEM: &str = "Presupuesto";

/// Characters that are invalid in file names on at least one common platform.
const RESERVED_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// `<project>_<lang>.<ext>`.
///
/// Every whitespace run in the project name becomes one underscore, leading
/// and trailing runs included. Reserved and control characters are replaced
/// by `_` so the name is safe to write as-is.
pub fn export_file_name(project_name: &str, lang: Language, format: ExportFormat) -> String {
    let mut stem = String::with_capacity(project_name.len());
    let mut in_whitespace = false;
    for c in project_name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                stem.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if RESERVED_CHARS.contains(&c) || c.is_control() {
            stem.push('_');
        } else {
            stem.push(c);
        }
    }

    let stem = if stem.is_empty() { DEFAULT_FILE_STEM } else { stem.as_str() };
    format!("{stem}_{}.{}", lang.code(), format.extension())
}
