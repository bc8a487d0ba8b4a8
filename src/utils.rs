//! Common utility functions shared across the codebase.

use std::path::Path;

/// Byte offsets where each line starts, for O(log n) offset → line lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    offsets: Vec<usize>,
}

impl LineIndex {
    pub fn new(content: &[u8]) -> Self {
        let mut offsets = vec![0]; // Line 1 starts at offset 0
        for (i, byte) in content.iter().enumerate() {
            if *byte == b'\n' {
                offsets.push(i + 1);
            }
        }
        Self { offsets }
    }

    /// 1-based line number containing `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.offsets.binary_search(&offset) {
            Ok(line) => line + 1, // Exact match at line start
            Err(line) => line,    // Falls within this line
        }
    }
}

/// Extracts the locale suffix from a catalog file name.
///
/// Qt projects name catalogs `<project>_<locale>.ts`.
///
/// # Examples
///
/// ```
/// use tscat::utils::locale_from_file_name;
///
/// assert_eq!(locale_from_file_name("nls/VirtualBox_ru.ts"), Some("ru".to_string()));
/// assert_eq!(locale_from_file_name("app_pt_BR.ts"), Some("pt_BR".to_string()));
/// assert_eq!(locale_from_file_name("de.ts"), Some("de".to_string()));
/// assert_eq!(locale_from_file_name("messages.ts"), None);
/// ```
pub fn locale_from_file_name(path: impl AsRef<Path>) -> Option<String> {
    let stem = path.as_ref().file_stem()?.to_str()?;
    let parts: Vec<&str> = stem.split('_').collect();

    let is_language =
        |s: &str| (2..=3).contains(&s.len()) && s.chars().all(|c| c.is_ascii_lowercase());
    let is_region = |s: &str| {
        (s.len() == 2 && s.chars().all(|c| c.is_ascii_uppercase()))
            || (s.len() == 3 && s.chars().all(|c| c.is_ascii_digit()))
    };

    match parts.as_slice() {
        [.., language, region] if is_language(*language) && is_region(*region) => {
            Some(format!("{}_{}", language, region))
        }
        [.., language] if is_language(*language) && (parts.len() > 1 || stem.len() <= 3) => {
            Some(language.to_string())
        }
        _ => None,
    }
}
