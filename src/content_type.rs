// Extension to content-type lookup for uploaded images.

use std::path::Path;

pub const FALLBACK: &str = "application/octet-stream";

const TABLE: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("heic", "image/heic"),
];

/// Content type for a file name, from its lowercased extension.
pub fn for_path(path: &Path) -> &'static str {
    let Some(ext) = path.extension() else {
        return FALLBACK;
    };
    let ext = ext.to_string_lossy().to_lowercase();
    TABLE
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown() {
        assert_eq!(for_path(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(for_path(Path::new("icon.svg")), "image/svg+xml");
        assert_eq!(for_path(Path::new("favicon.ico")), "image/x-icon");
        assert_eq!(for_path(Path::new("raw.cr2")), FALLBACK);
        assert_eq!(for_path(Path::new("Makefile")), FALLBACK);
    }
}
