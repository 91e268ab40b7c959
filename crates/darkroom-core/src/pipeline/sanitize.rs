//! Filename sanitization for derived artifact names.

/// Fallback token when sanitization leaves nothing.
const FALLBACK: &str = "image";

/// Maximum length of the sanitized base token.
const MAX_LEN: usize = 80;

/// Map an arbitrary source filename to a filesystem- and URL-safe base token.
///
/// Strips the final extension, lowercases, collapses every run of
/// non-alphanumeric characters to a single hyphen, trims leading/trailing
/// hyphens, and caps the length. The result always matches `^[a-z0-9-]+$`;
/// collisions between distinct names are harmless because the content
/// fingerprint is appended to artifact names afterward.
pub fn safe_base(name: &str) -> String {
    let stem = match name.rfind('.') {
        Some(0) | None => name,
        Some(idx) => &name[..idx],
    };

    let mut out = String::with_capacity(stem.len());
    let mut pending_hyphen = false;
    for c in stem.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    out.truncate(MAX_LEN);
    while out.ends_with('-') {
        out.pop();
    }

    if out.is_empty() {
        FALLBACK.to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_names() {
        assert_eq!(safe_base("photo.jpg"), "photo");
        assert_eq!(safe_base("IMG 001.JPG"), "img-001");
        assert_eq!(safe_base("Sunset at the Beach!.png"), "sunset-at-the-beach");
    }

    #[test]
    fn test_collapses_runs() {
        assert_eq!(safe_base("a -- b___c.webp"), "a-b-c");
    }

    #[test]
    fn test_trims_hyphens() {
        assert_eq!(safe_base("--weird--.png"), "weird");
        assert_eq!(safe_base("(parens).tif"), "parens");
    }

    #[test]
    fn test_only_last_extension_stripped() {
        assert_eq!(safe_base("archive.tar.png"), "archive-tar");
    }

    #[test]
    fn test_hidden_file_keeps_name() {
        // A leading dot is not an extension separator
        assert_eq!(safe_base(".hidden"), "hidden");
    }

    #[test]
    fn test_fallback_when_empty() {
        assert_eq!(safe_base("....png"), "image");
        assert_eq!(safe_base("###.jpg"), "image");
        assert_eq!(safe_base(""), "image");
    }

    #[test]
    fn test_non_ascii_collapses() {
        assert_eq!(safe_base("café—menu.jpg"), "caf-menu");
    }

    #[test]
    fn test_length_cap() {
        let long = format!("{}.jpg", "a".repeat(200));
        let base = safe_base(&long);
        assert_eq!(base.len(), 80);
    }

    #[test]
    fn test_output_charset() {
        for name in ["A B.png", "ünïcode!.jpg", "__ __.tiff", "x.y"] {
            let base = safe_base(name);
            assert!(!base.is_empty());
            assert!(base
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }
    }
}
