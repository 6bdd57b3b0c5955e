//! # Upload Policy
//!
//! Filename checks applied before an image reaches the codec, and naming of
//! generated stego images. Only extensions are inspected; file contents are
//! left to the image decoder.

use uuid::Uuid;

/// Extensions accepted for input images by default.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// Returns true if `filename` has an extension found in `allowed`.
///
/// The last extension is compared case-insensitively; a name without a dot
/// is rejected.
///
/// # Example
/// ```
/// use stego_crypt::processing::upload::{is_allowed_file, DEFAULT_ALLOWED_EXTENSIONS};
///
/// assert!(is_allowed_file("holiday.JPG", DEFAULT_ALLOWED_EXTENSIONS));
/// assert!(!is_allowed_file("notes.txt", DEFAULT_ALLOWED_EXTENSIONS));
/// ```
pub fn is_allowed_file<S: AsRef<str>>(filename: &str, allowed: &[S]) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => allowed.iter().any(|a| a.as_ref().eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// Reduce an uploaded filename to a safe basename.
///
/// Path components are stripped, whitespace becomes `_`, and anything other
/// than ASCII alphanumerics, `.`, `-` and `_` is dropped, as are leading dots.
/// Returns `"image"` if nothing survives.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename);

    let cleaned: String = base
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Unique output name for a stego image derived from the uploaded name.
///
/// Format: `stego_<uuid-v4>_<stem>.png`. The extension is always `.png`
/// because the embedded bits would not survive a lossy re-encode.
pub fn stego_output_name(original: &str) -> String {
    let safe = sanitize_filename(original);
    let stem = match safe.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => safe.as_str(),
    };
    format!("stego_{}_{}.png", Uuid::new_v4(), stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions() {
        for name in ["a.png", "b.JPG", "c.jpeg", "d.Gif", "e.bmp", "archive.tar.png"] {
            assert!(is_allowed_file(name, DEFAULT_ALLOWED_EXTENSIONS), "{}", name);
        }
        for name in ["png", "a.tiff", "a.png.exe", "a.", ""] {
            assert!(!is_allowed_file(name, DEFAULT_ALLOWED_EXTENSIONS), "{}", name);
        }
    }

    #[test]
    fn test_custom_allowed_list() {
        let allowed = vec!["png".to_string()];
        assert!(is_allowed_file("x.PNG", &allowed));
        assert!(!is_allowed_file("x.jpg", &allowed));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\my photo.jpg"), "my_photo.jpg");
        assert_eq!(sanitize_filename(".hidden.png"), "hidden.png");
        assert_eq!(sanitize_filename("ünï©ode.png"), "node.png");
        assert_eq!(sanitize_filename("///"), "image");
    }

    #[test]
    fn test_stego_output_name() {
        let name = stego_output_name("holiday photo.jpg");
        assert!(name.starts_with("stego_"));
        assert!(name.ends_with("_holiday_photo.png"));
        // stego_ + 36-char uuid + _
        assert_eq!(name.len(), "stego_".len() + 36 + "_holiday_photo.png".len());
        assert_ne!(name, stego_output_name("holiday photo.jpg"));
    }
}
