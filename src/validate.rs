//! URL checks used before accepting image keys and button links

use url::Url;

/// Extensions Discord will render when an image key is a direct link
pub const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Returns true if `s` parses as an absolute URL
pub fn is_valid_url(s: &str) -> bool {
    Url::parse(s).is_ok()
}

/// Returns true if `s` is a URL whose path ends with a supported image extension
///
/// The comparison ignores case, so `https://x.com/a.PNG` is accepted.
pub fn is_valid_image_url(s: &str) -> bool {
    let Ok(url) = Url::parse(s) else {
        return false;
    };
    let path = url.path().to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_keys_are_not_urls() {
        assert!(!is_valid_url("game_logo"));
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("/relative/path.png"));
    }

    #[test]
    fn absolute_urls_are_valid() {
        assert!(is_valid_url("https://github.com/"));
        assert!(is_valid_url("http://localhost:8080/a?b=c"));
    }

    #[test]
    fn image_extension_is_case_insensitive() {
        assert!(is_valid_image_url("https://x.com/a.PNG"));
        assert!(is_valid_image_url("https://x.com/dir/cover.jpeg"));
        assert!(is_valid_image_url("https://x.com/anim.gif?size=64"));
    }

    #[test]
    fn unsupported_or_missing_extension_is_rejected() {
        assert!(!is_valid_image_url("https://x.com/a.bmp"));
        assert!(!is_valid_image_url("https://x.com/"));
        // the extension has to be on the path, not the query
        assert!(!is_valid_image_url("https://x.com/img?f=a.png"));
        assert!(!is_valid_image_url("not a url.png"));
    }
}
