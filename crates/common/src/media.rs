use mime::Mime;

pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_MARKDOWN: &str = "text/markdown";
pub const TEXT_HTML: &str = "text/html";
pub const TEXT_CSV: &str = "text/csv";
pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_YAML: &str = "application/yaml";
pub const IMAGE_PNG: &str = "image/png";
pub const IMAGE_JPEG: &str = "image/jpeg";
pub const IMAGE_WEBP: &str = "image/webp";
pub const IMAGE_GIF: &str = "image/gif";

/// Media types a fragment may be stored as. Any other `text/*` is accepted too.
pub const SUPPORTED_TYPES: [&str; 10] = [
    TEXT_PLAIN,
    TEXT_MARKDOWN,
    TEXT_HTML,
    TEXT_CSV,
    APPLICATION_JSON,
    APPLICATION_YAML,
    IMAGE_PNG,
    IMAGE_JPEG,
    IMAGE_WEBP,
    IMAGE_GIF,
];

/// Parse a media type string and return its lowercased `type/subtype`,
/// dropping any parameters. `None` if the value is not a media type.
pub fn essence(value: &str) -> Option<String> {
    let mime: Mime = value.trim().parse().ok()?;
    Some(mime.essence_str().to_ascii_lowercase())
}

/// Whether fragments may be created with this `Content-Type`.
pub fn is_supported_type(value: &str) -> bool {
    match essence(value) {
        Some(base) => is_supported_essence(&base),
        None => false,
    }
}

pub(crate) fn is_supported_essence(base: &str) -> bool {
    SUPPORTED_TYPES.contains(&base) || base.starts_with("text/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_essence_strips_parameters() {
        assert_eq!(
            essence("text/plain; charset=utf-8").as_deref(),
            Some("text/plain")
        );
        assert_eq!(essence("Image/PNG").as_deref(), Some("image/png"));
        assert_eq!(essence("not a type"), None);
        assert_eq!(essence(""), None);
    }

    #[test]
    fn test_supported_types() {
        for value in SUPPORTED_TYPES {
            assert!(is_supported_type(value), "{value} should be supported");
        }
        assert!(is_supported_type("text/plain; charset=utf-8"));
        assert!(is_supported_type("text/csv"));
        assert!(is_supported_type("application/yaml"));
        assert!(is_supported_type("text/x-custom"));
    }

    #[test]
    fn test_unsupported_types() {
        assert!(!is_supported_type("video/mp4"));
        assert!(!is_supported_type("application/pdf"));
        assert!(!is_supported_type("text"));
        assert!(!is_supported_type("///"));
    }
}
