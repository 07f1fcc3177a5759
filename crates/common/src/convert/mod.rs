mod error;
mod html;
mod markdown;
mod raster;
mod structured;
mod tabular;

use bytes::Bytes;
use image::ImageFormat;

use crate::media::{
    self, APPLICATION_JSON, APPLICATION_YAML, IMAGE_GIF, IMAGE_JPEG, IMAGE_PNG, IMAGE_WEBP,
    TEXT_CSV, TEXT_HTML, TEXT_MARKDOWN, TEXT_PLAIN,
};

pub use error::ConvertError;

/// A target format, named by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    Txt,
    Md,
    Html,
    Csv,
    Json,
    Yaml,
    Yml,
    Png,
    Jpg,
    Jpeg,
    Webp,
    Gif,
}

impl Extension {
    /// Parse an extension, with or without its leading dot, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.strip_prefix('.').unwrap_or(value);
        let extension = match value.to_ascii_lowercase().as_str() {
            "txt" => Self::Txt,
            "md" => Self::Md,
            "html" => Self::Html,
            "csv" => Self::Csv,
            "json" => Self::Json,
            "yaml" => Self::Yaml,
            "yml" => Self::Yml,
            "png" => Self::Png,
            "jpg" => Self::Jpg,
            "jpeg" => Self::Jpeg,
            "webp" => Self::Webp,
            "gif" => Self::Gif,
            _ => return None,
        };
        Some(extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Md => "md",
            Self::Html => "html",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Yml => "yml",
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
            Self::Gif => "gif",
        }
    }

    /// The media type content converted to this extension is served as.
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Txt => TEXT_PLAIN,
            Self::Md => TEXT_MARKDOWN,
            Self::Html => TEXT_HTML,
            Self::Csv => TEXT_CSV,
            Self::Json => APPLICATION_JSON,
            Self::Yaml | Self::Yml => APPLICATION_YAML,
            Self::Png => IMAGE_PNG,
            Self::Jpg | Self::Jpeg => IMAGE_JPEG,
            Self::Webp => IMAGE_WEBP,
            Self::Gif => IMAGE_GIF,
        }
    }

    fn image_format(&self) -> Option<ImageFormat> {
        match self {
            Self::Png => Some(ImageFormat::Png),
            Self::Jpg | Self::Jpeg => Some(ImageFormat::Jpeg),
            Self::Webp => Some(ImageFormat::WebP),
            Self::Gif => Some(ImageFormat::Gif),
            _ => None,
        }
    }
}

impl std::fmt::Display for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const IMAGE_TARGETS: &[Extension] = &[
    Extension::Png,
    Extension::Jpg,
    Extension::Jpeg,
    Extension::Webp,
    Extension::Gif,
];

/// The compatibility table: which extensions a base media type converts to.
fn targets(source: &str) -> &'static [Extension] {
    match source {
        TEXT_PLAIN => &[Extension::Txt],
        TEXT_MARKDOWN => &[Extension::Md, Extension::Html, Extension::Txt],
        TEXT_HTML => &[Extension::Html, Extension::Txt],
        TEXT_CSV => &[Extension::Csv, Extension::Txt, Extension::Json],
        APPLICATION_JSON => &[
            Extension::Json,
            Extension::Yaml,
            Extension::Yml,
            Extension::Txt,
        ],
        APPLICATION_YAML => &[Extension::Yaml, Extension::Yml, Extension::Txt],
        IMAGE_PNG | IMAGE_JPEG | IMAGE_WEBP | IMAGE_GIF => IMAGE_TARGETS,
        _ => &[],
    }
}

/// Extensions a fragment of `source_type` can be requested as.
pub fn valid_extensions(source_type: &str) -> Vec<&'static str> {
    match media::essence(source_type) {
        Some(source) => targets(&source).iter().map(Extension::as_str).collect(),
        None => Vec::new(),
    }
}

/// Media types a fragment of base type `source` can be converted to.
/// A type missing from the table converts only to itself.
pub fn formats(source: &str) -> Vec<String> {
    let mut formats: Vec<String> = Vec::new();
    for extension in targets(source) {
        let media_type = extension.media_type();
        if !formats.iter().any(|f| f == media_type) {
            formats.push(media_type.to_string());
        }
    }
    if formats.is_empty() {
        formats.push(source.to_string());
    }
    formats
}

/// Output of a successful [`convert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    pub data: Bytes,
    pub content_type: String,
}

/// Convert `data`, stored as `source_type`, to the format named by `target`.
///
/// The pair is checked against the compatibility table before any bytes are
/// looked at. Same-type pairs return the input unchanged.
pub fn convert(data: Bytes, source_type: &str, target: &str) -> Result<Converted, ConvertError> {
    let unsupported = || ConvertError::UnsupportedConversion {
        from: source_type.to_string(),
        to: target.trim_start_matches('.').to_string(),
    };

    let source = media::essence(source_type).ok_or_else(unsupported)?;
    let extension = Extension::parse(target).ok_or_else(unsupported)?;
    if !targets(&source).contains(&extension) {
        return Err(unsupported());
    }

    let content_type = extension.media_type();
    if content_type == source {
        return Ok(Converted {
            data,
            content_type: source,
        });
    }

    let data = match (source.as_str(), extension) {
        (TEXT_MARKDOWN, Extension::Html) => Bytes::from(markdown::to_html(&data)?),
        (TEXT_MARKDOWN | TEXT_CSV | APPLICATION_JSON | APPLICATION_YAML, Extension::Txt) => data,
        (TEXT_HTML, Extension::Txt) => Bytes::from(html::to_text(&data)?),
        (TEXT_CSV, Extension::Json) => Bytes::from(tabular::to_json(&data)?),
        (APPLICATION_JSON, Extension::Yaml | Extension::Yml) => {
            Bytes::from(structured::json_to_yaml(&data)?)
        }
        (_, extension) => match extension.image_format() {
            Some(format) => Bytes::from(raster::reencode(&data, &source, format)?),
            None => return Err(unsupported()),
        },
    };

    Ok(Converted {
        data,
        content_type: content_type.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_parse() {
        assert_eq!(Extension::parse("html"), Some(Extension::Html));
        assert_eq!(Extension::parse(".HTML"), Some(Extension::Html));
        assert_eq!(Extension::parse("Jpeg"), Some(Extension::Jpeg));
        assert_eq!(Extension::parse("pdf"), None);
        assert_eq!(Extension::parse(""), None);
        assert_eq!(Extension::parse(".."), None);
    }

    #[test]
    fn test_valid_extensions() {
        assert_eq!(valid_extensions(TEXT_MARKDOWN), vec!["md", "html", "txt"]);
        assert_eq!(valid_extensions(TEXT_PLAIN), vec!["txt"]);
        assert_eq!(valid_extensions("text/csv; charset=utf-8"), vec!["csv", "txt", "json"]);
        assert_eq!(
            valid_extensions(APPLICATION_JSON),
            vec!["json", "yaml", "yml", "txt"]
        );
        assert!(valid_extensions("text/x-custom").is_empty());
        assert!(valid_extensions("not a type").is_empty());
    }

    #[test]
    fn test_formats_deduplicates_jpeg() {
        assert_eq!(
            formats(IMAGE_GIF),
            vec![IMAGE_PNG, IMAGE_JPEG, IMAGE_WEBP, IMAGE_GIF]
        );
        assert_eq!(
            formats(APPLICATION_JSON),
            vec![APPLICATION_JSON, APPLICATION_YAML, TEXT_PLAIN]
        );
        assert_eq!(formats(TEXT_CSV), vec![TEXT_CSV, TEXT_PLAIN, APPLICATION_JSON]);
        assert_eq!(formats("text/x-custom"), vec!["text/x-custom"]);
    }

    #[test]
    fn test_markdown_to_html() {
        let out = convert(Bytes::from_static(b"# Hello"), "text/markdown", "html").unwrap();
        assert_eq!(out.content_type, TEXT_HTML);
        assert!(std::str::from_utf8(&out.data)
            .unwrap()
            .contains("<h1>Hello</h1>"));
    }

    #[test]
    fn test_markdown_to_txt_is_raw() {
        let out = convert(Bytes::from_static(b"**bold**"), "text/markdown", ".txt").unwrap();
        assert_eq!(out.data, Bytes::from_static(b"**bold**"));
        assert_eq!(out.content_type, TEXT_PLAIN);
    }

    #[test]
    fn test_identity_is_lossless() {
        let data = Bytes::from_static(b"{\"a\": 1}");
        let out = convert(data.clone(), "application/json; charset=utf-8", "json").unwrap();
        assert_eq!(out.data, data);
        assert_eq!(out.content_type, APPLICATION_JSON);

        let out = convert(Bytes::from_static(b"plain"), TEXT_PLAIN, "TXT").unwrap();
        assert_eq!(out.data, Bytes::from_static(b"plain"));
        assert_eq!(out.content_type, TEXT_PLAIN);
    }

    #[test]
    fn test_html_to_txt() {
        let out = convert(Bytes::from_static(b"<p>hi</p>"), TEXT_HTML, "txt").unwrap();
        assert_eq!(out.data, Bytes::from_static(b"hi"));
    }

    #[test]
    fn test_unsupported_pairs() {
        for (source, target) in [
            (TEXT_PLAIN, "pdf"),
            (TEXT_PLAIN, "html"),
            (TEXT_HTML, "md"),
            (APPLICATION_JSON, "png"),
            (IMAGE_PNG, "txt"),
            (TEXT_CSV, "yaml"),
            (APPLICATION_YAML, "json"),
            ("text/x-custom", "txt"),
            ("garbage", "txt"),
        ] {
            let err = convert(Bytes::from_static(b"x"), source, target).unwrap_err();
            assert!(
                matches!(err, ConvertError::UnsupportedConversion { .. }),
                "{source} -> {target}"
            );
        }
    }

    #[test]
    fn test_unsupported_checked_before_input() {
        // invalid utf-8 would be malformed, but the pair is rejected first
        let err = convert(Bytes::from_static(&[0xff]), TEXT_HTML, "json").unwrap_err();
        assert_eq!(
            err,
            ConvertError::UnsupportedConversion {
                from: TEXT_HTML.to_string(),
                to: "json".to_string()
            }
        );
    }

    #[test]
    fn test_csv_conversions() {
        let data = Bytes::from_static(b"a,b\n1,2\n");

        let out = convert(data.clone(), TEXT_CSV, "csv").unwrap();
        assert_eq!(out.data, data);
        assert_eq!(out.content_type, TEXT_CSV);

        let out = convert(data.clone(), TEXT_CSV, "txt").unwrap();
        assert_eq!(out.data, data);
        assert_eq!(out.content_type, TEXT_PLAIN);

        let out = convert(data, TEXT_CSV, "json").unwrap();
        assert_eq!(out.content_type, APPLICATION_JSON);
        assert_eq!(out.data, Bytes::from_static(br#"[{"a":"1","b":"2"}]"#));
    }

    #[test]
    fn test_json_to_yaml() {
        for ext in ["yaml", ".YML"] {
            let out = convert(Bytes::from_static(b"{}"), APPLICATION_JSON, ext).unwrap();
            assert_eq!(out.content_type, APPLICATION_YAML);
            assert_eq!(std::str::from_utf8(&out.data).unwrap().trim(), "{}");
        }

        let err = convert(Bytes::from_static(b"[1,"), APPLICATION_JSON, "yaml").unwrap_err();
        assert!(matches!(err, ConvertError::Malformed { .. }));
    }

    #[test]
    fn test_yaml_identity_and_txt() {
        let data = Bytes::from_static(b"a: 1\n");
        let out = convert(data.clone(), APPLICATION_YAML, "yml").unwrap();
        assert_eq!(out.data, data);
        assert_eq!(out.content_type, APPLICATION_YAML);
        let out = convert(data.clone(), APPLICATION_YAML, "txt").unwrap();
        assert_eq!(out.data, data);
        assert_eq!(out.content_type, TEXT_PLAIN);
    }

    #[test]
    fn test_malformed_markdown() {
        let err = convert(Bytes::from_static(&[0xff, 0xfe]), TEXT_MARKDOWN, "html").unwrap_err();
        assert!(matches!(err, ConvertError::Malformed { .. }));
    }
}
