//! Converting stored fragments

mod common;

use ::common::convert::{convert, ConvertError};
use ::common::fragment::Fragment;
use bytes::Bytes;
use store::Store;

async fn convert_stored(store: &Store, fragment: &Fragment, extension: &str) -> Result<(Bytes, String), ConvertError> {
    let data = fragment.data(store).await.unwrap().unwrap();
    convert(data, fragment.fragment_type(), extension).map(|c| (c.data, c.content_type))
}

#[tokio::test]
async fn test_markdown_fragment_to_html() {
    let store = Store::memory();
    let fragment = common::saved_fragment(&store, "owner", "text/markdown", b"# Hi").await;

    let (data, content_type) = convert_stored(&store, &fragment, "html").await.unwrap();
    assert_eq!(content_type, "text/html");
    assert!(String::from_utf8(data.to_vec()).unwrap().contains("<h1>Hi</h1>"));
}

#[tokio::test]
async fn test_plain_fragment() {
    let store = Store::memory();
    let fragment = common::saved_fragment(&store, "owner", "text/plain", b"hello").await;

    let (data, content_type) = convert_stored(&store, &fragment, ".txt").await.unwrap();
    assert_eq!(data, Bytes::from_static(b"hello"));
    assert_eq!(content_type, "text/plain");

    let err = convert_stored(&store, &fragment, "pdf").await.unwrap_err();
    assert!(matches!(err, ConvertError::UnsupportedConversion { .. }));
}

#[tokio::test]
async fn test_png_fragment_to_other_images() {
    let store = Store::memory();
    let fragment = common::saved_fragment(&store, "owner", "image/png", &common::red_png()).await;

    for (extension, format, content_type) in [
        ("jpg", image::ImageFormat::Jpeg, "image/jpeg"),
        ("webp", image::ImageFormat::WebP, "image/webp"),
        ("gif", image::ImageFormat::Gif, "image/gif"),
    ] {
        let (data, actual_type) = convert_stored(&store, &fragment, extension).await.unwrap();
        assert_eq!(actual_type, content_type);
        assert_eq!(image::guess_format(&data).unwrap(), format);
        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 8));
    }

    let (data, _) = convert_stored(&store, &fragment, "png").await.unwrap();
    assert_eq!(data, Bytes::from(common::red_png()));
}

#[tokio::test]
async fn test_corrupt_image_is_malformed() {
    let store = Store::memory();
    let fragment = common::saved_fragment(&store, "owner", "image/jpeg", b"definitely not a jpeg").await;

    let err = convert_stored(&store, &fragment, "png").await.unwrap_err();
    assert!(matches!(err, ConvertError::Malformed { .. }));
}

#[tokio::test]
async fn test_csv_fragment_conversions() {
    let store = Store::memory();
    let fragment = common::saved_fragment(&store, "owner", "text/csv", b"a,b\n1,2\n").await;
    assert_eq!(
        fragment.formats(),
        vec!["text/csv", "text/plain", "application/json"]
    );

    let (data, content_type) = convert_stored(&store, &fragment, "csv").await.unwrap();
    assert_eq!(data, Bytes::from_static(b"a,b\n1,2\n"));
    assert_eq!(content_type, "text/csv");

    let (data, content_type) = convert_stored(&store, &fragment, "txt").await.unwrap();
    assert_eq!(data, Bytes::from_static(b"a,b\n1,2\n"));
    assert_eq!(content_type, "text/plain");

    let (data, content_type) = convert_stored(&store, &fragment, "json").await.unwrap();
    assert_eq!(content_type, "application/json");
    let rows: serde_json::Value = serde_json::from_slice(&data).unwrap();
    assert_eq!(rows, serde_json::json!([{"a": "1", "b": "2"}]));
}

#[tokio::test]
async fn test_json_fragment_to_yaml() {
    let store = Store::memory();
    let fragment = common::saved_fragment(&store, "owner", "application/json", b"{}").await;

    let (data, content_type) = convert_stored(&store, &fragment, "yaml").await.unwrap();
    assert_eq!(content_type, "application/yaml");
    assert_eq!(std::str::from_utf8(&data).unwrap().trim(), "{}");
}
