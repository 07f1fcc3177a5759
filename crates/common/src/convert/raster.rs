use std::io::Cursor;

use image::ImageFormat;

use super::ConvertError;

/// Decode `data` as `source` and re-encode it as `target`.
///
/// JPEG has no alpha channel, so JPEG output is flattened to RGB; every other
/// target is written as RGBA.
pub fn reencode(data: &[u8], source: &str, target: ImageFormat) -> Result<Vec<u8>, ConvertError> {
    let format = ImageFormat::from_mime_type(source)
        .ok_or_else(|| ConvertError::malformed(source, "unknown image format"))?;
    let decoded = image::load_from_memory_with_format(data, format)
        .map_err(|e| ConvertError::malformed(source, e))?;

    let mut out = Cursor::new(Vec::new());
    let written = match target {
        ImageFormat::Jpeg => decoded.to_rgb8().write_to(&mut out, target),
        _ => decoded.to_rgba8().write_to(&mut out, target),
    };
    written.map_err(|e| ConvertError::malformed(source, e))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(4, 4, Rgba([200, 10, 10, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_png_to_jpeg_and_gif() {
        let source = png();
        for target in [ImageFormat::Jpeg, ImageFormat::Gif, ImageFormat::Png] {
            let out = reencode(&source, "image/png", target).unwrap();
            assert_eq!(image::guess_format(&out).unwrap(), target);
        }
    }

    #[test]
    fn test_corrupt_input() {
        let err = reencode(b"not an image", "image/png", ImageFormat::Gif).unwrap_err();
        assert!(matches!(err, ConvertError::Malformed { .. }));
    }
}
