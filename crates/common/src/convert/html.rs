use std::sync::LazyLock;

use regex::Regex;

use super::ConvertError;
use crate::media::TEXT_HTML;

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Strip markup, leaving the text content.
pub fn to_text(data: &[u8]) -> Result<String, ConvertError> {
    let html = std::str::from_utf8(data).map_err(|e| ConvertError::malformed(TEXT_HTML, e))?;
    Ok(TAG_REGEX.replace_all(html, "").into_owned())
}
