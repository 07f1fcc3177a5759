use pulldown_cmark::{html, Options, Parser};

use super::ConvertError;
use crate::media::TEXT_MARKDOWN;

/// Render CommonMark (with tables and strikethrough) to an HTML fragment.
pub fn to_html(data: &[u8]) -> Result<String, ConvertError> {
    let markdown =
        std::str::from_utf8(data).map_err(|e| ConvertError::malformed(TEXT_MARKDOWN, e))?;

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_output, parser);
    Ok(html_output)
}
