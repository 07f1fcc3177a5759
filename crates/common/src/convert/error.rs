#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// The pair is not in the compatibility table, or the extension is unknown
    #[error("cannot convert {from} to .{to}")]
    UnsupportedConversion { from: String, to: String },
    /// The input could not be read as its declared type
    #[error("malformed {media_type} input: {reason}")]
    Malformed { media_type: String, reason: String },
}

impl ConvertError {
    pub(crate) fn malformed(media_type: &str, reason: impl std::fmt::Display) -> Self {
        Self::Malformed {
            media_type: media_type.to_string(),
            reason: reason.to_string(),
        }
    }
}
