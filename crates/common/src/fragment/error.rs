use store::StoreError;

/// Rejected constructor input.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("owner id is required")]
    EmptyOwner,
    #[error("type is required")]
    EmptyType,
    #[error("unsupported type: {0}")]
    UnsupportedType(String),
    #[error("size must be non-negative, got {0}")]
    NegativeSize(i64),
    #[error("updated ({updated}) is earlier than created ({created})")]
    UpdatedBeforeCreated { created: String, updated: String },
}

#[derive(Debug, thiserror::Error)]
pub enum FragmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
    /// A replacement payload declared a different media type than the stored one
    #[error("type mismatch: fragment is {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },
}
