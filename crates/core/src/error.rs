/// General domain error for callers of the core crate.
///
/// Import problems have their own [`crate::hierarchy::ImportError`];
/// data-quality findings are never errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
