//! Copy error types.
//!
//! Transport failures arrive as [`BoxError`] and are wrapped by the phase in
//! which they happened. The original cause is always reachable through
//! [`std::error::Error::source`].

/// Boxed error returned by an [`S3CopyClient`](crate::client::S3CopyClient).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias for copy operations.
pub type CopyResult<T> = Result<T, CopyError>;

/// Errors produced while copying an object.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// The source object's metadata could not be fetched.
    #[error("Failed to retrieve metadata from the source object")]
    HeadObject(#[source] BoxError),

    /// The destination multipart upload could not be started.
    #[error("Failed to initiate multipart upload")]
    CreateMultipartUpload(#[source] BoxError),

    /// A part copy or the completion request failed. The upload has been
    /// aborted.
    #[error("Failed to send multipart requests")]
    MultipartRequests(#[source] BoxError),

    /// A single-request copy failed.
    #[error(transparent)]
    Transport(BoxError),

    /// The service answered without a field the copy depends on.
    #[error("Invalid {operation} response: {message}")]
    InvalidResponse {
        /// Operation whose response was incomplete.
        operation: &'static str,
        /// What was missing.
        message: String,
    },

    /// [`CopyConfig`](crate::config::CopyConfig) failed validation.
    #[error("Invalid copy configuration: {0}")]
    InvalidConfig(String),
}

impl CopyError {
    /// The innermost error in the source chain, or `self` when there is none.
    #[must_use]
    pub fn root_cause(&self) -> &(dyn std::error::Error + 'static) {
        let mut current: &(dyn std::error::Error + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }
}
