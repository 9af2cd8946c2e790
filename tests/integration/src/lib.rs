//! Integration tests for ferrosdk.
//!
//! The scenarios run the crates together against in-memory collaborators: an
//! S3 object store that really copies bytes and a key-value table keyed by the
//! document schema. No external service is needed:
//! ```text
//! cargo test -p ferrosdk-integration
//! ```

use std::sync::Once;

pub mod memory_s3;
pub mod memory_table;

static INIT: Once = Once::new();

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Deterministic test payload of `len` bytes.
#[must_use]
pub fn test_payload(len: usize) -> bytes::Bytes {
    (0..len)
        .map(|i| u8::try_from(i % 251).unwrap_or_default())
        .collect::<Vec<_>>()
        .into()
}

mod test_copy;
mod test_document;
