//! Copy configuration.
//!
//! Provides [`CopyConfig`], the sizing knobs for [`CopyObjectHelper`]. Values
//! can be loaded from environment variables.
//!
//! [`CopyObjectHelper`]: crate::copy::CopyObjectHelper

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{CopyError, CopyResult};

/// Default part size and multipart threshold: 8 MiB.
pub const DEFAULT_PART_SIZE: u64 = 8 * 1024 * 1024;

/// Sizing configuration for object copies.
///
/// # Examples
///
/// ```
/// use ferrosdk_s3_transfer::config::CopyConfig;
///
/// let config = CopyConfig::default();
/// assert_eq!(config.part_size, 8 * 1024 * 1024);
/// assert_eq!(config.multipart_threshold, config.part_size);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct CopyConfig {
    /// Minimum size in bytes of each copied part.
    #[builder(default = DEFAULT_PART_SIZE)]
    pub part_size: u64,

    /// Objects larger than this many bytes are copied in parts.
    #[builder(default = DEFAULT_PART_SIZE)]
    pub multipart_threshold: u64,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            part_size: DEFAULT_PART_SIZE,
            multipart_threshold: DEFAULT_PART_SIZE,
        }
    }
}

impl CopyConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `S3_COPY_PART_SIZE` | `8388608` |
    /// | `S3_COPY_MULTIPART_THRESHOLD` | `8388608` |
    ///
    /// Values that do not parse as an unsigned integer are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("S3_COPY_PART_SIZE") {
            if let Ok(n) = v.parse::<u64>() {
                config.part_size = n;
            }
        }
        if let Ok(v) = std::env::var("S3_COPY_MULTIPART_THRESHOLD") {
            if let Ok(n) = v.parse::<u64>() {
                config.multipart_threshold = n;
            }
        }

        config
    }

    /// Rejects zero sizes.
    pub fn validate(&self) -> CopyResult<()> {
        if self.part_size == 0 {
            return Err(CopyError::InvalidConfig(
                "part size must be greater than zero".to_owned(),
            ));
        }
        if self.multipart_threshold == 0 {
            return Err(CopyError::InvalidConfig(
                "multipart threshold must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }
}
