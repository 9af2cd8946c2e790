//! Server-side copy of S3 objects of any size.
//!
//! [`CopyObjectHelper`] decides between a single `CopyObject` request and a
//! multipart copy, splits large objects with [`CopyPartitioner`], runs the part
//! copies concurrently and cleans up the upload on failure. The actual S3 calls
//! go through the [`S3CopyClient`] trait.

pub mod client;
pub mod config;
pub mod copy;
pub mod error;
pub mod model;
pub mod partition;
pub mod progress;

pub use client::S3CopyClient;
pub use config::CopyConfig;
pub use copy::CopyObjectHelper;
pub use error::{BoxError, CopyError, CopyResult};
pub use model::{CopyObjectRequest, CopyObjectResponse};
pub use partition::{CopyPartitioner, MAX_PARTS, PartPlan};
pub use progress::{ProgressSnapshot, TOTAL_PROGRESS_UNITS, TransferListener};
