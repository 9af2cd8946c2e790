//! Copy orchestration.
//!
//! [`CopyObjectHelper`] copies an object server-side. Small objects go through
//! one `CopyObject` request. Larger ones are copied as a multipart upload:
//!
//! 1. `HeadObject` on the source to learn its size.
//! 2. `CreateMultipartUpload` on the destination.
//! 3. One `UploadPartCopy` per [`PartPlan`], all in flight at once.
//! 4. `CompleteMultipartUpload` with the parts in part-number order.
//!
//! If any part or the completion fails, the outstanding part requests are
//! dropped and the upload is aborted once. Dropping the future returned by
//! [`CopyObjectHelper::copy_object`] cancels whatever request is in flight,
//! but cannot send an abort: an upload created before the drop stays open
//! and is only reported through a `warn!` event carrying its upload id.
//!
//! [`PartPlan`]: crate::partition::PartPlan

use std::fmt;
use std::sync::Arc;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tracing::{debug, warn};

use crate::client::S3CopyClient;
use crate::config::CopyConfig;
use crate::error::{BoxError, CopyError, CopyResult};
use crate::model::{
    CompleteMultipartUploadResponse, CompletedPart, CopyObjectRequest, CopyObjectResponse,
};
use crate::partition::CopyPartitioner;
use crate::progress::{PartProgress, ProgressUpdater, TOTAL_PROGRESS_UNITS, TransferListener};

/// Copies objects, switching to multipart copy above the configured
/// threshold.
///
/// # Examples
///
/// ```no_run
/// # use std::sync::Arc;
/// # use ferrosdk_s3_transfer::{CopyConfig, CopyObjectHelper, CopyObjectRequest, S3CopyClient};
/// # async fn run(client: Arc<dyn S3CopyClient>) -> Result<(), ferrosdk_s3_transfer::CopyError> {
/// let helper = CopyObjectHelper::new(client, CopyConfig::default())?;
/// let request = CopyObjectRequest::builder()
///     .source_bucket("src")
///     .source_key("big.bin")
///     .destination_bucket("dst")
///     .destination_key("big.bin")
///     .build();
/// let response = helper.copy_object(request).await?;
/// println!("{:?}", response.e_tag);
/// # Ok(())
/// # }
/// ```
pub struct CopyObjectHelper {
    client: Arc<dyn S3CopyClient>,
    config: CopyConfig,
    partitioner: CopyPartitioner,
    listeners: Vec<Arc<dyn TransferListener>>,
}

impl CopyObjectHelper {
    /// Creates a helper; fails if `config` is invalid.
    pub fn new(client: Arc<dyn S3CopyClient>, config: CopyConfig) -> CopyResult<Self> {
        config.validate()?;
        Ok(Self {
            client,
            config,
            partitioner: CopyPartitioner::new(config.part_size),
            listeners: Vec::new(),
        })
    }

    /// Adds a progress listener notified for every copy.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn TransferListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &CopyConfig {
        &self.config
    }

    /// Copies `request.source_*` to `request.destination_*`.
    ///
    /// # Cancellation
    ///
    /// Dropping the returned future drops every outstanding request. If the
    /// multipart upload was already created, it is left open on the
    /// destination bucket; abort it with the upload id logged at `warn`
    /// level, or rely on a lifecycle rule for incomplete uploads.
    pub async fn copy_object(&self, request: CopyObjectRequest) -> CopyResult<CopyObjectResponse> {
        let mut progress = ProgressUpdater::new(self.listeners.clone());
        progress.initiated();
        let result = self.run(&request, &mut progress).await;
        match &result {
            Ok(_) => progress.complete(),
            Err(e) => progress.failed(e),
        }
        result
    }

    async fn run(
        &self,
        request: &CopyObjectRequest,
        progress: &mut ProgressUpdater,
    ) -> CopyResult<CopyObjectResponse> {
        debug!(
            bucket = %request.source_bucket,
            key = %request.source_key,
            "Fetching source object metadata"
        );
        let head = self
            .client
            .head_object(request.head_request())
            .await
            .map_err(CopyError::HeadObject)?;
        let size = head
            .content_length
            .ok_or_else(|| CopyError::InvalidResponse {
                operation: "HeadObject",
                message: "missing content length".to_owned(),
            })?;

        if size <= self.config.multipart_threshold {
            debug!(
                bucket = %request.destination_bucket,
                key = %request.destination_key,
                size,
                "Copying object in a single request"
            );
            let response = self
                .client
                .copy_object(request.clone())
                .await
                .map_err(CopyError::Transport)?;
            progress.advance(TOTAL_PROGRESS_UNITS);
            return Ok(response);
        }

        self.copy_in_parts(request, size, progress).await
    }

    async fn copy_in_parts(
        &self,
        request: &CopyObjectRequest,
        size: u64,
        progress: &mut ProgressUpdater,
    ) -> CopyResult<CopyObjectResponse> {
        let created = self
            .client
            .create_multipart_upload(request.create_multipart_request())
            .await
            .map_err(CopyError::CreateMultipartUpload)?;
        let upload_id = created
            .upload_id
            .ok_or_else(|| CopyError::InvalidResponse {
                operation: "CreateMultipartUpload",
                message: "missing upload id".to_owned(),
            })?;
        debug!(
            bucket = %request.destination_bucket,
            key = %request.destination_key,
            upload_id = %upload_id,
            size,
            "Initiated multipart copy"
        );

        let mut open = OpenUpload {
            request,
            upload_id: &upload_id,
            settled: false,
        };
        let result = match self
            .send_parts_and_complete(request, &upload_id, size, progress)
            .await
        {
            Ok(response) => Ok(response.into()),
            Err(cause) => {
                self.abort(request, &upload_id).await;
                Err(CopyError::MultipartRequests(cause))
            }
        };
        open.settled = true;
        result
    }

    async fn send_parts_and_complete(
        &self,
        request: &CopyObjectRequest,
        upload_id: &str,
        size: u64,
        progress: &mut ProgressUpdater,
    ) -> Result<CompleteMultipartUploadResponse, BoxError> {
        let plan = self.partitioner.plan(size);
        debug!(upload_id, parts = plan.len(), "Sending part copy requests");

        let mut part_progress = PartProgress::new(plan.len() as u64);
        let mut slots: Vec<Option<CompletedPart>> = vec![None; plan.len()];
        let mut in_flight: FuturesUnordered<_> = plan
            .iter()
            .enumerate()
            .map(|(slot, part)| {
                let part_request = request.part_request(upload_id, part.part_number, part.range());
                async move { (slot, self.client.upload_part_copy(part_request).await) }
            })
            .collect();

        // Returning early drops `in_flight`, cancelling the remaining parts.
        while let Some((slot, result)) = in_flight.next().await {
            let response = result?;
            let part_number = plan[slot].part_number;
            debug!(upload_id, part_number, "Copied part");
            slots[slot] = Some(CompletedPart {
                part_number,
                e_tag: response.e_tag,
                checksums: response.checksums,
            });
            progress.advance(part_progress.next_units());
        }

        let parts: Vec<CompletedPart> = slots.into_iter().flatten().collect();
        debug!(upload_id, parts = parts.len(), "Completing multipart copy");
        self.client
            .complete_multipart_upload(request.complete_request(upload_id, parts))
            .await
    }

    async fn abort(&self, request: &CopyObjectRequest, upload_id: &str) {
        debug!(upload_id, "Aborting multipart copy");
        if let Err(e) = self
            .client
            .abort_multipart_upload(request.abort_request(upload_id))
            .await
        {
            warn!(
                bucket = %request.destination_bucket,
                key = %request.destination_key,
                upload_id,
                error = %e,
                "Failed to abort multipart upload"
            );
        }
    }
}

/// Reports a multipart upload left open because the copy was dropped before
/// it completed or aborted.
struct OpenUpload<'a> {
    request: &'a CopyObjectRequest,
    upload_id: &'a str,
    settled: bool,
}

impl Drop for OpenUpload<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!(
                bucket = %self.request.destination_bucket,
                key = %self.request.destination_key,
                upload_id = self.upload_id,
                "Multipart copy cancelled, upload left open"
            );
        }
    }
}

impl fmt::Debug for CopyObjectHelper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyObjectHelper")
            .field("config", &self.config)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
