//! Transport seam for object copies.

use async_trait::async_trait;

use crate::error::BoxError;
use crate::model::{
    AbortMultipartUploadRequest, CompleteMultipartUploadRequest, CompleteMultipartUploadResponse,
    CopyObjectRequest, CopyObjectResponse, CreateMultipartUploadRequest,
    CreateMultipartUploadResponse, HeadObjectRequest, HeadObjectResponse, UploadPartCopyRequest,
    UploadPartCopyResponse,
};

/// The S3 operations a copy needs.
///
/// Implementations own signing, retries and the wire format. Each call is
/// independent; [`CopyObjectHelper`](crate::copy::CopyObjectHelper) issues
/// part copies concurrently against one shared client. Dropping a returned
/// future must cancel the request.
///
/// [`abort_multipart_upload`](Self::abort_multipart_upload) is only called
/// when a part or the completion fails. A copy that is dropped after
/// [`create_multipart_upload`](Self::create_multipart_upload) returned
/// leaves that upload open.
#[async_trait]
pub trait S3CopyClient: Send + Sync {
    /// Fetches the metadata of an object.
    async fn head_object(&self, request: HeadObjectRequest)
    -> Result<HeadObjectResponse, BoxError>;

    /// Copies an object in one request.
    async fn copy_object(&self, request: CopyObjectRequest)
    -> Result<CopyObjectResponse, BoxError>;

    /// Starts a multipart upload.
    async fn create_multipart_upload(
        &self,
        request: CreateMultipartUploadRequest,
    ) -> Result<CreateMultipartUploadResponse, BoxError>;

    /// Copies a byte range of an object into one part.
    async fn upload_part_copy(
        &self,
        request: UploadPartCopyRequest,
    ) -> Result<UploadPartCopyResponse, BoxError>;

    /// Assembles the uploaded parts into the final object.
    async fn complete_multipart_upload(
        &self,
        request: CompleteMultipartUploadRequest,
    ) -> Result<CompleteMultipartUploadResponse, BoxError>;

    /// Discards a multipart upload and its parts.
    async fn abort_multipart_upload(
        &self,
        request: AbortMultipartUploadRequest,
    ) -> Result<(), BoxError>;
}
