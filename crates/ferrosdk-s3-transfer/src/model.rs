//! Request and response shapes exchanged with an [`S3CopyClient`].
//!
//! Only the fields the copy orchestrator reads or forwards are modelled.
//! Requests are built with [`typed_builder`]; responses are plain structs with
//! public fields and a [`Default`] so transports can fill in what they have.
//!
//! [`S3CopyClient`]: crate::client::S3CopyClient

use std::collections::HashMap;

use typed_builder::TypedBuilder;

/// Customer-provided server-side encryption parameters (SSE-C).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseCustomer {
    /// Encryption algorithm, e.g. `AES256`.
    pub algorithm: Option<String>,
    /// Base64 encryption key.
    pub key: Option<String>,
    /// Base64 MD5 of the key.
    pub key_md5: Option<String>,
}

impl SseCustomer {
    /// Whether no parameter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.algorithm.is_none() && self.key.is_none() && self.key_md5.is_none()
    }
}

/// Checksums S3 reports for an object or a part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checksums {
    /// `x-amz-checksum-crc32`.
    pub crc32: Option<String>,
    /// `x-amz-checksum-crc32c`.
    pub crc32c: Option<String>,
    /// `x-amz-checksum-sha1`.
    pub sha1: Option<String>,
    /// `x-amz-checksum-sha256`.
    pub sha256: Option<String>,
}

/// Copy of one object to another location.
///
/// # Examples
///
/// ```
/// use ferrosdk_s3_transfer::model::CopyObjectRequest;
///
/// let request = CopyObjectRequest::builder()
///     .source_bucket("src")
///     .source_key("a.bin")
///     .destination_bucket("dst")
///     .destination_key("b.bin")
///     .content_type("application/octet-stream")
///     .build();
/// assert_eq!(request.source_version_id, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct CopyObjectRequest {
    /// Source bucket.
    #[builder(setter(into))]
    pub source_bucket: String,
    /// Source key.
    #[builder(setter(into))]
    pub source_key: String,
    /// Source version to copy.
    #[builder(default, setter(strip_option, into))]
    pub source_version_id: Option<String>,
    /// Destination bucket.
    #[builder(setter(into))]
    pub destination_bucket: String,
    /// Destination key.
    #[builder(setter(into))]
    pub destination_key: String,
    /// Copy only if the source ETag matches.
    #[builder(default, setter(strip_option, into))]
    pub copy_source_if_match: Option<String>,
    /// User metadata stored on the destination.
    #[builder(default)]
    pub metadata: HashMap<String, String>,
    /// `Content-Type` of the destination.
    #[builder(default, setter(strip_option, into))]
    pub content_type: Option<String>,
    /// `Cache-Control` of the destination.
    #[builder(default, setter(strip_option, into))]
    pub cache_control: Option<String>,
    /// `Content-Disposition` of the destination.
    #[builder(default, setter(strip_option, into))]
    pub content_disposition: Option<String>,
    /// `Content-Encoding` of the destination.
    #[builder(default, setter(strip_option, into))]
    pub content_encoding: Option<String>,
    /// `Content-Language` of the destination.
    #[builder(default, setter(strip_option, into))]
    pub content_language: Option<String>,
    /// Destination storage class.
    #[builder(default, setter(strip_option, into))]
    pub storage_class: Option<String>,
    /// Destination server-side encryption, e.g. `aws:kms`.
    #[builder(default, setter(strip_option, into))]
    pub server_side_encryption: Option<String>,
    /// KMS key for the destination.
    #[builder(default, setter(strip_option, into))]
    pub ssekms_key_id: Option<String>,
    /// Checksum algorithm requested for the destination.
    #[builder(default, setter(strip_option, into))]
    pub checksum_algorithm: Option<String>,
    /// SSE-C parameters of the destination.
    #[builder(default)]
    pub sse_customer: SseCustomer,
    /// SSE-C parameters needed to read the source.
    #[builder(default)]
    pub copy_source_sse_customer: SseCustomer,
}

/// Result of a copy, single-request or multipart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyObjectResponse {
    /// ETag of the new object.
    pub e_tag: Option<String>,
    /// Version id of the new object.
    pub version_id: Option<String>,
    /// Checksums of the new object.
    pub checksums: Checksums,
    /// Expiration rule applied to the object.
    pub expiration: Option<String>,
    /// Server-side encryption applied.
    pub server_side_encryption: Option<String>,
    /// KMS key used.
    pub ssekms_key_id: Option<String>,
    /// Whether an S3 bucket key was used.
    pub bucket_key_enabled: Option<bool>,
}

/// Metadata lookup on the copy source.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct HeadObjectRequest {
    /// Bucket.
    #[builder(setter(into))]
    pub bucket: String,
    /// Key.
    #[builder(setter(into))]
    pub key: String,
    /// Version to inspect.
    #[builder(default, setter(strip_option, into))]
    pub version_id: Option<String>,
    /// Precondition on the ETag.
    #[builder(default, setter(strip_option, into))]
    pub if_match: Option<String>,
    /// SSE-C parameters needed to read the object.
    #[builder(default)]
    pub sse_customer: SseCustomer,
}

/// Metadata of the copy source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadObjectResponse {
    /// Object size in bytes.
    pub content_length: Option<u64>,
    /// ETag.
    pub e_tag: Option<String>,
    /// Version id.
    pub version_id: Option<String>,
    /// `Content-Type`.
    pub content_type: Option<String>,
}

/// Start of a multipart upload on the destination.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct CreateMultipartUploadRequest {
    /// Bucket.
    #[builder(setter(into))]
    pub bucket: String,
    /// Key.
    #[builder(setter(into))]
    pub key: String,
    /// User metadata.
    #[builder(default)]
    pub metadata: HashMap<String, String>,
    /// `Content-Type`.
    #[builder(default, setter(into))]
    pub content_type: Option<String>,
    /// `Cache-Control`.
    #[builder(default, setter(into))]
    pub cache_control: Option<String>,
    /// `Content-Disposition`.
    #[builder(default, setter(into))]
    pub content_disposition: Option<String>,
    /// `Content-Encoding`.
    #[builder(default, setter(into))]
    pub content_encoding: Option<String>,
    /// `Content-Language`.
    #[builder(default, setter(into))]
    pub content_language: Option<String>,
    /// Storage class.
    #[builder(default, setter(into))]
    pub storage_class: Option<String>,
    /// Server-side encryption.
    #[builder(default, setter(into))]
    pub server_side_encryption: Option<String>,
    /// KMS key.
    #[builder(default, setter(into))]
    pub ssekms_key_id: Option<String>,
    /// Checksum algorithm.
    #[builder(default, setter(into))]
    pub checksum_algorithm: Option<String>,
    /// SSE-C parameters.
    #[builder(default)]
    pub sse_customer: SseCustomer,
}

/// Answer to [`CreateMultipartUploadRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateMultipartUploadResponse {
    /// Upload id; required to continue.
    pub upload_id: Option<String>,
}

/// Copy of one byte range of the source into a part of the upload.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct UploadPartCopyRequest {
    /// Source bucket.
    #[builder(setter(into))]
    pub source_bucket: String,
    /// Source key.
    #[builder(setter(into))]
    pub source_key: String,
    /// Source version.
    #[builder(default, setter(into))]
    pub source_version_id: Option<String>,
    /// Destination bucket.
    #[builder(setter(into))]
    pub destination_bucket: String,
    /// Destination key.
    #[builder(setter(into))]
    pub destination_key: String,
    /// Upload this part belongs to.
    #[builder(setter(into))]
    pub upload_id: String,
    /// 1-based part number.
    pub part_number: u32,
    /// Inclusive byte range, `bytes=<start>-<end>`.
    #[builder(setter(into))]
    pub copy_source_range: String,
    /// Precondition on the source ETag.
    #[builder(default, setter(into))]
    pub copy_source_if_match: Option<String>,
    /// SSE-C parameters of the destination.
    #[builder(default)]
    pub sse_customer: SseCustomer,
    /// SSE-C parameters needed to read the source.
    #[builder(default)]
    pub copy_source_sse_customer: SseCustomer,
}

/// Answer to [`UploadPartCopyRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadPartCopyResponse {
    /// ETag of the part.
    pub e_tag: Option<String>,
    /// Checksums of the part.
    pub checksums: Checksums,
}

/// A finished part listed in the completion request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedPart {
    /// 1-based part number.
    pub part_number: u32,
    /// ETag returned by the part copy.
    pub e_tag: Option<String>,
    /// Checksums returned by the part copy.
    pub checksums: Checksums,
}

/// Completion of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct CompleteMultipartUploadRequest {
    /// Bucket.
    #[builder(setter(into))]
    pub bucket: String,
    /// Key.
    #[builder(setter(into))]
    pub key: String,
    /// Upload id.
    #[builder(setter(into))]
    pub upload_id: String,
    /// Parts in ascending part-number order.
    pub parts: Vec<CompletedPart>,
    /// SSE-C parameters of the destination.
    #[builder(default)]
    pub sse_customer: SseCustomer,
}

/// Answer to [`CompleteMultipartUploadRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompleteMultipartUploadResponse {
    /// Bucket.
    pub bucket: Option<String>,
    /// Key.
    pub key: Option<String>,
    /// URI of the object.
    pub location: Option<String>,
    /// ETag of the assembled object.
    pub e_tag: Option<String>,
    /// Version id.
    pub version_id: Option<String>,
    /// Checksums of the assembled object.
    pub checksums: Checksums,
    /// Expiration rule.
    pub expiration: Option<String>,
    /// Server-side encryption applied.
    pub server_side_encryption: Option<String>,
    /// KMS key used.
    pub ssekms_key_id: Option<String>,
    /// Whether an S3 bucket key was used.
    pub bucket_key_enabled: Option<bool>,
}

impl From<CompleteMultipartUploadResponse> for CopyObjectResponse {
    fn from(response: CompleteMultipartUploadResponse) -> Self {
        Self {
            e_tag: response.e_tag,
            version_id: response.version_id,
            checksums: response.checksums,
            expiration: response.expiration,
            server_side_encryption: response.server_side_encryption,
            ssekms_key_id: response.ssekms_key_id,
            bucket_key_enabled: response.bucket_key_enabled,
        }
    }
}

/// Abort of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct AbortMultipartUploadRequest {
    /// Bucket.
    #[builder(setter(into))]
    pub bucket: String,
    /// Key.
    #[builder(setter(into))]
    pub key: String,
    /// Upload id.
    #[builder(setter(into))]
    pub upload_id: String,
}

impl CopyObjectRequest {
    pub(crate) fn head_request(&self) -> HeadObjectRequest {
        HeadObjectRequest {
            bucket: self.source_bucket.clone(),
            key: self.source_key.clone(),
            version_id: self.source_version_id.clone(),
            if_match: self.copy_source_if_match.clone(),
            sse_customer: self.copy_source_sse_customer.clone(),
        }
    }

    pub(crate) fn create_multipart_request(&self) -> CreateMultipartUploadRequest {
        CreateMultipartUploadRequest {
            bucket: self.destination_bucket.clone(),
            key: self.destination_key.clone(),
            metadata: self.metadata.clone(),
            content_type: self.content_type.clone(),
            cache_control: self.cache_control.clone(),
            content_disposition: self.content_disposition.clone(),
            content_encoding: self.content_encoding.clone(),
            content_language: self.content_language.clone(),
            storage_class: self.storage_class.clone(),
            server_side_encryption: self.server_side_encryption.clone(),
            ssekms_key_id: self.ssekms_key_id.clone(),
            checksum_algorithm: self.checksum_algorithm.clone(),
            sse_customer: self.sse_customer.clone(),
        }
    }

    pub(crate) fn part_request(
        &self,
        upload_id: &str,
        part_number: u32,
        range: String,
    ) -> UploadPartCopyRequest {
        UploadPartCopyRequest {
            source_bucket: self.source_bucket.clone(),
            source_key: self.source_key.clone(),
            source_version_id: self.source_version_id.clone(),
            destination_bucket: self.destination_bucket.clone(),
            destination_key: self.destination_key.clone(),
            upload_id: upload_id.to_owned(),
            part_number,
            copy_source_range: range,
            copy_source_if_match: self.copy_source_if_match.clone(),
            sse_customer: self.sse_customer.clone(),
            copy_source_sse_customer: self.copy_source_sse_customer.clone(),
        }
    }

    pub(crate) fn complete_request(
        &self,
        upload_id: &str,
        parts: Vec<CompletedPart>,
    ) -> CompleteMultipartUploadRequest {
        CompleteMultipartUploadRequest {
            bucket: self.destination_bucket.clone(),
            key: self.destination_key.clone(),
            upload_id: upload_id.to_owned(),
            parts,
            sse_customer: self.sse_customer.clone(),
        }
    }

    pub(crate) fn abort_request(&self, upload_id: &str) -> AbortMultipartUploadRequest {
        AbortMultipartUploadRequest {
            bucket: self.destination_bucket.clone(),
            key: self.destination_key.clone(),
            upload_id: upload_id.to_owned(),
        }
    }
}
