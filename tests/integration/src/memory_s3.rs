//! In-memory S3 object store implementing [`S3CopyClient`].
//!
//! Copies move real bytes so tests can compare source and destination. ETags
//! follow S3: the quoted MD5 of the data, and for multipart objects the MD5 of
//! the concatenated part digests suffixed with `-<parts>`.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use bytes::{Bytes, BytesMut};
use dashmap::DashMap;
use ferrosdk_s3_transfer::BoxError;
use ferrosdk_s3_transfer::client::S3CopyClient;
use ferrosdk_s3_transfer::model::{
    AbortMultipartUploadRequest, Checksums, CompleteMultipartUploadRequest,
    CompleteMultipartUploadResponse, CopyObjectRequest, CopyObjectResponse,
    CreateMultipartUploadRequest, CreateMultipartUploadResponse, HeadObjectRequest,
    HeadObjectResponse, UploadPartCopyRequest, UploadPartCopyResponse,
};
use md5::{Digest, Md5};
use parking_lot::Mutex;
use tracing::trace;

/// Errors returned by [`InMemoryS3`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The object does not exist.
    #[error("The specified key does not exist: {bucket}/{key}")]
    NoSuchKey {
        /// Bucket.
        bucket: String,
        /// Key.
        key: String,
    },

    /// The upload does not exist.
    #[error("The specified upload does not exist: {0}")]
    NoSuchUpload(String),

    /// The range is malformed or out of bounds.
    #[error("The requested range is not satisfiable: {0}")]
    InvalidRange(String),

    /// A listed part was never uploaded or its ETag differs.
    #[error("One or more of the specified parts could not be found: {0}")]
    InvalidPart(u32),

    /// The ETag precondition did not hold.
    #[error("At least one of the preconditions you specified did not hold")]
    PreconditionFailed,

    /// Failure injected by a test.
    #[error("injected failure for part {0}")]
    Injected(u32),
}

#[derive(Debug)]
struct Upload {
    bucket: String,
    key: String,
    parts: BTreeMap<u32, (String, Bytes)>,
}

/// Thread-safe in-memory object store.
#[derive(Debug, Default)]
pub struct InMemoryS3 {
    objects: DashMap<(String, String), Bytes>,
    uploads: DashMap<String, Upload>,
    aborted: Mutex<Vec<String>>,
    fail_part: Option<u32>,
    part_copies: AtomicUsize,
}

impl InMemoryS3 {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `UploadPartCopy` fails for `part_number`.
    #[must_use]
    pub fn failing_part(part_number: u32) -> Self {
        Self {
            fail_part: Some(part_number),
            ..Self::default()
        }
    }

    /// Stores an object and returns its ETag.
    pub fn put_object(&self, bucket: &str, key: &str, data: Bytes) -> String {
        let etag = etag(&data);
        self.objects.insert((bucket.to_owned(), key.to_owned()), data);
        etag
    }

    /// Reads an object.
    #[must_use]
    pub fn get_object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.objects
            .get(&(bucket.to_owned(), key.to_owned()))
            .map(|entry| entry.value().clone())
    }

    /// Number of multipart uploads neither completed nor aborted.
    #[must_use]
    pub fn open_uploads(&self) -> usize {
        self.uploads.len()
    }

    /// Ids of aborted uploads, in abort order.
    #[must_use]
    pub fn aborted_uploads(&self) -> Vec<String> {
        self.aborted.lock().clone()
    }

    /// Number of `UploadPartCopy` calls served.
    #[must_use]
    pub fn part_copies(&self) -> usize {
        self.part_copies.load(Ordering::SeqCst)
    }

    fn read(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError> {
        self.get_object(bucket, key).ok_or_else(|| StoreError::NoSuchKey {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
        })
    }
}

fn md5_hex(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}

fn etag(data: &[u8]) -> String {
    format!("\"{}\"", md5_hex(data))
}

fn crc32(data: &[u8]) -> String {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(data);
    BASE64_STANDARD.encode(hasher.finalize().to_be_bytes())
}

/// Parses `bytes=<start>-<end>` (inclusive) against an object of `len` bytes.
fn parse_range(range: &str, len: usize) -> Result<(usize, usize), StoreError> {
    let invalid = || StoreError::InvalidRange(range.to_owned());
    let (start, end) = range
        .strip_prefix("bytes=")
        .and_then(|r| r.split_once('-'))
        .ok_or_else(invalid)?;
    let start: usize = start.parse().map_err(|_| invalid())?;
    let end: usize = end.parse().map_err(|_| invalid())?;
    if start > end || end >= len {
        return Err(invalid());
    }
    Ok((start, end))
}

fn check_if_match(expected: Option<&str>, data: &[u8]) -> Result<(), StoreError> {
    match expected {
        Some(tag) if tag != etag(data) => Err(StoreError::PreconditionFailed),
        _ => Ok(()),
    }
}

#[async_trait]
impl S3CopyClient for InMemoryS3 {
    async fn head_object(
        &self,
        request: HeadObjectRequest,
    ) -> Result<HeadObjectResponse, BoxError> {
        let data = self.read(&request.bucket, &request.key)?;
        check_if_match(request.if_match.as_deref(), &data)?;
        Ok(HeadObjectResponse {
            content_length: Some(data.len() as u64),
            e_tag: Some(etag(&data)),
            ..HeadObjectResponse::default()
        })
    }

    async fn copy_object(
        &self,
        request: CopyObjectRequest,
    ) -> Result<CopyObjectResponse, BoxError> {
        let data = self.read(&request.source_bucket, &request.source_key)?;
        check_if_match(request.copy_source_if_match.as_deref(), &data)?;
        let checksums = Checksums {
            crc32: Some(crc32(&data)),
            ..Checksums::default()
        };
        let e_tag = self.put_object(&request.destination_bucket, &request.destination_key, data);
        Ok(CopyObjectResponse {
            e_tag: Some(e_tag),
            checksums,
            ..CopyObjectResponse::default()
        })
    }

    async fn create_multipart_upload(
        &self,
        request: CreateMultipartUploadRequest,
    ) -> Result<CreateMultipartUploadResponse, BoxError> {
        let upload_id = uuid::Uuid::new_v4().to_string();
        self.uploads.insert(upload_id.clone(), Upload {
            bucket: request.bucket,
            key: request.key,
            parts: BTreeMap::new(),
        });
        Ok(CreateMultipartUploadResponse {
            upload_id: Some(upload_id),
        })
    }

    async fn upload_part_copy(
        &self,
        request: UploadPartCopyRequest,
    ) -> Result<UploadPartCopyResponse, BoxError> {
        self.part_copies.fetch_add(1, Ordering::SeqCst);
        if self.fail_part == Some(request.part_number) {
            return Err(StoreError::Injected(request.part_number).into());
        }
        let source = self.read(&request.source_bucket, &request.source_key)?;
        check_if_match(request.copy_source_if_match.as_deref(), &source)?;
        let (start, end) = parse_range(&request.copy_source_range, source.len())?;
        let data = source.slice(start..=end);

        let e_tag = etag(&data);
        let checksums = Checksums {
            crc32: Some(crc32(&data)),
            ..Checksums::default()
        };
        let mut upload = self
            .uploads
            .get_mut(&request.upload_id)
            .ok_or_else(|| StoreError::NoSuchUpload(request.upload_id.clone()))?;
        trace!(upload_id = %request.upload_id, part_number = request.part_number, "stored part");
        upload
            .parts
            .insert(request.part_number, (e_tag.clone(), data));
        Ok(UploadPartCopyResponse {
            e_tag: Some(e_tag),
            checksums,
        })
    }

    async fn complete_multipart_upload(
        &self,
        request: CompleteMultipartUploadRequest,
    ) -> Result<CompleteMultipartUploadResponse, BoxError> {
        let (_, upload) = self
            .uploads
            .remove(&request.upload_id)
            .ok_or_else(|| StoreError::NoSuchUpload(request.upload_id.clone()))?;

        let mut body = BytesMut::new();
        let mut digests = Vec::new();
        let mut previous = 0;
        for part in &request.parts {
            let stored = upload
                .parts
                .get(&part.part_number)
                .filter(|(tag, _)| {
                    part.part_number > previous && part.e_tag.as_deref() == Some(tag.as_str())
                });
            let Some((_, data)) = stored else {
                return Err(StoreError::InvalidPart(part.part_number).into());
            };
            previous = part.part_number;
            body.extend_from_slice(data);
            digests.extend_from_slice(&Md5::digest(data));
        }

        let e_tag = format!("\"{}-{}\"", md5_hex(&digests), request.parts.len());
        let body = body.freeze();
        let checksums = Checksums {
            crc32: Some(crc32(&body)),
            ..Checksums::default()
        };
        self.objects
            .insert((upload.bucket.clone(), upload.key.clone()), body);
        Ok(CompleteMultipartUploadResponse {
            location: Some(format!("/{}/{}", upload.bucket, upload.key)),
            bucket: Some(upload.bucket),
            key: Some(upload.key),
            e_tag: Some(e_tag),
            checksums,
            ..CompleteMultipartUploadResponse::default()
        })
    }

    async fn abort_multipart_upload(
        &self,
        request: AbortMultipartUploadRequest,
    ) -> Result<(), BoxError> {
        self.uploads
            .remove(&request.upload_id)
            .ok_or_else(|| StoreError::NoSuchUpload(request.upload_id.clone()))?;
        self.aborted.lock().push(request.upload_id);
        Ok(())
    }
}
