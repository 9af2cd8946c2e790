//! Copy integration tests against the in-memory object store.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ferrosdk_dynamodb_enhanced::Document;
    use ferrosdk_s3_transfer::{
        CopyConfig, CopyError, CopyObjectHelper, CopyObjectRequest, ProgressSnapshot,
        TransferListener,
    };
    use parking_lot::Mutex;

    use crate::memory_s3::{InMemoryS3, StoreError};
    use crate::{init_tracing, test_bucket_name, test_payload};

    const PART_SIZE: u64 = 1024;

    fn helper(store: &Arc<InMemoryS3>) -> CopyObjectHelper {
        init_tracing();
        let config = CopyConfig::builder()
            .part_size(PART_SIZE)
            .multipart_threshold(2 * PART_SIZE)
            .build();
        CopyObjectHelper::new(store.clone(), config).expect("valid config")
    }

    fn request(bucket: &str, source: &str, destination: &str) -> CopyObjectRequest {
        CopyObjectRequest::builder()
            .source_bucket(bucket)
            .source_key(source)
            .destination_bucket(bucket)
            .destination_key(destination)
            .build()
    }

    #[tokio::test]
    async fn test_should_copy_small_object_in_one_request() {
        let store = Arc::new(InMemoryS3::new());
        let bucket = test_bucket_name("small");
        let data = test_payload(1500);
        let etag = store.put_object(&bucket, "src", data.clone());

        let response = helper(&store)
            .copy_object(request(&bucket, "src", "dst"))
            .await
            .expect("copy");

        assert_eq!(response.e_tag, Some(etag));
        assert_eq!(store.get_object(&bucket, "dst"), Some(data));
        assert_eq!(store.part_copies(), 0);
    }

    #[tokio::test]
    async fn test_should_copy_large_object_in_parts() {
        let store = Arc::new(InMemoryS3::new());
        let bucket = test_bucket_name("large");
        let data = test_payload(10 * 1024 + 17);
        store.put_object(&bucket, "src", data.clone());

        let response = helper(&store)
            .copy_object(request(&bucket, "src", "dst"))
            .await
            .expect("copy");

        assert_eq!(store.get_object(&bucket, "dst"), Some(data));
        assert_eq!(store.part_copies(), 11);
        assert!(response.e_tag.as_deref().is_some_and(|e| e.ends_with("-11\"")));
        assert!(response.checksums.crc32.is_some());
        assert_eq!(store.open_uploads(), 0);
    }

    #[tokio::test]
    async fn test_should_copy_across_buckets() {
        let store = Arc::new(InMemoryS3::new());
        let source_bucket = test_bucket_name("from");
        let destination_bucket = test_bucket_name("to");
        let data = test_payload(5000);
        store.put_object(&source_bucket, "a/b.bin", data.clone());

        let request = CopyObjectRequest::builder()
            .source_bucket(source_bucket.as_str())
            .source_key("a/b.bin")
            .destination_bucket(destination_bucket.as_str())
            .destination_key("copy.bin")
            .build();
        helper(&store).copy_object(request).await.expect("copy");

        assert_eq!(store.get_object(&destination_bucket, "copy.bin"), Some(data));
        assert!(store.get_object(&source_bucket, "copy.bin").is_none());
    }

    #[tokio::test]
    async fn test_should_abort_upload_when_part_fails() {
        let store = Arc::new(InMemoryS3::failing_part(2));
        let bucket = test_bucket_name("abort");
        store.put_object(&bucket, "src", test_payload(3 * 1024));

        let err = helper(&store)
            .copy_object(request(&bucket, "src", "dst"))
            .await
            .unwrap_err();

        assert!(matches!(err, CopyError::MultipartRequests(_)));
        assert!(matches!(
            err.root_cause().downcast_ref::<StoreError>(),
            Some(StoreError::Injected(2))
        ));
        assert_eq!(store.aborted_uploads().len(), 1);
        assert_eq!(store.open_uploads(), 0);
        assert!(store.get_object(&bucket, "dst").is_none());
    }

    #[tokio::test]
    async fn test_should_report_missing_source() {
        let store = Arc::new(InMemoryS3::new());
        let err = helper(&store)
            .copy_object(request("nowhere", "missing", "dst"))
            .await
            .unwrap_err();

        assert!(matches!(err, CopyError::HeadObject(_)));
        assert!(matches!(
            err.root_cause().downcast_ref::<StoreError>(),
            Some(StoreError::NoSuchKey { .. })
        ));
    }

    #[tokio::test]
    async fn test_should_honor_source_precondition() {
        let store = Arc::new(InMemoryS3::new());
        let bucket = test_bucket_name("cond");
        store.put_object(&bucket, "src", test_payload(4096));

        let request = CopyObjectRequest::builder()
            .source_bucket(bucket.as_str())
            .source_key("src")
            .destination_bucket(bucket.as_str())
            .destination_key("dst")
            .copy_source_if_match("\"stale\"")
            .build();
        let err = helper(&store).copy_object(request).await.unwrap_err();

        assert!(matches!(
            err.root_cause().downcast_ref::<StoreError>(),
            Some(StoreError::PreconditionFailed)
        ));
        assert_eq!(store.part_copies(), 0);
    }

    #[derive(Default)]
    struct Progress {
        snapshots: Mutex<Vec<ProgressSnapshot>>,
        completed: Mutex<bool>,
    }

    impl TransferListener for Progress {
        fn bytes_transferred(&self, snapshot: ProgressSnapshot) {
            self.snapshots.lock().push(snapshot);
        }

        fn transfer_complete(&self, _snapshot: ProgressSnapshot) {
            *self.completed.lock() = true;
        }
    }

    #[tokio::test]
    async fn test_should_report_monotonic_progress() {
        let store = Arc::new(InMemoryS3::new());
        let bucket = test_bucket_name("progress");
        store.put_object(&bucket, "src", test_payload(7 * 1024));

        let progress = Arc::new(Progress::default());
        helper(&store)
            .with_listener(progress.clone())
            .copy_object(request(&bucket, "src", "dst"))
            .await
            .expect("copy");

        let units: Vec<u64> = progress
            .snapshots
            .lock()
            .iter()
            .map(ProgressSnapshot::transferred_units)
            .collect();
        assert_eq!(units.len(), 7);
        assert!(units.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(units.last(), Some(&10_000));
        assert!(*progress.completed.lock());
    }

    #[tokio::test]
    async fn test_should_copy_serialized_document_intact() {
        let store = Arc::new(InMemoryS3::new());
        let bucket = test_bucket_name("doc");
        let items: Vec<String> = (0..400).map(|i| format!("item-{i:04}")).collect();
        let document = Document::builder()
            .put_string("id", "export-1")
            .put_string_set("items", items.clone())
            .put_number("total", 400)
            .build()
            .expect("build");
        let body = document.to_json().expect("json");
        assert!(body.len() as u64 > 2 * PART_SIZE);
        store.put_object(&bucket, "export.json", body.into());

        helper(&store)
            .copy_object(request(&bucket, "export.json", "backup.json"))
            .await
            .expect("copy");

        let copied = store.get_object(&bucket, "backup.json").expect("copied");
        let text = std::str::from_utf8(&copied).expect("utf8");
        let restored = Document::from_json(text).expect("parse").expect("document");
        assert_eq!(restored.get_string("id").unwrap().as_deref(), Some("export-1"));
        assert_eq!(
            restored.get_number("total").unwrap().map(|n| n.to_string()),
            Some("400".to_owned())
        );
        let list: Vec<String> = restored
            .get_list("items", &ferrosdk_dynamodb_enhanced::EnhancedType::of())
            .unwrap()
            .expect("items");
        assert_eq!(list, items);
    }
}
