#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::sync::broadcast;
    use tokio::time::sleep;
    use crate::config::UploadConfig;
    use crate::upload::*;

    const D1: Duration = Duration::from_secs(1);
    const D2: Duration = Duration::from_secs(3);
    const EPSILON: Duration = Duration::from_millis(10);

    fn scan() -> FileDescriptor {
        FileDescriptor::new("scan.pdf", 2_100_000)
    }

    fn drain(rx: &mut broadcast::Receiver<UploadEvent>) -> Vec<UploadEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_pdf_walks_through_statuses() {
        let handle = UploadTracker::new(&UploadConfig::default());
        let tracker = handle.tracker.clone();

        let ids = tracker.submit(vec![scan()], Some(DocumentCategory::Imaging)).await.unwrap();
        assert_eq!(ids.len(), 1);

        let file = tracker.get_file(ids[0]).await.unwrap().unwrap();
        assert_eq!(file.name, "scan.pdf");
        assert_eq!(file.category, DocumentCategory::Imaging);
        assert_eq!(file.size_bytes, 2_100_000);
        assert_eq!(file.status, UploadStatus::Uploading);

        sleep(D1 + EPSILON).await;
        let file = tracker.get_file(ids[0]).await.unwrap().unwrap();
        assert_eq!(file.status, UploadStatus::Processing);

        sleep(D2 - D1).await;
        let file = tracker.get_file(ids[0]).await.unwrap().unwrap();
        assert_eq!(file.status, UploadStatus::Processed);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_still_uploading_just_before_first_deadline() {
        let handle = UploadTracker::new(&UploadConfig::default());
        let tracker = handle.tracker.clone();

        let ids = tracker.submit(vec![scan()], None).await.unwrap();

        sleep(D1 - EPSILON).await;
        let file = tracker.get_file(ids[0]).await.unwrap().unwrap();
        assert_eq!(file.status, UploadStatus::Uploading);

        // Second deadline counts from submission, not from the first transition
        sleep(D2 - D1).await;
        let file = tracker.get_file(ids[0]).await.unwrap().unwrap();
        assert_eq!(file.status, UploadStatus::Processing);

        sleep(EPSILON * 2).await;
        let file = tracker.get_file(ids[0]).await.unwrap().unwrap();
        assert_eq!(file.status, UploadStatus::Processed);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_category_is_uncategorized() {
        let handle = UploadTracker::new(&UploadConfig::default());
        let tracker = handle.tracker.clone();

        let ids = tracker.submit(vec![scan()], None).await.unwrap();
        let file = tracker.get_file(ids[0]).await.unwrap().unwrap();
        assert_eq!(file.category, DocumentCategory::Uncategorized);

        let ids = tracker.submit_labeled(vec![scan()], Some("")).await.unwrap();
        let file = tracker.get_file(ids[0]).await.unwrap().unwrap();
        assert_eq!(file.category, DocumentCategory::Uncategorized);

        let ids = tracker.submit_labeled(vec![scan()], Some("Lab Reports")).await.unwrap();
        let file = tracker.get_file(ids[0]).await.unwrap().unwrap();
        assert_eq!(file.category, DocumentCategory::LabReports);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_label_is_rejected() {
        let handle = UploadTracker::new(&UploadConfig::default());
        let tracker = handle.tracker.clone();

        let result = tracker.submit_labeled(vec![scan()], Some("Radiology")).await;
        assert!(matches!(result, Err(UploadError::UnknownCategory(_))));
        assert_eq!(tracker.file_count().await.unwrap(), 0);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_batch_is_rejected() {
        let handle = UploadTracker::new(&UploadConfig::default());
        let tracker = handle.tracker.clone();

        let result = tracker.submit(Vec::new(), None).await;
        assert!(matches!(result, Err(UploadError::EmptyBatch)));
        assert!(tracker.list_files().await.unwrap().is_empty());

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_gets_one_record_per_descriptor() {
        let handle = UploadTracker::new(&UploadConfig::default());
        let tracker = handle.tracker.clone();

        let names = ["a.pdf", "b.jpg", "c.png", "c.png"];
        let files = names.iter().map(|name| FileDescriptor::new(*name, 1024)).collect();
        let ids = tracker.submit(files, Some(DocumentCategory::Other)).await.unwrap();

        let listed = tracker.list_files().await.unwrap();
        assert_eq!(listed.len(), names.len());
        assert_eq!(listed.iter().map(|f| f.id).collect::<Vec<_>>(), ids);
        assert_eq!(listed.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(), names);
        assert!(listed.iter().all(|f| f.status == UploadStatus::Uploading));

        // Same name twice still yields distinct records
        assert_ne!(ids[2], ids[3]);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_removed_before_first_deadline_never_returns() {
        let handle = UploadTracker::new(&UploadConfig::default());
        let tracker = handle.tracker.clone();
        let mut events = tracker.subscribe_events();

        let ids = tracker.submit(vec![scan()], None).await.unwrap();
        assert!(tracker.remove(ids[0]).await.unwrap());

        sleep(D2 + EPSILON).await;
        assert!(tracker.get_file(ids[0]).await.unwrap().is_none());
        assert!(tracker.list_files().await.unwrap().is_empty());

        let events = drain(&mut events);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], UploadEvent::Submitted { .. }));
        assert!(matches!(events[1], UploadEvent::Removed { upload_id } if upload_id == ids[0]));

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_removal_while_processing_leaves_others_alone() {
        let handle = UploadTracker::new(&UploadConfig::default());
        let tracker = handle.tracker.clone();

        let ids = tracker
            .submit(vec![FileDescriptor::new("one.pdf", 1), FileDescriptor::new("two.pdf", 2)], None)
            .await
            .unwrap();

        sleep(D1 + EPSILON).await;
        assert!(tracker.remove(ids[0]).await.unwrap());

        // Later submission shifts nothing for the surviving record
        tracker.submit(vec![FileDescriptor::new("three.pdf", 3)], None).await.unwrap();

        sleep(D2 + EPSILON).await;
        let listed = tracker.list_files().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, ids[1]);
        assert!(listed.iter().all(|f| f.status == UploadStatus::Processed));

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_missing_is_noop() {
        let handle = UploadTracker::new(&UploadConfig::default());
        let tracker = handle.tracker.clone();
        let ids = tracker.submit(vec![scan()], None).await.unwrap();

        assert!(!tracker.remove(UploadId::new()).await.unwrap());
        assert!(tracker.remove(ids[0]).await.unwrap());
        assert!(!tracker.remove(ids[0]).await.unwrap());

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_is_monotonic() {
        let handle = UploadTracker::new(&UploadConfig::default());
        let tracker = handle.tracker.clone();
        let mut events = tracker.subscribe_events();

        let files = (0..5).map(|i| FileDescriptor::new(format!("doc{i}.pdf"), i)).collect();
        let ids = tracker.submit(files, None).await.unwrap();

        sleep(D2 + EPSILON).await;

        let mut last_seen: HashMap<UploadId, UploadStatus> = HashMap::new();
        for event in drain(&mut events) {
            if let UploadEvent::StatusChanged { upload_id, old_status, new_status } = event {
                assert!(new_status > old_status);
                let previous = last_seen.insert(upload_id, new_status).unwrap_or(UploadStatus::Uploading);
                assert_eq!(previous, old_status);
            }
        }

        assert_eq!(last_seen.len(), ids.len());
        assert!(last_seen.values().all(|status| *status == UploadStatus::Processed));

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_equal_delays_still_end_processed() {
        let config = UploadConfig {
            processing_delay_ms: 200,
            processed_delay_ms: 200,
            ..Default::default()
        };
        let handle = UploadTracker::new(&config);
        let tracker = handle.tracker.clone();

        let ids = tracker.submit(vec![scan()], None).await.unwrap();
        sleep(Duration::from_millis(250)).await;

        let file = tracker.get_file(ids[0]).await.unwrap().unwrap();
        assert_eq!(file.status, UploadStatus::Processed);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_filtered_subscription() {
        let handle = UploadTracker::new(&UploadConfig::default());
        let tracker = handle.tracker.clone();
        let mut processed = tracker.subscribe_filtered(|event| {
            matches!(event, UploadEvent::StatusChanged { new_status: UploadStatus::Processed, .. })
        });

        let ids = tracker.submit(vec![scan()], None).await.unwrap();

        let event = processed.recv().await.unwrap();
        assert_eq!(event.upload_id(), ids[0]);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_seeded_documents_stay_put() {
        let config = UploadConfig {
            seed_demo_documents: true,
            ..Default::default()
        };
        let handle = UploadTracker::new(&config);
        let tracker = handle.tracker.clone();

        assert_eq!(tracker.file_count().await.unwrap(), 3);
        tracker.submit(vec![scan()], None).await.unwrap();

        sleep(D2 + EPSILON).await;
        let listed = tracker.list_files().await.unwrap();
        assert_eq!(listed.len(), 4);
        assert_eq!(listed[1].name, "X-Ray_Chest.jpg");
        assert_eq!(listed[1].status, UploadStatus::Processing);
        assert_eq!(listed[3].status, UploadStatus::Processed);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_after_shutdown_fail() {
        let handle = UploadTracker::new(&UploadConfig::default());
        let tracker = handle.tracker.clone();

        tracker.submit(vec![scan()], None).await.unwrap();
        handle.shutdown().await.unwrap();

        assert!(matches!(tracker.list_files().await, Err(UploadError::TrackerShutdown)));
        assert!(matches!(
            tracker.submit(vec![scan()], None).await,
            Err(UploadError::TrackerShutdown)
        ));
    }
}
