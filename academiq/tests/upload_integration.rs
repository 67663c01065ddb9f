//! Video uploads against the mock backend.

mod common;

use academiq::{
    ApiClient, ApiError, Session, UploadStrategy,
    media::{BookmarkDraft, ProgressReporter, UploadFile, UploadRequest, VideoDetails, VideoUploader},
};
use common::{MockBackend, Received, TEACHER_ID, teacher_session};
use rand::RngCore;
use std::sync::{Arc, Mutex, atomic::Ordering};

fn recorder() -> (ProgressReporter, Arc<Mutex<Vec<u8>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (ProgressReporter::new(move |p| sink.lock().unwrap().push(p)), seen)
}

fn random_file(name: &str, content_type: &str, len: usize) -> UploadFile {
    let mut data = vec![0u8; len];
    rand::rng().fill_bytes(&mut data);
    UploadFile::new(name, content_type, data)
}

fn assert_monotonic_to_complete(seen: &[u8]) {
    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "progress went back: {seen:?}");
    assert_eq!(seen.first(), Some(&0));
    assert_eq!(seen.last(), Some(&100));
    assert_eq!(seen.iter().filter(|p| **p == 100).count(), 1);
}

fn uploader(backend: &MockBackend, session: &Session, strategy: UploadStrategy) -> VideoUploader {
    let client: ApiClient = backend.client(session);
    VideoUploader::new(client, strategy)
}

#[tokio::test]
async fn test_multipart_upload_reports_progress_and_creates_bookmarks() {
    let backend = MockBackend::spawn().await;
    let session = teacher_session();
    let mut uploader = uploader(&backend, &session, UploadStrategy::Multipart);
    let (progress, seen) = recorder();

    let request = UploadRequest::new(
        random_file("lesson.mp4", "video/mp4", 300 * 1024),
        VideoDetails::new("Lifetimes"),
    )
    .thumbnail(random_file("cover.png", "image/png", 10 * 1024))
    .bookmarks(vec![
        BookmarkDraft::new(90.0, "Elision"),
        BookmarkDraft::new(15.5, "Intro"),
    ]);

    let video = uploader.upload(request, progress).await.unwrap();
    assert_eq!(video.id, 41);
    assert_eq!(video.title, "Lifetimes");

    let seen = seen.lock().unwrap();
    assert_monotonic_to_complete(&seen);
    assert!(seen.len() > 3, "expected streamed progress, got {seen:?}");

    let uploads = backend.state.uploads.lock().unwrap();
    let fields = &uploads[0];
    assert_eq!(
        fields.get("Video"),
        Some(&Received::File {
            file_name: "lesson.mp4".to_string(),
            len: 300 * 1024
        })
    );
    assert!(matches!(fields.get("Miniatura"), Some(Received::File { .. })));
    assert_eq!(fields.get("IdUsuario"), Some(&Received::Text(TEACHER_ID.to_string())));
    assert_eq!(fields.get("IdCurso"), Some(&Received::Text("1".to_string())));
    assert_eq!(fields.get("IdAsignatura"), Some(&Received::Text("1".to_string())));

    let bookmarks = backend.state.bookmarks.lock().unwrap();
    assert_eq!(bookmarks.len(), 2);
    assert!(bookmarks.iter().all(|b| b["idVideo"] == 41));
}

#[tokio::test]
async fn test_presigned_upload_follows_phase_weights() {
    let backend = MockBackend::spawn().await;
    let session = teacher_session();
    let mut uploader = uploader(&backend, &session, UploadStrategy::Presigned);
    let (progress, seen) = recorder();

    let details = VideoDetails {
        title: "Traits".to_string(),
        description: "Static and dynamic dispatch".to_string(),
        course_id: Some(2),
        subject_id: None,
    };
    let request = UploadRequest::new(random_file("traits.mp4", "video/mp4", 200 * 1024), details)
        .thumbnail(random_file("traits.jpg", "image/jpeg", 4 * 1024))
        .bookmarks(vec![BookmarkDraft::new(30.0, "dyn")]);

    let video = uploader.upload(request, progress).await.unwrap();
    assert_eq!(video.id, 42);

    let seen = seen.lock().unwrap();
    assert_monotonic_to_complete(&seen);
    for checkpoint in [5, 75, 90] {
        assert!(seen.contains(&checkpoint), "missing {checkpoint} in {seen:?}");
    }

    let stored = backend.state.stored.lock().unwrap();
    assert_eq!(
        *stored,
        vec![
            ("traits.mp4".to_string(), 200 * 1024),
            ("traits.jpg".to_string(), 4 * 1024)
        ]
    );

    let records = backend.state.records.lock().unwrap();
    let record = &records[0];
    assert_eq!(record["title"], "Traits");
    let video_url = record["videoUrl"].as_str().unwrap();
    assert!(video_url.ends_with("/storage/traits.mp4"));
    assert!(!video_url.contains('?'));
    assert_eq!(record["timestamps"][0]["titulo"], "dyn");
    assert!(backend.state.bookmarks.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_requires_session_and_never_completes() {
    let backend = MockBackend::spawn().await;
    let session = Session::in_memory();
    let mut uploader = uploader(&backend, &session, UploadStrategy::Multipart);
    let (progress, seen) = recorder();

    let request = UploadRequest::new(
        random_file("lesson.mp4", "video/mp4", 1024),
        VideoDetails::default(),
    );
    let err = uploader.upload(request, progress).await.unwrap_err();

    assert!(matches!(err, ApiError::NotAuthenticated));
    assert!(!seen.lock().unwrap().contains(&100));
    assert!(uploader.status().error_message().is_some());
    assert!(backend.state.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_bookmark_failure_does_not_fail_upload() {
    let backend = MockBackend::spawn().await;
    backend.state.fail_bookmarks.store(true, Ordering::SeqCst);
    let session = teacher_session();
    let mut uploader = uploader(&backend, &session, UploadStrategy::Multipart);
    let (progress, seen) = recorder();

    let request = UploadRequest::new(
        random_file("lesson.mp4", "video/mp4", 64 * 1024),
        VideoDetails::new("Closures"),
    )
    .bookmarks(vec![BookmarkDraft::new(12.0, "Fn traits")]);

    let video = uploader.upload(request, progress).await.unwrap();

    assert_eq!(video.id, 41);
    assert_monotonic_to_complete(&seen.lock().unwrap());
    assert_eq!(uploader.status().error_message(), None);
    assert_eq!(
        uploader.status().success_message().as_deref(),
        Some("Video uploaded")
    );
    assert_eq!(backend.state.uploads.lock().unwrap().len(), 1);
    assert!(backend.state.bookmarks.lock().unwrap().is_empty());
}
