//! Liking and unliking photos in the feed.

mod common;

use common::mock_backend::{MockBackend, MockResponse};
use common::{page_json, photo_json, session_with, TEST_TOKEN};
use photofeed::ServiceError;

async fn loaded_session(mock: &MockBackend, page: &str) -> photofeed::Session {
    mock.enqueue_response(MockResponse::json(page)).await;
    let (session, _store) = session_with(&mock.base_url(), Some(TEST_TOKEN));
    session.feed().fetch_next_page().await.unwrap();
    session
}

#[tokio::test]
async fn test_like_posts_and_updates_only_target() {
    let mock = MockBackend::start().await;
    let session = loaded_session(&mock, &page_json(&["a", "b", "c"])).await;
    let before = session.feed().photos();
    let mut events = session.feed().subscribe();

    mock.enqueue_response(MockResponse::json(
        r#"{"photo": {"id": "b", "liked_by_user": true}, "user": {"username": "me"}}"#,
    ))
    .await;
    let liked = session.feed().change_like("b", true).await.unwrap();
    assert!(liked);

    let after = session.feed().photos();
    assert_eq!(after.len(), 3);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
    assert!(after[1].liked);
    assert_eq!(after[1].likes, before[1].likes + 1);
    assert_eq!(events.drain(), 1);

    let requests = mock.captured_requests().await;
    let like = requests.last().unwrap();
    assert_eq!(like.method, "POST");
    assert_eq!(like.path, "/photos/b/like");
}

#[tokio::test]
async fn test_unlike_sends_delete() {
    let mock = MockBackend::start().await;
    let page = format!("[{}]", photo_json("a", true, 7));
    let session = loaded_session(&mock, &page).await;

    mock.enqueue_response(MockResponse::json(
        r#"{"photo": {"id": "a", "liked_by_user": false}}"#,
    ))
    .await;
    let liked = session.feed().change_like("a", false).await.unwrap();
    assert!(!liked);

    let photo = session.feed().photo("a").unwrap();
    assert!(!photo.liked);
    assert_eq!(photo.likes, 6);

    let requests = mock.captured_requests().await;
    assert_eq!(requests.last().unwrap().method, "DELETE");
}

#[tokio::test]
async fn test_empty_body_falls_back_to_requested_state() {
    let mock = MockBackend::start().await;
    let session = loaded_session(&mock, &page_json(&["a"])).await;

    mock.enqueue_response(MockResponse::empty(201)).await;
    let liked = session.feed().change_like("a", true).await.unwrap();
    assert!(liked);
    assert!(session.feed().photo("a").unwrap().liked);
}

#[tokio::test]
async fn test_server_state_wins_over_requested() {
    let mock = MockBackend::start().await;
    let session = loaded_session(&mock, &page_json(&["a"])).await;

    mock.enqueue_response(MockResponse::json(
        r#"{"photo": {"id": "a", "liked_by_user": false}}"#,
    ))
    .await;
    let liked = session.feed().change_like("a", true).await.unwrap();
    assert!(!liked);
    assert!(!session.feed().photo("a").unwrap().liked);
}

#[tokio::test]
async fn test_failed_like_leaves_feed_unchanged() {
    let mock = MockBackend::start().await;
    let session = loaded_session(&mock, &page_json(&["a", "b"])).await;
    let before = session.feed().photos();
    let mut events = session.feed().subscribe();

    mock.enqueue_response(MockResponse::error(404, "Couldn't find Photo"))
        .await;
    let err = session.feed().change_like("a", true).await.unwrap_err();
    assert!(matches!(err, ServiceError::HttpStatus { status: 404, .. }));

    assert_eq!(session.feed().photos(), before);
    assert!(events.try_recv().is_none());
}

#[tokio::test]
async fn test_like_of_photo_not_in_feed_succeeds_without_event() {
    let mock = MockBackend::start().await;
    let session = loaded_session(&mock, &page_json(&["a"])).await;
    let before = session.feed().photos();
    let mut events = session.feed().subscribe();

    mock.enqueue_response(MockResponse::json(
        r#"{"photo": {"id": "zzz", "liked_by_user": true}}"#,
    ))
    .await;
    assert!(session.feed().change_like("zzz", true).await.unwrap());
    assert_eq!(session.feed().photos(), before);
    assert!(events.try_recv().is_none());
}

#[tokio::test]
async fn test_like_with_empty_id_rejected_locally() {
    let mock = MockBackend::start().await;
    let (session, _store) = session_with(&mock.base_url(), Some(TEST_TOKEN));

    let err = session.feed().change_like("", true).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidRequest(_)));
    assert!(mock.captured_requests().await.is_empty());
}

#[tokio::test]
async fn test_like_without_token_is_unauthorized() {
    let mock = MockBackend::start().await;
    let (session, _store) = session_with(&mock.base_url(), None);

    let err = session.feed().change_like("a", true).await.unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized));
    assert!(mock.captured_requests().await.is_empty());
}
