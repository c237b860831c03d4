//! `POST /submit_review`.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{error, warn};

use crate::request::Request;
use crate::response::Response;
use crate::review::{Review, Submission};
use crate::status::Status;
use crate::store::ReviewStore;

/// Body of every `/submit_review` response.
#[derive(Serialize)]
struct Outcome<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// Validates the payload, stamps it, and puts it at the front of the
/// collection. Answers `{"success": true}` and nothing else on success.
pub async fn submit_review(store: Arc<ReviewStore>, req: Request) -> Response {
    let submission = match Submission::from_slice(req.body()) {
        Ok(s) => s,
        Err(e) => {
            warn!("rejected review submission: {e}");
            let status = if e.is_unprocessable() {
                Status::UnprocessableContent
            } else {
                Status::BadRequest
            };
            return outcome(status, Some(&e.to_string()));
        }
    };

    let review = Review::new(submission, Utc::now());
    match store.prepend(review).await {
        Ok(_) => outcome(Status::Ok, None),
        Err(e) => {
            error!("failed to save review: {e}");
            outcome(Status::InternalServerError, Some("failed to save review"))
        }
    }
}

fn outcome(status: Status, error: Option<&str>) -> Response {
    let body = Outcome { success: error.is_none(), error };
    // Two plain fields; encoding cannot fail.
    let bytes = serde_json::to_vec(&body).unwrap_or_default();
    Response::builder().status(status).json(bytes)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::HeaderMap;
    use tempfile::TempDir;

    use super::*;
    use crate::method::Method;

    fn post(body: &str) -> Request {
        Request::new(
            Method::Post,
            "/submit_review".to_owned(),
            HeaderMap::new(),
            Bytes::copy_from_slice(body.as_bytes()),
        )
    }

    fn store(dir: &TempDir) -> Arc<ReviewStore> {
        Arc::new(ReviewStore::new(dir.path().join("reviews.json")))
    }

    #[tokio::test]
    async fn accepted_review_is_stored_first() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let started = Utc::now();

        let res = submit_review(
            Arc::clone(&store),
            post(r#"{"displayName":"Alice","rating":5,"reviewText":"Great!"}"#),
        )
        .await;

        assert_eq!(res.code(), 200);
        assert_eq!(res.body_str(), r#"{"success":true}"#);

        let reviews = store.load().await.unwrap();
        assert_eq!(reviews[0].display_name, "Alice");
        assert_eq!(reviews[0].rating, 5);
        assert_eq!(reviews[0].review_text, "Great!");
        assert!(reviews[0].created_at().unwrap().timestamp_micros() >= started.timestamp_micros());
    }

    #[tokio::test]
    async fn invalid_rating_is_a_client_error() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let res = submit_review(
            Arc::clone(&store),
            post(r#"{"displayName":"Alice","rating":"abc","reviewText":"Great!"}"#),
        )
        .await;

        assert_eq!(res.code(), 400);
        assert_eq!(res.body_str(), r#"{"success":false,"error":"rating must be an integer"}"#);
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn out_of_range_rating_is_unprocessable() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        for rating in ["11", "18446744073709551615"] {
            let body = format!(r#"{{"displayName":"Alice","rating":{rating},"reviewText":"Great!"}}"#);
            let res = submit_review(Arc::clone(&store), post(&body)).await;
            assert_eq!(res.code(), 422, "rating {rating}");
        }
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_field_is_named() {
        let dir = TempDir::new().unwrap();
        let res = submit_review(store(&dir), post(r#"{"displayName":"Alice","rating":3}"#)).await;
        assert_eq!(res.code(), 400);
        assert!(res.body_str().contains("missing field `reviewText`"));
    }

    #[tokio::test]
    async fn unreadable_document_is_a_server_error() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        std::fs::write(store.path(), "]").unwrap();

        let res = submit_review(
            store,
            post(r#"{"displayName":"Alice","rating":5,"reviewText":"Great!"}"#),
        )
        .await;

        assert_eq!(res.code(), 500);
        assert_eq!(res.body_str(), r#"{"success":false,"error":"failed to save review"}"#);
    }
}
