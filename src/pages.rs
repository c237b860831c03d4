//! Read-only page handlers.

use std::sync::Arc;

use tracing::error;

use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::status::Status;
use crate::store::ReviewStore;
use crate::view;

pub async fn home(_req: Request) -> Response {
    Response::html(view::home())
}

pub async fn faq(_req: Request) -> Response {
    Response::html(view::faq())
}

pub async fn products(_req: Request) -> Response {
    Response::html(view::products())
}

/// The full review collection, newest first, as HTML or, when the client
/// asks for it, as the raw JSON array.
pub async fn reviews(store: Arc<ReviewStore>, req: Request) -> Response {
    let reviews = match store.load().await {
        Ok(reviews) => reviews,
        Err(e) => {
            error!("failed to load reviews: {e}");
            if req.prefers_json() {
                return Response::builder()
                    .status(Status::InternalServerError)
                    .json(br#"{"success":false,"error":"failed to load reviews"}"#.to_vec());
            }
            return Response::builder()
                .status(Status::InternalServerError)
                .html(view::unavailable());
        }
    };

    if req.prefers_json() {
        return Json(reviews).into_response();
    }
    Response::html(view::reviews(&reviews))
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::HeaderMap;
    use tempfile::TempDir;

    use super::*;
    use crate::method::Method;
    use crate::review::Review;

    fn get(path: &str, accept: Option<&str>) -> Request {
        let mut headers = HeaderMap::new();
        if let Some(accept) = accept {
            headers.insert("accept", accept.parse().unwrap());
        }
        Request::new(Method::Get, path.to_owned(), headers, Bytes::new())
    }

    fn sample() -> Review {
        Review {
            display_name: "Alice".into(),
            rating: 5,
            review_text: "Great!".into(),
            timestamp: "2026-10-16T09:12:44.120391Z".into(),
        }
    }

    #[tokio::test]
    async fn static_pages_are_html() {
        for res in [home(get("/", None)).await, faq(get("/faq", None)).await, products(get("/products", None)).await] {
            assert_eq!(res.code(), 200);
            assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
        }
    }

    #[tokio::test]
    async fn reviews_negotiates_json() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(ReviewStore::new(dir.path().join("reviews.json")));
        store.save(&[sample()]).await.unwrap();

        let res = reviews(Arc::clone(&store), get("/reviews", Some("application/json"))).await;
        assert_eq!(res.code(), 200);
        let listed: Vec<Review> = serde_json::from_str(res.body_str()).unwrap();
        assert_eq!(listed, [sample()]);

        let res = reviews(store, get("/reviews", Some("text/html"))).await;
        assert!(res.body_str().contains("<h3>Alice</h3>"));
    }

    #[tokio::test]
    async fn corrupt_document_is_a_server_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reviews.json");
        std::fs::write(&path, "nope").unwrap();
        let store = Arc::new(ReviewStore::new(path));

        let res = reviews(Arc::clone(&store), get("/reviews", None)).await;
        assert_eq!(res.code(), 500);
        assert!(res.body_str().contains("Reviews are unavailable"));

        let res = reviews(store, get("/reviews", Some("application/json"))).await;
        assert_eq!(res.code(), 500);
        assert_eq!(res.header("content-type"), Some("application/json"));
    }
}
