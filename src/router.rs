//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. A path that exists under
//! another method answers `405` with an `allow` header; anything else is `404`.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Each [`Router::on`] call returns `self` so registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// ```rust,no_run
    /// # use kudos::{Method, Request, Response, Router};
    /// # async fn home(_: Request) -> Response { Response::html("") }
    /// # async fn submit(_: Request) -> Response { Response::json(vec![]) }
    /// Router::new()
    ///     .on(Method::Get,  "/",              home)
    ///     .on(Method::Post, "/submit_review", submit);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with an existing one.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Routes `req` to its handler and awaits the response.
    pub(crate) async fn respond(&self, req: Request) -> Response {
        match self.lookup(req.method, &req.path) {
            Some(handler) => handler.call(req).await,
            None => self.unmatched(&req.path),
        }
    }

    /// Response for a method the server does not recognise at all.
    pub(crate) fn unknown_method(&self, path: &str) -> Response {
        self.unmatched(path)
    }

    fn lookup(&self, method: Method, path: &str) -> Option<BoxedHandler> {
        let tree = self.routes.get(&method)?;
        tree.at(path).ok().map(|matched| Arc::clone(matched.value))
    }

    /// Methods registered for `path`, in wire-name order.
    fn allowed(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(method, _)| *method)
            .collect();
        methods.sort_by_key(|m| m.as_str());
        methods
    }

    fn unmatched(&self, path: &str) -> Response {
        let allowed = self.allowed(path);
        if allowed.is_empty() {
            return Response::status(Status::NotFound);
        }
        let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
        Response::builder()
            .status(Status::MethodNotAllowed)
            .header("allow", &allow)
            .text("method not allowed")
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::HeaderMap;

    use super::*;

    fn request(method: Method, path: &str) -> Request {
        Request::new(method, path.to_owned(), HeaderMap::new(), Bytes::new())
    }

    async fn page(req: Request) -> Response {
        Response::text(format!("page at {}", req.path()))
    }

    async fn ok(_req: Request) -> &'static str {
        "ok"
    }

    fn router() -> Router {
        Router::new()
            .on(Method::Get, "/pages/{slug}", page)
            .on(Method::Get, "/form", ok)
            .on(Method::Post, "/form", ok)
    }

    #[tokio::test]
    async fn wildcard_segment_matches() {
        let res = router().respond(request(Method::Get, "/pages/faq")).await;
        assert_eq!(res.code(), 200);
        assert_eq!(res.body_str(), "page at /pages/faq");

        let res = router().respond(request(Method::Get, "/pages/faq/extra")).await;
        assert_eq!(res.code(), 404);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let res = router().respond(request(Method::Get, "/missing")).await;
        assert_eq!(res.code(), 404);
    }

    #[tokio::test]
    async fn wrong_method_lists_allowed_ones() {
        let res = router().respond(request(Method::Delete, "/form")).await;
        assert_eq!(res.code(), 405);
        assert_eq!(res.header("allow"), Some("GET, POST"));

        let res = router().unknown_method("/pages/bob");
        assert_eq!(res.header("allow"), Some("GET"));
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_route_panics() {
        let _ = Router::new()
            .on(Method::Get, "/a", ok)
            .on(Method::Get, "/a", ok);
    }
}
