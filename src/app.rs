//! The site's routing table.

use std::sync::Arc;

use crate::store::ReviewStore;
use crate::{Method, Router, health, pages, submit};

/// Every route the site serves, wired to `store`.
pub fn routes(store: Arc<ReviewStore>) -> Router {
    let listing = Arc::clone(&store);
    let readiness = Arc::clone(&store);

    Router::new()
        .on(Method::Get,  "/",              pages::home)
        .on(Method::Get,  "/faq",           pages::faq)
        .on(Method::Get,  "/products",      pages::products)
        .on(Method::Get,  "/reviews",       move |req| pages::reviews(Arc::clone(&listing), req))
        .on(Method::Post, "/submit_review", move |req| submit::submit_review(Arc::clone(&store), req))
        .on(Method::Get,  "/healthz",       health::liveness)
        .on(Method::Get,  "/readyz",        move |req| health::readiness(Arc::clone(&readiness), req))
}
