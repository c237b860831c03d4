//! Review site server.
//!
//! Run with:
//!   RUST_LOG=info PORT=5000 REVIEWS_PATH=reviews.json cargo run
//!
//! Try:
//!   curl http://localhost:5000/reviews -H 'accept: application/json'
//!   curl -X POST http://localhost:5000/submit_review \
//!        -H 'content-type: application/json' \
//!        -d '{"displayName":"Alice","rating":5,"reviewText":"Great!"}'

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use kudos::config::Config;
use kudos::store::ReviewStore;
use kudos::{Server, app};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    info!(reviews = %config.reviews_path.display(), "using review document");

    let store = Arc::new(ReviewStore::new(config.reviews_path.clone()));

    Server::bind(config.bind_addr())
        .await?
        .serve(app::routes(store))
        .await
        .context("server error")
}
