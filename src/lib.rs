//! # kudos
//!
//! A small review site: a landing page, an FAQ, a product list, and a
//! reviews page where visitors leave a star rating and a few words.
//!
//! Reviews live in one JSON file, newest first. Each request reads the file
//! afresh; each submission rewrites it whole.
//!
//! ## Layout
//!
//! - [`store`]: the review document: load, save, locked prepend
//! - [`review`]: the record and submission validation
//! - [`pages`], [`submit`], [`health`]: request handlers
//! - [`app::routes`]: the routing table
//! - [`Router`], [`Server`], [`Request`], [`Response`]: HTTP plumbing on
//!   top of hyper, with radix-tree routing via [`matchit`] and graceful
//!   shutdown on SIGTERM / Ctrl-C
//!
//! ## Running
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kudos::{Server, app, store::ReviewStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), kudos::Error> {
//!     let store = Arc::new(ReviewStore::new("reviews.json"));
//!     Server::bind(([0, 0, 0, 0], 5000).into())
//!         .await?
//!         .serve(app::routes(store))
//!         .await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod app;
pub mod config;
pub mod health;
pub mod pages;
pub mod review;
pub mod store;
pub mod submit;
pub mod view;

pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Json, Response};
pub use router::Router;
pub use server::{DEFAULT_MAX_BODY_BYTES, Server};
pub use status::Status;
