//! Health-check handlers.
//!
//! | Check | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? |
//! | **Readiness** | `/readyz` | Would reading the review document succeed? |

use std::sync::Arc;

use tracing::warn;

use crate::store::ReviewStore;
use crate::{Request, Response, Status};

/// Always `200 OK` with body `"ok"`. If the process can answer HTTP at all,
/// it is alive.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// `200 "ready"` while the review document is absent or decodes, `503`
/// otherwise (corrupt JSON, a directory in its place, permissions changed).
pub async fn readiness(store: Arc<ReviewStore>, _req: Request) -> Response {
    match store.check_readable().await {
        Ok(()) => Response::text("ready"),
        Err(e) => {
            warn!("readiness check failed: {e}");
            Response::status(Status::ServiceUnavailable)
        }
    }
}
