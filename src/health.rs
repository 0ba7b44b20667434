//! Health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? |
//! | **Readiness** | `/readyz` | Does the database answer? |

use std::sync::Arc;

use tracing::warn;

use crate::app::App;
use crate::{Request, Response, Status};

/// Always returns `200 OK` with body `"ok"`.
pub async fn liveness(_app: Arc<App>, _req: Request) -> Response {
    Response::text("ok")
}

/// `200 OK` with body `"ready"` when the entry store answers a trivial
/// query, `503` otherwise.
pub async fn readiness(app: Arc<App>, _req: Request) -> Response {
    match app.store.ping().await {
        Ok(()) => Response::text("ready"),
        Err(e) => {
            warn!("readiness check failed: {e}");
            Response::builder()
                .status(Status::ServiceUnavailable)
                .text("database unavailable")
        }
    }
}
