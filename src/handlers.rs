//! Route handlers.
//!
//! Handlers never return errors: storage failures become a `500` page (or a
//! `status: 0` body for delete) and are logged here.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::app::App;
use crate::auth::{self, LoginOutcome};
use crate::entry::NewEntry;
use crate::response::{IntoResponse, Json};
use crate::view::{self, Chrome};
use crate::{Request, Response, Status};

/// Body of `GET /delete/{id}`.
#[derive(Debug, Serialize)]
pub struct DeleteStatus {
    pub status: u8,
    pub message: String,
}

impl DeleteStatus {
    fn ok() -> Self {
        Self { status: 1, message: "Post Deleted".to_string() }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self { status: 0, message: message.into() }
    }
}

/// `GET /`
pub async fn index(app: Arc<App>, req: Request) -> Response {
    let entries = match app.store.all().await {
        Ok(entries) => entries,
        Err(e) => return storage_failure("list entries", e),
    };
    let flashes = req.session().take_flashes().await;
    let chrome = Chrome { logged_in: req.session().is_authenticated().await, flashes: &flashes };
    Response::html(view::index(&chrome, &entries))
}

/// `GET /login`
pub async fn login_form(_app: Arc<App>, req: Request) -> Response {
    let flashes = req.session().take_flashes().await;
    let chrome = Chrome { logged_in: req.session().is_authenticated().await, flashes: &flashes };
    Response::html(view::login(&chrome, None))
}

/// `POST /login`
///
/// Success flashes and redirects home; a bad pair re-renders the form with
/// the reason.
pub async fn login(app: Arc<App>, req: Request) -> Response {
    let form = req.form();
    let session = req.session();
    match auth::login(&app.credentials, session, form.field("username"), form.field("password")).await {
        LoginOutcome::LoggedIn => {
            session.flash(LoginOutcome::LoggedIn.message()).await;
            Response::redirect("/")
        }
        failed => {
            let flashes = session.take_flashes().await;
            let chrome = Chrome { logged_in: session.is_authenticated().await, flashes: &flashes };
            Response::html(view::login(&chrome, Some(failed.message())))
        }
    }
}

/// `GET /logout`
///
/// A visitor without a session is just sent home; nothing is stored for them.
pub async fn logout(_app: Arc<App>, req: Request) -> Response {
    if auth::logout(req.session()).await {
        req.session().flash("You were logged out").await;
    }
    Response::redirect("/")
}

/// `POST /add`
///
/// Anonymous posts are dropped without a trace except the log line; the
/// client is redirected home either way.
pub async fn add(app: Arc<App>, req: Request) -> Response {
    if !req.session().is_authenticated().await {
        warn!("anonymous add ignored");
        return Response::redirect("/");
    }

    let form = req.form();
    let entry = NewEntry {
        title: form.field("title").to_owned(),
        text: form.field("text").to_owned(),
    };
    match app.store.insert(entry).await {
        Ok(id) => {
            info!(id, "entry added");
            req.session().flash("New entry was successfully posted").await;
            Response::redirect("/")
        }
        Err(e) => storage_failure("add entry", e),
    }
}

/// `GET /delete/{id}`
///
/// Reports success once authenticated, whether or not the id existed.
pub async fn delete(app: Arc<App>, req: Request) -> Response {
    let Some(id) = req.param("id").and_then(|raw| raw.parse::<i64>().ok()) else {
        return Response::status(Status::NotFound);
    };

    if !req.session().is_authenticated().await {
        warn!(id, "anonymous delete refused");
        return Json(DeleteStatus::failed("Please log in.")).into_response();
    }

    let status = match app.store.delete(id).await {
        Ok(removed) => {
            info!(id, removed, "entry deleted");
            DeleteStatus::ok()
        }
        Err(e) => {
            error!(id, "delete entry failed: {e}");
            DeleteStatus::failed(e.to_string())
        }
    };
    Json(status).into_response()
}

/// `GET /search/?query=…`
pub async fn search(app: Arc<App>, req: Request) -> Response {
    let query = req.query("query").unwrap_or("");
    let result = if query.is_empty() {
        app.store.all().await
    } else {
        app.store.search(query).await
    };
    let entries = match result {
        Ok(entries) => entries,
        Err(e) => return storage_failure("search entries", e),
    };

    let flashes = req.session().take_flashes().await;
    let chrome = Chrome { logged_in: req.session().is_authenticated().await, flashes: &flashes };
    Response::html(view::search(&chrome, query, &entries))
}

fn storage_failure(action: &str, e: crate::Error) -> Response {
    error!("{action} failed: {e}");
    Response::builder()
        .status(Status::InternalServerError)
        .text("internal server error")
}
