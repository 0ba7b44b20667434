//! End-to-end tests: a real server on an ephemeral port, driven by a
//! cookie-keeping client that follows redirects like a browser.

use microblog::{App, Config, Server};
use serde_json::Value;
use tempfile::TempDir;
use tokio::net::TcpListener;

struct TestApp {
    base: String,
    client: reqwest::Client,
    dir: TempDir,
}

impl TestApp {
    async fn spawn() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database: dir.path().join("microblog.db"),
            testing: true,
            ..Config::default()
        };
        let app = App::new(config).await.unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(
            Server::from_listener(listener)
                .serve_with_shutdown(microblog::router(app), std::future::pending()),
        );

        let client = reqwest::Client::builder().cookie_store(true).build().unwrap();
        Self { base: format!("http://{addr}"), client, dir }
    }

    /// A client that keeps no cookies and does not follow redirects, for
    /// inspecting `Set-Cookie` directly.
    fn raw_client() -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap()
    }

    async fn get(&self, path: &str) -> (u16, String) {
        let res = self.client.get(format!("{}{path}", self.base)).send().await.unwrap();
        let status = res.status().as_u16();
        (status, res.text().await.unwrap())
    }

    async fn post(&self, path: &str, form: &[(&str, &str)]) -> String {
        self.client
            .post(format!("{}{path}", self.base))
            .form(form)
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap()
    }

    async fn login(&self, username: &str, password: &str) -> String {
        self.post("/login", &[("username", username), ("password", password)]).await
    }

    async fn logout(&self) -> String {
        self.get("/logout").await.1
    }

    async fn add(&self, title: &str, text: &str) -> String {
        self.post("/add", &[("title", title), ("text", text)]).await
    }

    async fn delete_status(&self, id: i64) -> i64 {
        let (status, body) = self.get(&format!("/delete/{id}")).await;
        assert_eq!(status, 200);
        let json: Value = serde_json::from_str(&body).unwrap();
        json["status"].as_i64().unwrap()
    }

    async fn search(&self, query: &str) -> String {
        let url = format!("{}/search/", self.base);
        self.client
            .get(url)
            .query(&[("query", query)])
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap()
    }
}

const USERNAME: &str = "admin";
const PASSWORD: &str = "admin";

#[tokio::test]
async fn index_responds() {
    let app = TestApp::spawn().await;
    let (status, _) = app.get("/").await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn testing_flag_uses_isolated_database_file() {
    let app = TestApp::spawn().await;
    assert!(app.dir.path().join("test.db").is_file());
    assert!(!app.dir.path().join("microblog.db").exists());
}

#[tokio::test]
async fn empty_database_invites_posting() {
    let app = TestApp::spawn().await;
    let (_, body) = app.get("/").await;
    assert!(body.contains("No entries yet. Add some!"));
}

#[tokio::test]
async fn login_and_logout_messages() {
    let app = TestApp::spawn().await;

    assert!(app.login(USERNAME, PASSWORD).await.contains("You were logged in"));
    assert!(app.logout().await.contains("You were logged out"));
    assert!(app.login(&format!("{USERNAME}x"), PASSWORD).await.contains("Invalid username"));
    assert!(app.login(USERNAME, &format!("{PASSWORD}x")).await.contains("Invalid password"));
}

#[tokio::test]
async fn owner_can_post_messages() {
    let app = TestApp::spawn().await;
    app.login(USERNAME, PASSWORD).await;

    let body = app.add("<Hello>", "<strong>HTML</strong> allowed here").await;
    assert!(!body.contains("No entries yet. Add some!"));
    assert!(body.contains("&lt;Hello&gt;"));
    assert!(body.contains("<strong>HTML</strong> allowed here"));
}

#[tokio::test]
async fn anonymous_post_is_ignored() {
    let app = TestApp::spawn().await;
    let body = app.add("<Sneaky>", "text").await;
    assert!(!body.contains("&lt;Sneaky&gt;"));
    assert!(body.contains("No entries yet. Add some!"));
}

#[tokio::test]
async fn delete_requires_login() {
    let app = TestApp::spawn().await;
    assert_eq!(app.delete_status(1).await, 0);

    app.login(USERNAME, PASSWORD).await;
    assert_eq!(app.delete_status(1).await, 1);
}

#[tokio::test]
async fn only_logged_in_owner_deletes_posts() {
    let app = TestApp::spawn().await;
    app.login(USERNAME, PASSWORD).await;

    app.add("<Hello>", "Hello World").await;
    assert_eq!(app.delete_status(1).await, 1);
    let (_, body) = app.get("/").await;
    assert!(!body.contains("&lt;Hello&gt;"));

    app.add("<Hello>", "Hello World").await;
    app.logout().await;
    assert_eq!(app.delete_status(2).await, 0);
    let (_, body) = app.get("/").await;
    assert!(body.contains("&lt;Hello&gt;"));
}

#[tokio::test]
async fn non_integer_id_is_not_found() {
    let app = TestApp::spawn().await;
    let (status, _) = app.get("/delete/first").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn search_returns_matching_posts() {
    let app = TestApp::spawn().await;

    let (status, _) = app.get("/search/").await;
    assert_eq!(status, 200);

    app.login(USERNAME, PASSWORD).await;
    app.add("<Hello>", "Hello World").await;

    assert!(app.search("Hello").await.contains("&lt;Hello&gt;"));
    assert!(app.search("World").await.contains("&lt;Hello&gt;"));
    assert!(!app.search("Random").await.contains("&lt;Hello&gt;"));

    app.add("<John>", "John says hello").await;
    let body = app.search("Hello").await;
    assert!(body.contains("&lt;Hello&gt;") && body.contains("&lt;John&gt;"));

    app.add("<Mike>", "Mike says hi to John").await;

    let body = app.search("Hello").await;
    assert!(body.contains("&lt;Hello&gt;"));
    assert!(body.contains("&lt;John&gt;"));
    assert!(!body.contains("&lt;Mike&gt;"));

    let body = app.search("John").await;
    assert!(!body.contains("&lt;Hello&gt;"));
    assert!(body.contains("&lt;John&gt;"));
    assert!(body.contains("&lt;Mike&gt;"));

    let body = app.search("hi").await;
    assert!(!body.contains("&lt;Hello&gt;"));
    assert!(!body.contains("&lt;John&gt;"));
    assert!(body.contains("&lt;Mike&gt;"));
}

#[tokio::test]
async fn search_is_open_to_visitors() {
    let app = TestApp::spawn().await;
    app.login(USERNAME, PASSWORD).await;
    app.add("<Hello>", "Hello World").await;
    app.logout().await;

    let body = app.search("world").await;
    assert!(body.contains("&lt;Hello&gt;"));
    assert!(app.search("nothing").await.contains("No entries match your search."));
}

#[tokio::test]
async fn probes_report_healthy() {
    let app = TestApp::spawn().await;
    assert_eq!(app.get("/healthz").await, (200, "ok".to_string()));
    assert_eq!(app.get("/readyz").await, (200, "ready".to_string()));
}

fn session_cookie(res: &reqwest::Response) -> Option<String> {
    res.headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session="))
        .map(|v| v.split(';').next().unwrap_or_default().to_owned())
}

#[tokio::test]
async fn anonymous_logout_sets_no_cookie() {
    let app = TestApp::spawn().await;
    let client = TestApp::raw_client();

    for _ in 0..3 {
        let res = client.get(format!("{}/logout", app.base)).send().await.unwrap();
        assert_eq!(res.status().as_u16(), 303);
        assert_eq!(session_cookie(&res), None);
    }
}

#[tokio::test]
async fn login_replaces_the_session_cookie() {
    let app = TestApp::spawn().await;
    let client = TestApp::raw_client();
    let login = [("username", USERNAME), ("password", PASSWORD)];

    let res = client.post(format!("{}/login", app.base)).form(&login).send().await.unwrap();
    let first = session_cookie(&res).unwrap();

    // Logging out keeps the session alive for its flash.
    let res = client
        .get(format!("{}/logout", app.base))
        .header("cookie", &first)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 303);

    let res = client
        .post(format!("{}/login", app.base))
        .header("cookie", &first)
        .form(&login)
        .send()
        .await
        .unwrap();
    let second = session_cookie(&res).unwrap();
    assert_ne!(first, second);

    // The pre-login id no longer authenticates anything.
    let res = client
        .get(format!("{}/delete/1", app.base))
        .header("cookie", &first)
        .send()
        .await
        .unwrap();
    let json: Value = serde_json::from_str(&res.text().await.unwrap()).unwrap();
    assert_eq!(json["status"], 0);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let app = TestApp::spawn().await;
    let title = "a".repeat(2 * 1024 * 1024);
    let res = TestApp::raw_client()
        .post(format!("{}/login", app.base))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(format!("username=admin&title={title}"))
        .send()
        .await;
    // The server may close the connection before the upload finishes.
    if let Ok(res) = res {
        assert_eq!(res.status().as_u16(), 413);
    }
}
