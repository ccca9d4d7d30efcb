use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tempfile::TempDir;
use tokio::task::JoinHandle;

use coursewright::auth::TokenGenerator;
use coursewright::server::{AppState, create_router};
use coursewright::store::{SqliteStore, Store};

pub struct TestServer {
    pub temp_dir: TempDir,
    pub base_url: String,
    pub admin_token: String,
    pub client: reqwest::Client,
    handle: JoinHandle<()>,
}

/// A user created through the admin API, with a token of its own.
pub struct TestUser {
    pub id: String,
    pub token: String,
}

impl TestServer {
    pub async fn start() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let db_path: PathBuf = temp_dir.path().join("coursewright.db");

        let store = SqliteStore::new(&db_path).expect("open store");
        store.initialize().expect("initialize store");
        let admin = TokenGenerator::new()
            .issue(&store, true, None, None)
            .expect("issue admin token");

        let state = Arc::new(AppState::new(
            Arc::new(store),
            temp_dir.path().to_path_buf(),
        ));
        let app = create_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        let server = Self {
            temp_dir,
            base_url: format!("http://127.0.0.1:{port}"),
            admin_token: admin.raw,
            client: reqwest::Client::new(),
            handle,
        };
        server.wait_for_ready().await;
        server
    }

    async fn wait_for_ready(&self) {
        for _ in 0..50 {
            if self.client.get(self.url("/health")).send().await.is_ok() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        panic!("Server did not become ready");
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn api(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    #[allow(dead_code)]
    pub fn data_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub async fn create_user(&self, email: &str) -> TestUser {
        let resp: Value = self
            .client
            .post(self.api("/admin/users"))
            .bearer_auth(&self.admin_token)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await
            .expect("create user")
            .json()
            .await
            .expect("parse user response");
        let id = resp["data"]["id"].as_str().expect("user id").to_string();

        let resp: Value = self
            .client
            .post(self.api(&format!("/admin/users/{id}/tokens")))
            .bearer_auth(&self.admin_token)
            .json(&serde_json::json!({}))
            .send()
            .await
            .expect("create user token")
            .json()
            .await
            .expect("parse token response");
        let token = resp["data"]["token"]
            .as_str()
            .expect("user token")
            .to_string();

        TestUser { id, token }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
