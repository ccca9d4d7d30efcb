//! CLI integration tests for coursewright admin commands.
//!
//! Each test uses an isolated temp directory for the database, ensuring tests
//! can run in parallel safely.

#![allow(deprecated)] // Command::cargo_bin deprecation only affects custom build dirs

use std::path::Path;

use assert_cmd::Command;
use assert_fs::TempDir;
use coursewright::authoring::courses::{NewCourse, create_course};
use coursewright::store::{SqliteStore, Store};
use predicates::prelude::*;
use serde_json::Value;

struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn data_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    fn data_dir_str(&self) -> String {
        self.data_dir().to_string_lossy().to_string()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("coursewright").expect("failed to find binary");
        cmd.env("NO_COLOR", "1");
        cmd.env("COURSEWRIGHT_CONFIG_DIR", self.data_dir().join("config"));
        cmd
    }

    fn init(&self) -> assert_cmd::assert::Assert {
        self.cmd()
            .args([
                "admin",
                "init",
                "--data-dir",
                &self.data_dir_str(),
                "--non-interactive",
            ])
            .assert()
    }

    fn info_json(&self) -> Value {
        let output = self
            .cmd()
            .args([
                "admin",
                "info",
                "--data-dir",
                &self.data_dir_str(),
                "--json",
            ])
            .output()
            .expect("failed to run command");

        serde_json::from_slice(&output.stdout).expect("failed to parse JSON")
    }

    fn add_user(&self, email: &str) -> String {
        self.cmd()
            .args([
                "admin",
                "user",
                "add",
                "--data-dir",
                &self.data_dir_str(),
                "--email",
                email,
                "--non-interactive",
            ])
            .assert()
            .success();

        let info = self.info_json();
        info["users"]
            .as_array()
            .expect("users not an array")
            .iter()
            .find(|u| u["email"] == email)
            .expect("user not found")["id"]
            .as_str()
            .expect("id not a string")
            .to_string()
    }

    fn store(&self) -> SqliteStore {
        SqliteStore::new(self.data_dir().join("coursewright.db")).expect("open store")
    }
}

#[test]
fn init_creates_database_and_admin_token() {
    let ctx = TestContext::new();

    ctx.init()
        .success()
        .stdout(predicate::str::contains("coursewright_"));

    assert!(ctx.data_dir().join("coursewright.db").exists());
    let token = std::fs::read_to_string(ctx.data_dir().join(".admin_token")).unwrap();
    assert!(token.starts_with("coursewright_"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(ctx.data_dir().join(".admin_token"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    let info = ctx.info_json();
    assert_eq!(info["counts"]["tokens"], 1);
    assert_eq!(info["counts"]["users"], 0);
}

#[test]
fn init_twice_fails() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.init()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn commands_require_init() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["admin", "info", "--data-dir", &ctx.data_dir_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("admin init"));
}

#[test]
fn user_add_validates_email() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.cmd()
        .args([
            "admin",
            "user",
            "add",
            "--data-dir",
            &ctx.data_dir_str(),
            "--email",
            "not-an-email",
            "--non-interactive",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid email address"));

    ctx.add_user("ada@example.com");

    ctx.cmd()
        .args([
            "admin",
            "user",
            "add",
            "--data-dir",
            &ctx.data_dir_str(),
            "--email",
            "ADA@example.com",
            "--non-interactive",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn token_create_and_revoke() {
    let ctx = TestContext::new();
    ctx.init().success();
    let user_id = ctx.add_user("ada@example.com");

    ctx.cmd()
        .args([
            "admin",
            "token",
            "create",
            "--data-dir",
            &ctx.data_dir_str(),
            "--user-id",
            &user_id,
            "--expires-days",
            "30",
            "--non-interactive",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Token created for 'ada@example.com'"));

    let info = ctx.info_json();
    let tokens = info["tokens"].as_array().unwrap();
    let user_token = tokens
        .iter()
        .find(|t| t["user_id"] == user_id.as_str())
        .expect("user token");
    assert_eq!(user_token["email"], "ada@example.com");
    assert!(user_token["expires_at"].is_string());
    let token_id = user_token["id"].as_str().unwrap().to_string();

    ctx.cmd()
        .args([
            "admin",
            "token",
            "revoke",
            "--data-dir",
            &ctx.data_dir_str(),
            "--token-id",
            &token_id,
            "--non-interactive",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes is required"));

    ctx.cmd()
        .args([
            "admin",
            "token",
            "revoke",
            "--data-dir",
            &ctx.data_dir_str(),
            "--token-id",
            &token_id,
            "--non-interactive",
            "--yes",
        ])
        .assert()
        .success();

    assert_eq!(ctx.info_json()["counts"]["tokens"], 1);
}

#[test]
fn user_remove_deletes_courses() {
    let ctx = TestContext::new();
    ctx.init().success();
    let user_id = ctx.add_user("ada@example.com");

    {
        let store = ctx.store();
        create_course(
            &store,
            &user_id,
            NewCourse {
                title: "Soon Gone".to_string(),
                description: "Temporary".to_string(),
                course_image: None,
                access_type: None,
            },
        )
        .unwrap();
        store.close().unwrap();
    }
    assert_eq!(ctx.info_json()["counts"]["courses"], 1);

    ctx.cmd()
        .args([
            "admin",
            "user",
            "remove",
            "--data-dir",
            &ctx.data_dir_str(),
            "--user-id",
            &user_id,
            "--non-interactive",
            "--yes",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted user 'ada@example.com'"));

    let info = ctx.info_json();
    assert_eq!(info["counts"]["users"], 0);
    assert_eq!(info["counts"]["courses"], 0);
}

#[test]
fn info_text_output() {
    let ctx = TestContext::new();
    ctx.init().success();
    ctx.add_user("ada@example.com");

    ctx.cmd()
        .args(["admin", "info", "--data-dir", &ctx.data_dir_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Coursewright Server Status"))
        .stdout(predicate::str::contains("Users:       1"));
}

#[test]
fn client_commands_require_login() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["course", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));

    ctx.cmd()
        .args([
            "auth",
            "login",
            "--server",
            "localhost:1",
            "--token",
            "wrong_token",
            "--non-interactive",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid token format"));

    ctx.cmd()
        .args(["auth", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No credentials found."));
}
