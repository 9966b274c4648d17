//! Common test utilities for Quire integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::Command;
use chrono::NaiveDate;
use tempfile::TempDir;

use quire::auth::{Authorized, Gate, Permission, Session, TokenStore};
use quire::publish::PostForm;
use quire::remote::memory::MemoryIdentity;

pub const WRITER_TOKEN: &str = "ghp_writer";
pub const READER_TOKEN: &str = "ghp_reader";

/// Nothing listens here; any accidental network call fails fast
const UNREACHABLE_API: &str = "http://127.0.0.1:9";

/// Isolated working and state directories for one test
pub struct TestEnv {
    pub temp: TempDir,
    pub work: PathBuf,
    pub state: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let work = temp.path().join("work");
        let state = temp.path().join("state");
        std::fs::create_dir_all(&work).expect("Failed to create work directory");
        Self { temp, work, state }
    }

    /// Write a file relative to the working directory
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.work.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.work.join(path)).expect("Failed to read file")
    }

    pub fn tokens(&self) -> TokenStore {
        TokenStore::new(&self.state)
    }

    /// The quire binary, pointed at this environment
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("quire").expect("quire binary");
        cmd.current_dir(&self.work)
            .env("QUIRE_STATE_DIR", &self.state)
            .env("QUIRE_API_URL", UNREACHABLE_API)
            .env_remove("GITHUB_TOKEN")
            .env_remove("QUIRE_CONFIG")
            .env_remove("QUIRE_LOG")
            .env_remove("QUIRE_OWNER")
            .env_remove("QUIRE_REPO")
            .env_remove("QUIRE_BRANCH");
        cmd
    }
}

/// Identity provider knowing one writer and one read-only user
pub fn identities() -> MemoryIdentity {
    MemoryIdentity::new()
        .with_user(WRITER_TOKEN, "ada", Permission::Write)
        .with_user(READER_TOKEN, "bob", Permission::Read)
}

/// Log the writer in and return the write proof
pub async fn authorized(tokens: &TokenStore) -> Authorized {
    let identity = identities();
    match Gate::new(&identity)
        .login(WRITER_TOKEN, tokens)
        .await
        .expect("writer logs in")
    {
        Session::Authorized(auth) => auth,
        other => panic!("expected write access, got {other:?}"),
    }
}

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date")
}

/// A complete form for a new post
pub fn new_post(title: &str, body: &str) -> PostForm {
    let mut form = PostForm::new();
    form.set_title(title, day());
    form.body = body.to_string();
    form
}
