//! GitHub REST backend for [`ContentStore`] and [`IdentityProvider`].
//!
//! Uses the repository contents API for posts and the `/user` and
//! collaborator permission endpoints for identity. Content travels base64
//! encoded; revision handles carry the blob SHA.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{
    ContentStore, IdentityProvider, RemoteEntry, RemoteFile, RemoteFileHandle, WriteOutcome,
};
use crate::auth::{Identity, Permission};
use crate::config::Config;
use crate::content::is_post_file;
use crate::error::{QuireError, Result};

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

// ---------------------------------------------------------------------------
// Shared client
// ---------------------------------------------------------------------------

/// HTTP client and repository coordinates shared by store and identity lookups
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_url: Url,
    owner: Option<String>,
    repo: String,
    branch: String,
    content_dir: String,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("quire/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;
        let api_url = Url::parse(&config.api_url).map_err(|e| QuireError::ConfigInvalid {
            message: format!("api_url '{}': {e}", config.api_url),
        })?;

        Ok(Self {
            http,
            api_url,
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            branch: config.branch.clone(),
            content_dir: config.content_dir().to_string(),
        })
    }

    fn owner_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.owner.as_deref().unwrap_or(fallback)
    }

    /// API URL with `segments` appended, each one percent-encoded
    fn endpoint<'s>(&self, segments: impl IntoIterator<Item = &'s str>) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| QuireError::ConfigInvalid {
                message: format!("api_url '{}' cannot take a path", self.api_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get(&self, url: Url, token: &str) -> RequestBuilder {
        self.authorized(self.http.get(url), token)
    }

    fn authorized(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder
            .bearer_auth(token)
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    /// Bind this client to a token and an owner, yielding a content store.
    ///
    /// `fallback_owner` is used when no owner is configured, normally the
    /// authenticated user's handle.
    pub fn store(&self, token: impl Into<String>, fallback_owner: &str) -> GitHubStore {
        GitHubStore {
            client: self.clone(),
            token: token.into(),
            owner: self.owner_or(fallback_owner).to_string(),
        }
    }
}

#[async_trait]
impl IdentityProvider for GitHubClient {
    async fn authenticated_user(&self, token: &str) -> Result<Identity> {
        let url = self.endpoint(["user"])?;
        debug!(%url, "fetching authenticated user");

        let resp = self.get(url.clone(), token).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            warn!(%status, "token validation failed");
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => QuireError::InvalidCredential,
                _ => status_error(status, url.as_str()),
            });
        }

        let user: UserResponse = resp.json().await?;
        Ok(user.into())
    }

    async fn permission_level(&self, token: &str, username: &str) -> Result<Permission> {
        let url = self.endpoint([
            "repos",
            self.owner_or(username),
            self.repo.as_str(),
            "collaborators",
            username,
            "permission",
        ])?;
        debug!(%url, "checking collaborator permission");

        let resp = self.get(url, token).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            warn!(username, status = %status, "collaborator permission check failed");
            return match status {
                // The API hides repositories and collaborator lists from
                // users without push access.
                StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => Ok(Permission::None),
                _ => Err(QuireError::RemoteUnavailable {
                    reason: format!("permission check returned {status}"),
                }),
            };
        }

        let body: PermissionResponse = resp.json().await?;
        Ok(Permission::parse(&body.permission))
    }

    fn repository_label(&self, username: &str) -> String {
        format!("{}/{}", self.owner_or(username), self.repo)
    }
}

// ---------------------------------------------------------------------------
// Content store
// ---------------------------------------------------------------------------

/// Posts directory of one repository, authenticated with one token
#[derive(Debug, Clone)]
pub struct GitHubStore {
    client: GitHubClient,
    token: String,
    owner: String,
}

impl GitHubStore {
    fn path_for(&self, name: &str) -> String {
        format!("{}/{name}", self.client.content_dir)
    }

    /// Contents API URL for a repository path. Each path segment is
    /// percent-encoded, so `?`, `#` and `%` stay part of the filename.
    fn contents_url(&self, path: &str) -> Result<Url> {
        let base = ["repos", self.owner.as_str(), self.client.repo.as_str(), "contents"];
        self.client.endpoint(base.into_iter().chain(path.split('/')))
    }

    fn branch_query(&self) -> [(&'static str, &str); 1] {
        [("ref", self.client.branch.as_str())]
    }

    async fn send(&self, builder: RequestBuilder, path: &str) -> Result<Response> {
        let resp = self.client.authorized(builder, &self.token).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            let body = resp.text().await.unwrap_or_default();
            warn!(path, %status, body = %body, "contents API returned non-success");
            Err(status_error(status, path))
        }
    }
}

#[async_trait]
impl ContentStore for GitHubStore {
    async fn list(&self) -> Result<Vec<RemoteEntry>> {
        let dir = self.client.content_dir.clone();
        let url = self.contents_url(&dir)?;
        debug!(%url, "listing posts");

        let request = self.client.http.get(url).query(&self.branch_query());
        let resp = match self.send(request, &dir).await {
            Ok(resp) => resp,
            // Git has no empty directories: a missing one means no posts yet.
            Err(QuireError::NotFound { .. }) => return Ok(Vec::new()),
            Err(QuireError::RemoteUnavailable { reason }) => {
                return Err(QuireError::RemoteUnavailable { reason });
            }
            Err(other) => {
                return Err(QuireError::RemoteUnavailable {
                    reason: other.to_string(),
                });
            }
        };

        let items: Vec<ContentItem> = resp.json().await?;
        Ok(post_entries(items))
    }

    async fn read(&self, name: &str) -> Result<RemoteFile> {
        let path = self.path_for(name);
        let url = self.contents_url(&path)?;
        debug!(%url, "reading post");

        let request = self.client.http.get(url).query(&self.branch_query());
        let resp = self.send(request, &path).await?;
        let body: serde_json::Value = resp.json().await?;

        // A directory at this path comes back as an array.
        let item: ContentItem =
            serde_json::from_value(body).map_err(|_| QuireError::NotFound { path: path.clone() })?;
        if item.kind != "file" {
            return Err(QuireError::NotFound { path });
        }

        let content = decode_content(item.content.as_deref().unwrap_or_default(), &path)?;
        Ok(RemoteFile {
            content,
            handle: RemoteFileHandle::new(item.path, item.sha),
            html_url: item.html_url,
        })
    }

    async fn write(
        &self,
        name: &str,
        content: &str,
        handle: Option<RemoteFileHandle>,
        message: &str,
    ) -> Result<WriteOutcome> {
        let path = self.path_for(name);
        if let Some(ref h) = handle {
            h.ensure_path(&path)?;
        }
        let created = handle.is_none();
        let payload = PutRequest {
            message,
            content: STANDARD.encode(content.as_bytes()),
            branch: &self.client.branch,
            sha: handle.as_ref().map(RemoteFileHandle::content_hash),
        };
        debug!(path = %path, created, "writing post");

        let request = self.client.http.put(self.contents_url(&path)?).json(&payload);
        let resp = self.send(request, &path).await?;
        let body: PutResponse = resp.json().await?;

        Ok(WriteOutcome {
            handle: RemoteFileHandle::new(body.content.path, body.content.sha),
            html_url: body.content.html_url,
            created,
        })
    }

    async fn delete(&self, name: &str, handle: RemoteFileHandle, message: &str) -> Result<()> {
        let path = self.path_for(name);
        handle.ensure_path(&path)?;
        let payload = DeleteRequest {
            message,
            sha: handle.content_hash(),
            branch: &self.client.branch,
        };
        debug!(path = %path, "deleting post");

        let request = self.client.http.delete(self.contents_url(&path)?).json(&payload);
        self.send(request, &path).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct UserResponse {
    login: String,
    name: Option<String>,
    avatar_url: Option<String>,
    email: Option<String>,
}

impl From<UserResponse> for Identity {
    fn from(user: UserResponse) -> Self {
        Identity {
            handle: user.login,
            display_name: user.name,
            avatar_url: user.avatar_url,
            email: user.email,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PermissionResponse {
    #[serde(default)]
    permission: String,
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    name: String,
    path: String,
    sha: String,
    #[serde(default)]
    size: u64,
    #[serde(rename = "type", default)]
    kind: String,
    content: Option<String>,
    html_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    message: &'a str,
    sha: &'a str,
    branch: &'a str,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    content: PutContent,
}

#[derive(Debug, Deserialize)]
struct PutContent {
    path: String,
    sha: String,
    html_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Translate a non-success contents API status into an error.
///
/// GitHub answers a missing or stale `sha` with 409 or 422 depending on the
/// case; both mean the caller's view of the file is out of date.
fn status_error(status: StatusCode, path: &str) -> QuireError {
    let path = path.to_string();
    match status {
        StatusCode::UNAUTHORIZED => QuireError::InvalidCredential,
        StatusCode::FORBIDDEN => QuireError::InsufficientPermission {
            repository: path,
            level: "unknown".to_string(),
        },
        StatusCode::NOT_FOUND => QuireError::NotFound { path },
        StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED | StatusCode::UNPROCESSABLE_ENTITY => {
            QuireError::Conflict { path }
        }
        _ => QuireError::RemoteUnavailable {
            reason: format!("{path}: HTTP {status}"),
        },
    }
}

/// Base64 from the contents API is wrapped at 60 columns.
fn decode_content(encoded: &str, path: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| QuireError::RemoteUnavailable {
            reason: format!("{path}: invalid base64 content: {e}"),
        })?;
    String::from_utf8(bytes).map_err(|e| QuireError::RemoteUnavailable {
        reason: format!("{path}: content is not UTF-8: {e}"),
    })
}

fn post_entries(items: Vec<ContentItem>) -> Vec<RemoteEntry> {
    items
        .into_iter()
        .filter(|item| item.kind == "file" && is_post_file(&item.name))
        .map(|item| RemoteEntry {
            name: item.name,
            path: item.path,
            size: item.size,
            last_modified: None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ── Status mapping ──────────────────────────────────────────────────

    #[test]
    fn status_unauthorized_is_invalid_credential() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "blog/a.md"),
            QuireError::InvalidCredential
        ));
    }

    #[test]
    fn status_stale_sha_is_conflict() {
        for status in [
            StatusCode::CONFLICT,
            StatusCode::UNPROCESSABLE_ENTITY,
            StatusCode::PRECONDITION_FAILED,
        ] {
            assert!(matches!(
                status_error(status, "blog/a.md"),
                QuireError::Conflict { .. }
            ));
        }
    }

    #[test]
    fn status_not_found() {
        match status_error(StatusCode::NOT_FOUND, "blog/a.md") {
            QuireError::NotFound { path } => assert_eq!(path, "blog/a.md"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn status_server_error_is_unavailable() {
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "blog"),
            QuireError::RemoteUnavailable { .. }
        ));
    }

    // ── Content decoding ────────────────────────────────────────────────

    #[test]
    fn decode_wrapped_base64() {
        let encoded = "LS0tCnRpdGxlOiAiSGki\nCi0tLQoKYm9keQ==\n";
        assert_eq!(
            decode_content(encoded, "blog/a.md").expect("valid base64"),
            "---\ntitle: \"Hi\"\n---\n\nbody"
        );
    }

    #[test]
    fn decode_invalid_base64() {
        assert!(matches!(
            decode_content("***", "blog/a.md"),
            Err(QuireError::RemoteUnavailable { .. })
        ));
    }

    // ── Listing ─────────────────────────────────────────────────────────

    #[test]
    fn listing_keeps_markdown_files_only() {
        let body = serde_json::json!([
            {"name": "2024-01-15-a.md", "path": "blog/2024-01-15-a.md", "sha": "1", "size": 2048, "type": "file"},
            {"name": "index.json", "path": "blog/index.json", "sha": "2", "size": 10, "type": "file"},
            {"name": "drafts.md", "path": "blog/drafts.md", "sha": "3", "size": 0, "type": "dir"}
        ]);
        let items: Vec<ContentItem> = serde_json::from_value(body).expect("valid listing");
        let entries = post_entries(items);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "2024-01-15-a.md");
        assert_eq!(entries[0].size, 2048);
    }

    // ── Wire payloads ───────────────────────────────────────────────────

    #[test]
    fn put_request_omits_sha_on_create() {
        let payload = PutRequest {
            message: "Add blog post: a.md",
            content: STANDARD.encode("x"),
            branch: "main",
            sha: None,
        };
        let json = serde_json::to_value(&payload).expect("serializable");
        assert!(json.get("sha").is_none());
        assert_eq!(json["content"], "eA==");
    }

    #[test]
    fn user_response_maps_identity() {
        let user: UserResponse = serde_json::from_value(serde_json::json!({
            "login": "ada", "name": null, "avatar_url": "https://a/b.png", "email": null
        }))
        .expect("valid user");
        let identity: Identity = user.into();
        assert_eq!(identity.handle, "ada");
        assert_eq!(identity.display(), "ada");
    }

    // ── Coordinates ─────────────────────────────────────────────────────

    #[test]
    fn store_uses_fallback_owner() {
        let client = GitHubClient::new(&Config::default()).expect("client");
        let store = client.store("t", "ada");
        assert_eq!(
            store
                .contents_url(&store.path_for("a.md"))
                .expect("url")
                .as_str(),
            "https://api.github.com/repos/ada/mywebsite/contents/blog/a.md"
        );
        assert_eq!(client.repository_label("ada"), "ada/mywebsite");
    }

    #[test]
    fn contents_url_encodes_filename() {
        let client = GitHubClient::new(&Config::default()).expect("client");
        let store = client.store("t", "ada");
        for (name, encoded) in [
            ("what?.md", "what%3F.md"),
            ("c#-tips.md", "c%23-tips.md"),
            ("100%.md", "100%25.md"),
            ("two words.md", "two%20words.md"),
        ] {
            let url = store.contents_url(&store.path_for(name)).expect("url");
            assert_eq!(
                url.path(),
                format!("/repos/ada/mywebsite/contents/blog/{encoded}")
            );
            assert!(url.query().is_none());
            assert!(url.fragment().is_none());
        }
    }

    #[test]
    fn endpoint_keeps_api_base_path() {
        let config = Config {
            api_url: "https://ghe.example.com/api/v3/".to_string(),
            ..Config::default()
        };
        let client = GitHubClient::new(&config).expect("client");
        assert_eq!(
            client.endpoint(["user"]).expect("url").as_str(),
            "https://ghe.example.com/api/v3/user"
        );
    }
}
