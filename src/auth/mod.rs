//! Token validation and the write-access gate
//!
//! A token is first resolved to an identity, then the identity's permission
//! on the repository is checked. Only an [`Authorized`] session, which the
//! gate builds when write access is confirmed, can be handed to operations
//! that change remote content.

mod token_store;

pub use token_store::TokenStore;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{QuireError, Result};
use crate::remote::IdentityProvider;

// ---------------------------------------------------------------------------
// Identity and permission
// ---------------------------------------------------------------------------

/// The account behind a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub handle: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
}

impl Identity {
    /// Display name, or the handle when the account has none
    pub fn display(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.handle)
    }
}

/// Repository permission level, ordered from least to most access
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    #[default]
    None,
    Read,
    Write,
    Admin,
}

impl Permission {
    /// Parse the `permission` field of the collaborator endpoint.
    /// Unknown values grant nothing.
    pub fn parse(s: &str) -> Self {
        match s {
            "admin" => Permission::Admin,
            "write" => Permission::Write,
            "read" => Permission::Read,
            _ => Permission::None,
        }
    }

    pub fn has_write(self) -> bool {
        self >= Permission::Write
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::None => "none",
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Admin => "admin",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a permission check, derived per session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionResult {
    pub has_write_access: bool,
    pub level: Permission,
}

impl From<Permission> for PermissionResult {
    fn from(level: Permission) -> Self {
        Self {
            has_write_access: level.has_write(),
            level,
        }
    }
}

/// A validated token and the identity it belongs to
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    pub identity: Identity,
}

impl Credential {
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("identity", &self.identity)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Proof that the current token may change remote content
#[derive(Debug, Clone)]
pub struct Authorized {
    credential: Credential,
    permission: PermissionResult,
}

impl Authorized {
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn identity(&self) -> &Identity {
        &self.credential.identity
    }

    pub fn permission(&self) -> PermissionResult {
        self.permission
    }
}

/// Current login state
#[derive(Debug, Clone)]
pub enum Session {
    LoggedOut,
    /// Valid token without write access; reads are allowed
    ReadOnly {
        credential: Credential,
        permission: PermissionResult,
        repository: String,
    },
    Authorized(Authorized),
}

impl Session {
    pub fn credential(&self) -> Option<&Credential> {
        match self {
            Session::LoggedOut => None,
            Session::ReadOnly { credential, .. } => Some(credential),
            Session::Authorized(auth) => Some(&auth.credential),
        }
    }

    pub fn permission(&self) -> Option<PermissionResult> {
        match self {
            Session::LoggedOut => None,
            Session::ReadOnly { permission, .. } => Some(*permission),
            Session::Authorized(auth) => Some(auth.permission),
        }
    }

    /// Borrow the write proof, or explain why there is none
    pub fn authorized(&self) -> Result<&Authorized> {
        match self {
            Session::Authorized(auth) => Ok(auth),
            Session::ReadOnly {
                permission,
                repository,
                ..
            } => Err(QuireError::InsufficientPermission {
                repository: repository.clone(),
                level: permission.level.to_string(),
            }),
            Session::LoggedOut => Err(QuireError::NotAuthenticated),
        }
    }
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

/// Runs token validation and the permission check, in that order
pub struct Gate<'a> {
    provider: &'a dyn IdentityProvider,
}

impl<'a> Gate<'a> {
    pub fn new(provider: &'a dyn IdentityProvider) -> Self {
        Self { provider }
    }

    /// Resolve a token to a credential
    pub async fn validate(&self, token: &str) -> Result<Credential> {
        let token = token.trim();
        if token.is_empty() {
            return Err(QuireError::InvalidCredential);
        }
        let identity = self.provider.authenticated_user(token).await?;
        debug!(handle = %identity.handle, "token validated");
        Ok(Credential {
            token: token.to_string(),
            identity,
        })
    }

    /// Check the credential's permission on the configured repository
    pub async fn check_write_access(&self, credential: &Credential) -> Result<PermissionResult> {
        let level = self
            .provider
            .permission_level(&credential.token, &credential.identity.handle)
            .await?;
        debug!(%level, "permission resolved");
        Ok(level.into())
    }

    /// Validate, persist, then check permission.
    ///
    /// The token is stored as soon as it validates so read-only use keeps
    /// working; mutation stays disabled unless write access is confirmed.
    pub async fn login(&self, token: &str, store: &TokenStore) -> Result<Session> {
        let credential = self.validate(token).await?;
        store.save(credential.token())?;
        let session = self.session_for(credential).await?;
        if let Session::ReadOnly { ref repository, permission, .. } = session {
            warn!(%repository, level = %permission.level, "logged in without write access");
        }
        Ok(session)
    }

    /// Re-validate a previously stored token once.
    ///
    /// An invalid token is discarded and the session is logged out without
    /// an error. Transport failures are returned and the token is kept.
    pub async fn restore(&self, store: &TokenStore) -> Result<Session> {
        let Some(token) = store.load()? else {
            return Ok(Session::LoggedOut);
        };

        match self.validate(&token).await {
            Ok(credential) => self.session_for(credential).await,
            Err(QuireError::RemoteUnavailable { reason }) => {
                Err(QuireError::RemoteUnavailable { reason })
            }
            Err(e) => {
                info!(error = %e, "stored token rejected, logging out");
                store.clear()?;
                Ok(Session::LoggedOut)
            }
        }
    }

    async fn session_for(&self, credential: Credential) -> Result<Session> {
        let permission = self.check_write_access(&credential).await?;
        if permission.has_write_access {
            Ok(Session::Authorized(Authorized {
                credential,
                permission,
            }))
        } else {
            let repository = self.provider.repository_label(&credential.identity.handle);
            Ok(Session::ReadOnly {
                credential,
                permission,
                repository,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_ordering() {
        assert!(Permission::None < Permission::Read);
        assert!(Permission::Read < Permission::Write);
        assert!(Permission::Write < Permission::Admin);
    }

    #[test]
    fn test_permission_write_access() {
        assert!(!Permission::None.has_write());
        assert!(!Permission::Read.has_write());
        assert!(Permission::Write.has_write());
        assert!(Permission::Admin.has_write());
    }

    #[test]
    fn test_permission_parse() {
        assert_eq!(Permission::parse("admin"), Permission::Admin);
        assert_eq!(Permission::parse("write"), Permission::Write);
        assert_eq!(Permission::parse("read"), Permission::Read);
        assert_eq!(Permission::parse("maintain"), Permission::None);
        assert_eq!(Permission::parse(""), Permission::None);
    }

    #[test]
    fn test_permission_serde() {
        let json = serde_json::to_string(&Permission::Write).expect("serializable");
        assert_eq!(json, "\"write\"");
    }

    #[test]
    fn test_identity_display_falls_back_to_handle() {
        let mut identity = Identity {
            handle: "ada".to_string(),
            display_name: Some("Ada Lovelace".to_string()),
            avatar_url: None,
            email: None,
        };
        assert_eq!(identity.display(), "Ada Lovelace");
        identity.display_name = Some("  ".to_string());
        assert_eq!(identity.display(), "ada");
    }

    #[test]
    fn test_credential_debug_redacts_token() {
        let credential = Credential {
            token: "ghp_secret".to_string(),
            identity: Identity {
                handle: "ada".to_string(),
                display_name: None,
                avatar_url: None,
                email: None,
            },
        };
        assert!(!format!("{credential:?}").contains("ghp_secret"));
    }

    #[test]
    fn test_logged_out_session_is_not_authorized() {
        assert!(matches!(
            Session::LoggedOut.authorized(),
            Err(QuireError::NotAuthenticated)
        ));
    }
}
