//! Bearer-credential authentication and the staff-visibility rule.
//!
//! The authenticator is an external collaborator: given a bearer credential
//! it resolves to an [`AuthenticatedCaller`] or nothing (missing, expired,
//! or unknown). The core treats the resolved caller as opaque, trusted input.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use sp_protocol::StaffMember;

/// Caller role. Admins may view every staff record; everyone else only
/// their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Staff,
}

/// The authenticated identity attached to a request.
#[derive(Debug, Clone)]
pub struct AuthenticatedCaller {
    /// Account identifier, compared against `StaffMember::owner_ref`.
    pub id: String,
    pub role: Role,
    pub name: String,
}

/// Resolves a bearer credential to a caller identity.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns the caller for a valid credential, or `None` when the
    /// credential is missing from the registry, expired, or malformed.
    async fn authenticate(&self, credential: &str) -> Option<AuthenticatedCaller>;
}

/// Static token-table authenticator.
pub struct TokenAuthenticator {
    tokens: HashMap<String, AuthenticatedCaller>,
}

impl TokenAuthenticator {
    pub fn new() -> Self {
        Self {
            tokens: HashMap::new(),
        }
    }

    /// Register a credential for a caller.
    pub fn insert(&mut self, token: impl Into<String>, caller: AuthenticatedCaller) {
        self.tokens.insert(token.into(), caller);
    }

    /// Token table matching the sample entities in
    /// `MemoryProvider::with_sample_data` (development / tests).
    pub fn with_sample_tokens() -> Self {
        let mut auth = Self::new();
        auth.insert(
            "admin-token",
            AuthenticatedCaller {
                id: "acct-admin".into(),
                role: Role::Admin,
                name: "Asha Verma".into(),
            },
        );
        auth.insert(
            "rahul-token",
            AuthenticatedCaller {
                id: "acct-rahul".into(),
                role: Role::Staff,
                name: "Rahul Mehta".into(),
            },
        );
        auth.insert(
            "priya-token",
            AuthenticatedCaller {
                id: "acct-priya".into(),
                role: Role::Staff,
                name: "Priya Shah".into(),
            },
        );
        auth
    }
}

impl Default for TokenAuthenticator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Authenticator for TokenAuthenticator {
    async fn authenticate(&self, credential: &str) -> Option<AuthenticatedCaller> {
        self.tokens.get(credential).cloned()
    }
}

/// Extract the bearer token from an `Authorization` header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// The staff-visibility rule: Admins see everyone; a non-admin caller sees
/// a staff record iff their account id equals the record's owner reference.
pub fn can_view_staff(caller: &AuthenticatedCaller, staff: &StaffMember) -> bool {
    caller.role == Role::Admin || caller.id == staff.owner_ref
}
