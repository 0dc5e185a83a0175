use std::sync::RwLock;

use crate::users::{LoginResponse, User};

/// Capability handing out the current auth state.
///
/// The client never reads ambient storage; whatever holds the signed-in
/// user's token implements this and is injected at construction. The bearer
/// header is attached to requests iff `token()` returns one.
pub trait SessionProvider: Send + Sync {
    /// Bearer token for the signed-in user, if any
    fn token(&self) -> Option<String>;
    /// The signed-in user, if any
    fn user(&self) -> Option<User>;
}

/// In-memory session store, shared between the client and the surrounding
/// application through an `Arc`.
#[derive(Debug, Default)]
pub struct MemorySession {
    state: RwLock<SessionState>,
}

/// Token and user are kept together so a login swaps both atomically
#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<User>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the token and user from a successful login
    pub fn store_login(&self, login: &LoginResponse) {
        let mut state = self.state.write().expect("session lock poisoned");
        state.token = Some(login.access_token.clone());
        state.user = Some(login.user.clone());
    }

    /// Replace the token without touching the user
    pub fn set_token(&self, token: impl Into<String>) {
        let mut state = self.state.write().expect("session lock poisoned");
        state.token = Some(token.into());
    }

    /// Sign out: drop both token and user
    pub fn clear(&self) {
        let mut state = self.state.write().expect("session lock poisoned");
        state.token = None;
        state.user = None;
    }
}

impl SessionProvider for MemorySession {
    fn token(&self) -> Option<String> {
        self.state.read().expect("session lock poisoned").token.clone()
    }

    fn user(&self) -> Option<User> {
        self.state.read().expect("session lock poisoned").user.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_fixture() -> LoginResponse {
        LoginResponse {
            access_token: "t0k3n".to_string(),
            token_type: "bearer".to_string(),
            user: User {
                id: 7,
                username: "ada".to_string(),
                email: "ada@example.com".to_string(),
            },
        }
    }

    #[test]
    fn starts_signed_out() {
        let session = MemorySession::new();
        assert!(session.token().is_none());
        assert!(session.user().is_none());
    }

    #[test]
    fn store_login_keeps_token_and_user() {
        let session = MemorySession::new();
        session.store_login(&login_fixture());

        assert_eq!(session.token().as_deref(), Some("t0k3n"));
        assert_eq!(session.user().map(|u| u.username), Some("ada".to_string()));
    }

    #[test]
    fn clear_signs_out() {
        let session = MemorySession::new();
        session.store_login(&login_fixture());
        session.clear();

        assert!(session.token().is_none());
        assert!(session.user().is_none());
    }
}
