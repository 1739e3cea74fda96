use std::sync::Arc;

use log::info;

use crate::credentials::CredentialStore;
use crate::error::ApiError;

/// Decides whether a screen may issue authenticated calls, and tears the
/// session down when the server rejects the credential. The only way back
/// to the authenticated state is a fresh login or registration handing a
/// new token to [`establish`](SessionGuard::establish).
#[derive(Clone)]
pub struct SessionGuard {
    store: Arc<dyn CredentialStore>,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// The current credential, if any. Callers must fail fast into the
    /// unauthenticated flow when this is `None` instead of issuing the call.
    pub fn token(&self) -> Option<String> {
        self.store.get().filter(|token| !token.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn establish(&self, token: &str) {
        self.store.save(token);
    }

    pub fn logout(&self) {
        self.store.clear();
    }

    /// Inspects a call failure. For auth errors the credential is purged and
    /// `true` is returned so the caller can signal navigation to login —
    /// once per triggering response. All other errors are left to the
    /// caller's local error surface.
    pub fn handle_error(&self, err: &ApiError) -> bool {
        if err.is_auth() {
            info!("credential rejected by server, ending session");
            self.store.clear();
            true
        } else {
            false
        }
    }
}
