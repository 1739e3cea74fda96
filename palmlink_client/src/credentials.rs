use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use log::warn;

/// Single source of truth for the bearer token. One live value per
/// installation; nothing else caches the token beyond a single operation.
pub trait CredentialStore: Send + Sync {
    fn save(&self, token: &str);
    fn get(&self) -> Option<String>;
    fn clear(&self);
}

/// Production store: the raw token in a file under the user's home
/// directory. Reads and writes are single-key operations; failures are
/// logged and treated as "no credential".
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new() -> Self {
        let root = dirs::home_dir()
            .map(|home| home.join(".palmlink"))
            .unwrap_or_else(|| PathBuf::from(".palmlink"));
        Self {
            path: root.join("token"),
        }
    }

    /// Store rooted at an explicit path, for tests and alternate installs.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Default for FileCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, token: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                warn!("failed to create credential dir {}: {err}", parent.display());
                return;
            }
        }
        if let Err(err) = fs::write(&self.path, token) {
            warn!("failed to persist credential: {err}");
        }
    }

    fn get(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim().to_string();
                (!token.is_empty()).then_some(token)
            }
            Err(_) => None,
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!("failed to clear credential: {err}"),
        }
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, token: &str) {
        *self.token.lock().expect("credential lock") = Some(token.to_string());
    }

    fn get(&self) -> Option<String> {
        self.token.lock().expect("credential lock").clone()
    }

    fn clear(&self) {
        *self.token.lock().expect("credential lock") = None;
    }
}
