use log::{error, warn};
use shared::model::UserProfile;
use crate::error::StorageError;
use crate::repository::StorageBackend;

pub const TOKEN_KEY: &str = "authToken";
pub const PROFILE_KEY: &str = "userInfo";
pub const EXPIRATION_KEY: &str = "tokenExpiration";
pub const REMEMBERED_USERNAME_KEY: &str = "rememberedUsername";

/// Persists the session token and user profile. Every failure collapses to
/// "absent" and is only logged.
#[derive(Debug, Clone)]
pub struct CredentialStore<B> {
    backend: B,
}

impl<B: StorageBackend> CredentialStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.backend.get_item(key) {
            Ok(value) => value,
            Err(err) => {
                warn!("Failed to read {key} from storage: {err}");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(err) = self.backend.set_item(key, value) {
            error!("Failed to write {key} to storage: {err}");
        }
    }

    fn remove(&self, key: &str) {
        if let Err(err) = self.backend.remove_item(key) {
            error!("Failed to remove {key} from storage: {err}");
        }
    }

    pub fn save_token(&self, token: &str) {
        self.write(TOKEN_KEY, token);
    }

    pub fn get_token(&self) -> Option<String> {
        self.read(TOKEN_KEY)
    }

    pub fn save_profile(&self, profile: &UserProfile) {
        match serde_json::to_string(profile) {
            Ok(json) => self.write(PROFILE_KEY, &json),
            Err(err) => error!("Failed to serialize user profile: {err}"),
        }
    }

    pub fn get_profile(&self) -> Option<UserProfile> {
        let json = self.read(PROFILE_KEY)?;
        serde_json::from_str(&json)
            .map_err(|err| warn!("Stored user profile is unreadable: {err}"))
            .ok()
    }

    /// Expiry in seconds since epoch as reported by the login response.
    pub fn get_expiration(&self) -> Option<i64> {
        let value = self.read(EXPIRATION_KEY)?;
        value.trim().parse()
            .map_err(|err| warn!("Stored token expiration is unreadable: {err}"))
            .ok()
    }

    fn write_session(&self, token: &str, profile: &UserProfile, expires_at: Option<i64>) -> Result<(), StorageError> {
        let profile_json = serde_json::to_string(profile)?;
        self.backend.set_item(TOKEN_KEY, token)?;
        self.backend.set_item(PROFILE_KEY, &profile_json)?;
        match expires_at {
            Some(expires_at) => self.backend.set_item(EXPIRATION_KEY, &expires_at.to_string()),
            None => self.backend.remove_item(EXPIRATION_KEY),
        }
    }

    /// Writes token, profile and expiration as a unit. If any write fails
    /// the whole session is removed.
    pub fn save_session(&self, token: &str, profile: &UserProfile, expires_at: Option<i64>) -> Result<(), StorageError> {
        self.write_session(token, profile, expires_at).inspect_err(|err| {
            error!("Failed to persist session: {err}");
            self.clear();
        })
    }

    /// Removes token, profile and expiration. The remembered username is kept.
    pub fn clear(&self) {
        self.remove(TOKEN_KEY);
        self.remove(PROFILE_KEY);
        self.remove(EXPIRATION_KEY);
    }

    pub fn remember_username(&self, username: &str) {
        self.write(REMEMBERED_USERNAME_KEY, username);
    }

    /// Keeps `username` for the next login when `remember` is set, drops any
    /// remembered name otherwise.
    pub fn update_remembered_username(&self, username: &str, remember: bool) {
        if remember {
            self.remember_username(username);
        } else {
            self.forget_username();
        }
    }

    pub fn forget_username(&self) {
        self.remove(REMEMBERED_USERNAME_KEY);
    }

    pub fn remembered_username(&self) -> Option<String> {
        self.read(REMEMBERED_USERNAME_KEY).filter(|name| !name.is_empty())
    }
}
