use std::collections::HashMap;
use log::{debug, error, info, warn};
use shared::model::{ErrorInfo, RegistrationRequest, RegistrationResponse, TokenResponse, UserCredential, UserDto, UserProfile};
use shared::utils::{current_time_secs, CONTENT_TYPE_JSON, LOGIN_PATH, LOGIN_ROUTE, REGISTRATION_PATH};
use crate::api::{AuthApi, HttpReply};
use crate::auth::{can_view_prices, default_route_for, derive_primary_role, is_admin, is_expired_with_fallback, is_staff, InspectionPolicy, DEFAULT_INSPECTION_POLICY};
use crate::error::AuthError;
use crate::repository::{CredentialStore, StorageBackend};

pub const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const MSG_SERVER_ERROR: &str = "Server error, please try again later";
pub const MSG_UNEXPECTED_LOGIN_RESPONSE: &str = "The server returned an unexpected login response";
pub const MSG_SESSION_NOT_STORED: &str = "The session could not be stored";
pub const MSG_REGISTERED: &str = "Account created, you can now sign in";
pub const MSG_ALREADY_REGISTERED: &str = "Username or email is already registered";

/// What a successful login established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub profile: UserProfile,
}

/// Navigation the caller has to perform after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Full reload of the login entry point.
    Login,
}

impl Navigation {
    pub const fn route(self) -> &'static str {
        match self {
            Navigation::Login => LOGIN_ROUTE,
        }
    }
}

fn error_message(reply: &HttpReply) -> Option<String> {
    serde_json::from_str::<ErrorInfo>(&reply.body)
        .ok()
        .and_then(|info| info.message)
        .map(|msg| msg.trim().to_string())
        .filter(|msg| !msg.is_empty())
}

fn login_error(reply: &HttpReply) -> AuthError {
    let message = error_message(reply);
    match reply.status {
        401 | 403 => AuthError::Authentication(message.unwrap_or_else(|| MSG_INVALID_CREDENTIALS.to_string())),
        500..=599 => AuthError::Server(message.unwrap_or_else(|| MSG_SERVER_ERROR.to_string())),
        status => AuthError::Rejected {
            status,
            message: message.unwrap_or_else(|| format!("Login failed with status {status}")),
        },
    }
}

fn registration_error_message(reply: &HttpReply) -> String {
    error_message(reply).unwrap_or_else(|| match reply.status {
        400 | 409 => MSG_ALREADY_REGISTERED.to_string(),
        500..=599 => MSG_SERVER_ERROR.to_string(),
        status => format!("Registration failed with status {status}"),
    })
}

fn profile_from_user(user: UserDto) -> UserProfile {
    let role = derive_primary_role(user.roles.as_slice());
    UserProfile::from_dto(user, role)
}

/// Establishes, queries and tears down the session. The only component that
/// talks to the authentication endpoint.
///
/// There is no mutual exclusion between concurrent `login` and `logout`
/// calls; the last storage write wins.
pub struct SessionManager<B, A> {
    store: CredentialStore<B>,
    api: A,
    policy: InspectionPolicy,
}

impl<B: StorageBackend, A: AuthApi> SessionManager<B, A> {
    pub fn new(store: CredentialStore<B>, api: A) -> Self {
        Self::with_policy(store, api, DEFAULT_INSPECTION_POLICY)
    }

    pub fn with_policy(store: CredentialStore<B>, api: A, policy: InspectionPolicy) -> Self {
        Self { store, api, policy }
    }

    pub fn store(&self) -> &CredentialStore<B> {
        &self.store
    }

    fn connectivity_error(&self) -> AuthError {
        AuthError::Connectivity(format!(
            "Could not connect to the authentication service at {}. Check that it is running.",
            self.api.base_url()
        ))
    }

    /// Blank input is forwarded as is; validate before calling.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionData, AuthError> {
        let mut credentials = UserCredential {
            username: username.to_string(),
            password: password.to_string(),
        };
        let result = self.api.post_json(LOGIN_PATH, &credentials).await;
        credentials.zeroize();

        let reply = result.map_err(|err| {
            error!("Login request failed: {err}");
            self.connectivity_error()
        })?;

        if !reply.is_success() {
            let err = login_error(&reply);
            info!("Login rejected for {username}: {} ({err})", reply.status);
            return Err(err);
        }

        let token = match serde_json::from_str::<TokenResponse>(&reply.body) {
            Ok(token) if !token.access_token.is_empty() => token,
            Ok(_) => {
                error!("Login response carries no access token");
                return Err(AuthError::Server(MSG_UNEXPECTED_LOGIN_RESPONSE.to_string()));
            }
            Err(err) => {
                error!("Failed to parse login response: {err}");
                return Err(AuthError::Server(MSG_UNEXPECTED_LOGIN_RESPONSE.to_string()));
            }
        };

        let TokenResponse { access_token, token_type, expires_in, usuario } = token;
        let profile = if let Some(user) = usuario {
            profile_from_user(user)
        } else {
            warn!("Login response for {username} has no user info, storing a minimal profile");
            UserProfile::minimal(username)
        };

        let expires_at = (expires_in > 0).then(|| current_time_secs() + expires_in);
        if let Err(err) = self.store.save_session(&access_token, &profile, expires_at) {
            error!("Login for {username} succeeded but the session was not stored: {err}");
            return Err(AuthError::Server(MSG_SESSION_NOT_STORED.to_string()));
        }
        info!("Logged in as {} ({})", profile.username, profile.role);
        Ok(SessionData {
            token: access_token,
            token_type,
            expires_in,
            profile,
        })
    }

    /// Registers a customer account. Backend rejections are reported in the
    /// response; only an unreachable backend is an error.
    pub async fn register(&self, mut request: RegistrationRequest) -> Result<RegistrationResponse, AuthError> {
        let result = self.api.post_json(REGISTRATION_PATH, &request).await;
        request.zeroize();

        let reply = result.map_err(|err| {
            error!("Registration request failed: {err}");
            self.connectivity_error()
        })?;

        if reply.is_success() {
            let data = serde_json::from_str::<UserDto>(&reply.body).ok().map(profile_from_user);
            if data.is_none() {
                debug!("Registration response has no user body");
            }
            info!("Registered {}", request.username);
            Ok(RegistrationResponse {
                success: true,
                message: Some(MSG_REGISTERED.to_string()),
                data,
            })
        } else {
            let message = registration_error_message(&reply);
            info!("Registration of {} rejected: {} ({message})", request.username, reply.status);
            Ok(RegistrationResponse {
                success: false,
                message: Some(message),
                data: None,
            })
        }
    }

    /// True when the backend answers at all.
    pub async fn check_connection(&self) -> bool {
        match self.api.options(LOGIN_PATH).await {
            Ok(reply) => {
                debug!("Auth service reachable ({})", reply.status);
                true
            }
            Err(err) => {
                warn!("Auth service unreachable: {err}");
                false
            }
        }
    }

    /// A present session whose token is expired gets cleared as a side effect.
    pub fn is_session_valid(&self) -> bool {
        self.is_session_valid_at(current_time_secs())
    }

    pub fn is_session_valid_at(&self, now: i64) -> bool {
        let (Some(token), Some(_profile)) = (self.store.get_token(), self.store.get_profile()) else {
            return false;
        };
        if is_expired_with_fallback(&token, now, self.policy, self.store.get_expiration()) {
            info!("Session expired, clearing it");
            self.clear_session();
            return false;
        }
        true
    }

    /// Clears the session and returns where the caller should navigate.
    pub fn logout(&self) -> Navigation {
        self.clear_session();
        info!("Logged out");
        Navigation::Login
    }

    pub fn clear_session(&self) {
        self.store.clear();
    }

    pub fn auth_header(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string());
        if let Some(token) = self.store.get_token() {
            headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }
        headers
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.store.get_profile()
    }

    pub fn is_admin(&self) -> bool {
        is_admin(self.profile().as_ref())
    }

    pub fn is_staff(&self) -> bool {
        is_staff(self.profile().as_ref())
    }

    pub fn can_view_prices(&self) -> bool {
        can_view_prices(self.profile().as_ref())
    }

    pub fn default_route(&self) -> &'static str {
        default_route_for(self.profile().as_ref())
    }
}
