use serde::{Deserialize, Serialize};
use zeroize::Zeroize;
use crate::model::UserProfile;

/// Body of `POST /registro`. The backend assigns the customer role itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub nombre: String,
    pub apellido: String,
}

impl RegistrationRequest {
    pub fn zeroize(&mut self) {
        self.password.zeroize();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistrationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<UserProfile>,
}

/// Error body the backend may send with a non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ErrorInfo {
    #[serde(default, alias = "error")]
    pub message: Option<String>,
}
