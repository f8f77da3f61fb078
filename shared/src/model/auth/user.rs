use serde::{Deserialize, Serialize};
use zeroize::Zeroize;
use crate::model::CanonicalRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCredential {
    pub username: String,
    pub password: String,
}

impl UserCredential {
    pub fn zeroize(&mut self) {
        self.password.zeroize();
    }
}

/// Body of a successful `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usuario: Option<UserDto>,
}

/// The backend's user representation (`usuario`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UserDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub apellido: Option<String>,
    #[serde(default)]
    pub activo: Option<bool>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// The profile persisted next to the token. Exactly one canonical role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apellido: Option<String>,
    pub role: CanonicalRole,
}

impl UserProfile {
    /// Profile stored when the login response carries no `usuario`.
    pub fn minimal(username: &str) -> Self {
        Self {
            id: None,
            username: username.to_string(),
            email: None,
            nombre: None,
            apellido: None,
            role: CanonicalRole::default(),
        }
    }

    pub fn from_dto(user: UserDto, role: CanonicalRole) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            nombre: user.nombre,
            apellido: user.apellido,
            role,
        }
    }

    pub fn display_name(&self) -> String {
        match (self.nombre.as_deref(), self.apellido.as_deref()) {
            (Some(nombre), Some(apellido)) if !nombre.is_empty() => format!("{nombre} {apellido}"),
            (Some(nombre), _) if !nombre.is_empty() => nombre.to_string(),
            _ => self.username.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_without_usuario() {
        let json = r#"{"accessToken":"a.b.c","tokenType":"Bearer","expiresIn":3600}"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(token.access_token, "a.b.c");
        assert_eq!(token.expires_in, 3600);
        assert!(token.usuario.is_none());
    }

    #[test]
    fn test_token_response_with_usuario() {
        let json = r#"{"accessToken":"a.b.c","tokenType":"Bearer","expiresIn":3600,
            "usuario":{"id":7,"username":"maria","email":"maria@sigchos.ec","nombre":"Maria",
            "apellido":"Toapanta","activo":true,"roles":["ROLE_EMP","ROLE_USER"]}}"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();
        let user = token.usuario.unwrap();
        assert_eq!(user.id, Some(7));
        assert_eq!(user.roles, vec!["ROLE_EMP".to_string(), "ROLE_USER".to_string()]);
    }

    #[test]
    fn test_profile_round_trip() {
        let profile = UserProfile {
            id: Some(3),
            username: "jose".to_string(),
            email: Some("jose@sigchos.ec".to_string()),
            nombre: Some("Jose".to_string()),
            apellido: None,
            role: CanonicalRole::Admin,
        };
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("apellido"));
        let parsed: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, profile);
    }

    #[test]
    fn test_display_name() {
        let mut profile = UserProfile::minimal("ana");
        assert_eq!(profile.display_name(), "ana");
        profile.nombre = Some("Ana".to_string());
        profile.apellido = Some("Chicaiza".to_string());
        assert_eq!(profile.display_name(), "Ana Chicaiza");
    }
}
