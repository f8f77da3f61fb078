use std::sync::LazyLock;
use regex::Regex;
use shared::model::RegistrationRequest;
use crate::error::AuthError;

pub const MIN_LOGIN_PASSWORD_LEN: usize = 3;
pub const MIN_REGISTRATION_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

fn invalid(msg: &str) -> AuthError {
    AuthError::Validation(msg.to_string())
}

/// Presentation level check run before `login`; the username is trimmed.
pub fn validate_login(username: &str, password: &str) -> Result<String, AuthError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(invalid("Username is required"));
    }
    if password.trim().is_empty() {
        return Err(invalid("Password is required"));
    }
    if password.chars().count() < MIN_LOGIN_PASSWORD_LEN {
        return Err(invalid("Password must be at least 3 characters"));
    }
    Ok(username.to_string())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

/// Raw registration form as entered by the user.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub email: String,
    pub nombre: String,
    pub apellido: String,
}

/// Checks the form and normalizes it into the request body.
pub fn validate_registration(form: &RegistrationForm) -> Result<RegistrationRequest, AuthError> {
    let username = form.username.trim();
    let email = form.email.trim().to_lowercase();
    let nombre = form.nombre.trim();
    let apellido = form.apellido.trim();

    if username.is_empty() {
        return Err(invalid("Username is required"));
    }
    if form.password.is_empty() {
        return Err(invalid("Password is required"));
    }
    if form.password.chars().count() < MIN_REGISTRATION_PASSWORD_LEN {
        return Err(invalid("Password must be at least 6 characters"));
    }
    if form.password != form.confirm_password {
        return Err(invalid("Passwords do not match"));
    }
    if email.is_empty() {
        return Err(invalid("Email is required"));
    }
    if !is_valid_email(&email) {
        return Err(invalid("Invalid email"));
    }
    if nombre.is_empty() {
        return Err(invalid("First name is required"));
    }
    if apellido.is_empty() {
        return Err(invalid("Last name is required"));
    }

    Ok(RegistrationRequest {
        username: username.to_string(),
        password: form.password.clone(),
        email,
        nombre: nombre.to_string(),
        apellido: apellido.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegistrationForm {
        RegistrationForm {
            username: " marco ".to_string(),
            password: "secreto1".to_string(),
            confirm_password: "secreto1".to_string(),
            email: " Marco@Sigchos.EC ".to_string(),
            nombre: "Marco".to_string(),
            apellido: "Guanoluisa".to_string(),
        }
    }

    #[test]
    fn test_validate_login() {
        assert_eq!(validate_login("  ana ", "abc").unwrap(), "ana");
        assert!(matches!(validate_login("   ", "secret"), Err(AuthError::Validation(_))));
        assert!(matches!(validate_login("ana", "   "), Err(AuthError::Validation(_))));
        assert!(matches!(validate_login("ana", "ab"), Err(AuthError::Validation(_))));
    }

    #[test]
    fn test_email() {
        assert!(is_valid_email("ana@sigchos.ec"));
        assert!(!is_valid_email("ana@sigchos"));
        assert!(!is_valid_email("ana sigchos@x.ec"));
        assert!(!is_valid_email("@x.ec"));
    }

    #[test]
    fn test_validate_registration_normalizes() {
        let request = validate_registration(&form()).unwrap();
        assert_eq!(request.username, "marco");
        assert_eq!(request.email, "marco@sigchos.ec");
        assert_eq!(request.password, "secreto1");
    }

    #[test]
    fn test_validate_registration_rejects() {
        let mut short = form();
        short.password = "abc".to_string();
        short.confirm_password = "abc".to_string();
        assert_eq!(validate_registration(&short).unwrap_err().message(), "Password must be at least 6 characters");

        let mut mismatch = form();
        mismatch.confirm_password = "otro1234".to_string();
        assert_eq!(validate_registration(&mismatch).unwrap_err().message(), "Passwords do not match");

        let mut email = form();
        email.email = "marco".to_string();
        assert_eq!(validate_registration(&email).unwrap_err().message(), "Invalid email");

        let mut apellido = form();
        apellido.apellido = " ".to_string();
        assert_eq!(validate_registration(&apellido).unwrap_err().message(), "Last name is required");
    }
}
