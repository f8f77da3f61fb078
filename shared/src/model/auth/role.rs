use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
pub const ROLE_EMP: &str = "ROLE_EMP";
pub const ROLE_USER: &str = "ROLE_USER";

// Raw markers the backend has been seen to assign, per canonical role.
const ADMIN_MARKERS: &[&str] = &[ROLE_ADMIN, "ADMIN", "ROLE_ADMINISTRADOR"];
const EMPLOYEE_MARKERS: &[&str] = &[ROLE_EMP, "ROLE_EMPRENDEDOR", "ROLE_EMPLOYEE", "EMPRENDEDOR"];
const CUSTOMER_MARKERS: &[&str] = &[ROLE_USER, "ROLE_CLIENTE", "ROLE_CUSTOMER", "USER"];

/// The single role a profile carries once the backend role list is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CanonicalRole {
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
    #[serde(rename = "ROLE_EMP")]
    Employee,
    #[serde(rename = "ROLE_USER")]
    #[default]
    Customer,
}

/// Highest precedence first.
pub const ROLE_PRECEDENCE: [CanonicalRole; 3] = [CanonicalRole::Admin, CanonicalRole::Employee, CanonicalRole::Customer];

impl CanonicalRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            CanonicalRole::Admin => ROLE_ADMIN,
            CanonicalRole::Employee => ROLE_EMP,
            CanonicalRole::Customer => ROLE_USER,
        }
    }

    /// Short label used by the UI to pick greetings.
    pub const fn user_type(self) -> &'static str {
        match self {
            CanonicalRole::Admin => "admin",
            CanonicalRole::Employee => "employee",
            CanonicalRole::Customer => "customer",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CanonicalRole::Admin => "Administrador",
            CanonicalRole::Employee => "Emprendedor",
            CanonicalRole::Customer => "Cliente",
        }
    }

    fn markers(self) -> &'static [&'static str] {
        match self {
            CanonicalRole::Admin => ADMIN_MARKERS,
            CanonicalRole::Employee => EMPLOYEE_MARKERS,
            CanonicalRole::Customer => CUSTOMER_MARKERS,
        }
    }

    /// Case-insensitive match of a raw backend role against this role's markers.
    pub fn matches(self, raw_role: &str) -> bool {
        let raw_role = raw_role.trim();
        self.markers().iter().any(|marker| marker.eq_ignore_ascii_case(raw_role))
    }
}

impl Display for CanonicalRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_markers() {
        assert!(CanonicalRole::Admin.matches("ROLE_ADMIN"));
        assert!(CanonicalRole::Admin.matches("role_admin"));
        assert!(CanonicalRole::Employee.matches("ROLE_EMPRENDEDOR"));
        assert!(CanonicalRole::Employee.matches(" ROLE_EMP "));
        assert!(!CanonicalRole::Employee.matches("ROLE_ADMIN"));
        assert!(CanonicalRole::Customer.matches("ROLE_USER"));
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&CanonicalRole::Employee).unwrap();
        assert_eq!(json, "\"ROLE_EMP\"");
        let role: CanonicalRole = serde_json::from_str("\"ROLE_ADMIN\"").unwrap();
        assert_eq!(role, CanonicalRole::Admin);
        assert!(serde_json::from_str::<CanonicalRole>("\"ROLE_ROOT\"").is_err());
    }
}
