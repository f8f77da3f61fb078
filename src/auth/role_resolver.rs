use shared::model::{CanonicalRole, UserProfile, ROLE_PRECEDENCE};
use shared::utils::{ADMIN_ROUTE, EMPLOYEE_ROUTE, LANDING_ROUTE};

/// Picks the highest precedence role present in `raw_roles`; customer when none match.
pub fn derive_primary_role<S: AsRef<str>>(raw_roles: &[S]) -> CanonicalRole {
    ROLE_PRECEDENCE
        .into_iter()
        .find(|role| raw_roles.iter().any(|raw| role.matches(raw.as_ref())))
        .unwrap_or_default()
}

pub fn is_admin(profile: Option<&UserProfile>) -> bool {
    profile.is_some_and(|p| p.role == CanonicalRole::Admin)
}

/// Staff may enter the back office.
pub fn is_staff(profile: Option<&UserProfile>) -> bool {
    profile.is_some_and(|p| matches!(p.role, CanonicalRole::Admin | CanonicalRole::Employee))
}

pub fn can_view_prices(profile: Option<&UserProfile>) -> bool {
    profile.is_some_and(|p| p.role == CanonicalRole::Customer || is_staff(Some(p)))
}

pub fn default_route_for(profile: Option<&UserProfile>) -> &'static str {
    match profile.map(|p| p.role) {
        Some(CanonicalRole::Admin) => ADMIN_ROUTE,
        Some(CanonicalRole::Employee) => EMPLOYEE_ROUTE,
        Some(CanonicalRole::Customer) | None => LANDING_ROUTE,
    }
}

pub fn welcome_message(profile: &UserProfile) -> String {
    let name = profile.display_name();
    match profile.role {
        CanonicalRole::Admin => format!("Welcome, Administrador {name}! Opening the control panel..."),
        CanonicalRole::Employee => format!("Welcome, {name}! Opening the management panel..."),
        CanonicalRole::Customer => format!("Welcome, {name}! Taking you to the store..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_role(role: CanonicalRole) -> UserProfile {
        UserProfile { role, ..UserProfile::minimal("tester") }
    }

    #[test]
    fn test_derive_primary_role() {
        assert_eq!(derive_primary_role(&["ROLE_ADMIN", "ROLE_EMP"]), CanonicalRole::Admin);
        assert_eq!(derive_primary_role(&["ROLE_EMP", "ROLE_ADMIN"]), CanonicalRole::Admin);
        assert_eq!(derive_primary_role(&["ROLE_EMP"]), CanonicalRole::Employee);
        assert_eq!(derive_primary_role(&["ROLE_USER", "ROLE_EMPRENDEDOR"]), CanonicalRole::Employee);
        assert_eq!(derive_primary_role(&["ROLE_USER"]), CanonicalRole::Customer);
        assert_eq!(derive_primary_role::<&str>(&[]), CanonicalRole::Customer);
        assert_eq!(derive_primary_role(&["ROLE_GUEST"]), CanonicalRole::Customer);
        assert_eq!(derive_primary_role(vec!["role_admin".to_string()].as_slice()), CanonicalRole::Admin);
    }

    #[test]
    fn test_predicates() {
        let admin = with_role(CanonicalRole::Admin);
        let employee = with_role(CanonicalRole::Employee);
        let customer = with_role(CanonicalRole::Customer);

        assert!(is_admin(Some(&admin)));
        assert!(!is_admin(Some(&employee)));
        assert!(is_staff(Some(&admin)));
        assert!(is_staff(Some(&employee)));
        assert!(!is_staff(Some(&customer)));
        assert!(!is_staff(None));

        for profile in [&admin, &employee, &customer] {
            assert!(can_view_prices(Some(profile)));
        }
        assert!(!can_view_prices(None));
    }

    #[test]
    fn test_default_routes() {
        assert_eq!(default_route_for(Some(&with_role(CanonicalRole::Admin))), "/administrador");
        assert_eq!(default_route_for(Some(&with_role(CanonicalRole::Employee))), "/emprendedor");
        assert_eq!(default_route_for(Some(&with_role(CanonicalRole::Customer))), "/");
        assert_eq!(default_route_for(None), "/");
    }

    #[test]
    fn test_welcome_message() {
        let mut admin = with_role(CanonicalRole::Admin);
        admin.nombre = Some("Rosa".to_string());
        assert!(welcome_message(&admin).contains("Administrador Rosa"));
        assert!(welcome_message(&with_role(CanonicalRole::Customer)).contains("store"));
    }
}
