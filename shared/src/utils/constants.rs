pub const CONFIG_PATH: &str = "config";
pub const CONFIG_FILE: &str = "config.yml";
pub const SESSION_FILE: &str = "session.json";

pub const CONTENT_TYPE_JSON: &str = "application/json";

pub const LOGIN_PATH: &str = "login";
pub const REGISTRATION_PATH: &str = "registro";

// Front-end entry points.
pub const ADMIN_ROUTE: &str = "/administrador";
pub const EMPLOYEE_ROUTE: &str = "/emprendedor";
pub const LANDING_ROUTE: &str = "/";
pub const LOGIN_ROUTE: &str = "/auth/login";
