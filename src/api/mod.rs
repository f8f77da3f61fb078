mod auth_api;

pub use self::auth_api::*;
