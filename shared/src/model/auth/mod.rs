mod role;
mod user;
mod registration;

pub use self::role::*;
pub use self::user::*;
pub use self::registration::*;
