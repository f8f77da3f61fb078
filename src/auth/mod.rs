mod token_inspector;
mod role_resolver;
mod session_manager;
mod session_watcher;
mod validation;

pub use self::token_inspector::*;
pub use self::role_resolver::*;
pub use self::session_manager::*;
pub use self::session_watcher::*;
pub use self::validation::*;
