mod logging;

pub use self::logging::*;
