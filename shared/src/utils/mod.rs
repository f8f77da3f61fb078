mod time_utils;
mod path_utils;
mod constants;

pub use self::time_utils::*;
pub use self::path_utils::*;
pub use self::constants::*;
