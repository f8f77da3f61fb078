mod storage;
mod credential_store;

pub use self::storage::*;
pub use self::credential_store::*;
