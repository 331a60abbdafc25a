pub mod errors;
pub mod id;

pub use errors::{ConfigError, DomError, MockviewError};
pub use id::{new_id, MountId};

pub type Result<T> = std::result::Result<T, MockviewError>;
