pub mod model;

pub use model::{User, UserRecord, UserSummary};
