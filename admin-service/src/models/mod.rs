pub mod invitation;
pub mod user;

pub use invitation::Invitation;
pub use user::{UserRecord, UserView, DEFAULT_GROUP};
