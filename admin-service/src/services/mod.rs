//! Services layer - business logic over the stores and external capabilities.

mod email;
mod hasher;
mod invites;
mod users;

pub use email::{InviteMailer, MockMailer, SmtpMailer};
pub use hasher::{Argon2Hasher, HashProvider};
pub use invites::{InviteService, IssuedInvite};
pub use users::UserService;
