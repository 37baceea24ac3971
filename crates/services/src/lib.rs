pub mod auth;
pub mod dao;
pub mod email;
pub mod jobs;
pub mod storage;

pub use auth::AuthService;
pub use dao::*;
pub use email::Mailer;
pub use storage::ObjectStorage;
