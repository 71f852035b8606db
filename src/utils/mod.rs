pub mod auth;
pub mod error;
pub mod flash;
pub mod password;
pub mod pictures;
