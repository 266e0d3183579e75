pub mod error;
pub mod health;
pub mod logout;
pub mod me;
pub mod session;
pub mod signin;
pub mod signup;

pub use self::error::ApiError;
