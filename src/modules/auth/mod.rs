pub mod password;
pub mod service;
pub mod store;
pub mod user_interface;
pub mod username;

// Re-export the main types and functions
pub use password::{check_password, validate_password, PasswordError};
pub use service::{
    AuthService, LoginOutcome, RecoverOutcome, RegisterOutcome, ResetOutcome, UsernameStatus,
};
pub use store::{StoreError, UserMap, UserStore};
pub use username::{check_username, validate_username, UsernameError};
