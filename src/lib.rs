// First, declare the modules folder itself
mod modules;

// Re-export everything from modules for easier access
pub use modules::{auth, config, utils};

// Re-export commonly used types
pub use modules::auth::service::AuthService;
pub use modules::auth::store::{StoreError, UserStore};
pub use modules::config::AppConfig;

// Constants
pub const DEFAULT_DATA_FILE: &str = "login_data.txt";
pub const DEFAULT_CONFIG_FILE: &str = "login_keeper.json";
pub const DEFAULT_LOG_FILE: &str = "login_keeper.log";
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 16;
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*()_+=-";
