pub mod config;
pub mod data_url;
pub mod error;
pub mod ledger;
pub mod menu;
pub mod onboarding;
pub mod toast;
pub mod types;
pub mod week;

// Keep the public surface small and intentional.
pub use config::*;
pub use error::*;
pub use ledger::*;
pub use toast::*;
pub use types::*;
