pub mod config_store;
pub mod defaults;
pub mod food_service;

pub use config_store::ConfigStore;
pub use food_service::HttpFoodService;
