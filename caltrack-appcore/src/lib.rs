pub mod service;

pub use service::{AppPhase, AppService, MainScreen};
