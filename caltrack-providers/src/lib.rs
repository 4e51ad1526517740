pub mod food_api;
pub mod parse;
pub mod request;
pub mod runtime;
