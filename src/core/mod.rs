pub mod config;
pub mod element;
pub mod intermediate;
pub mod signature;
pub mod token;
pub mod typed;
pub mod xml_token;
