pub mod api;
pub mod config;
pub mod detection;
pub mod error;
pub mod history;
pub mod scorer;
pub mod vehicles;
