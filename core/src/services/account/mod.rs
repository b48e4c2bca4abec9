//! Account self-service flows and password recovery

mod config;
mod recovery;
mod service;


pub use config::AccountServiceConfig;
pub use service::AccountService;
