//! HTTP surface of the idonow backend
//!
//! Two route scopes share one set of handlers: `/api` serves primary
//! accounts and `/system` serves operator accounts. The scope a request
//! arrives under decides which account store, pin namespace and services
//! handle it.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod i18n;
pub mod middleware;
pub mod routes;
pub mod state;

pub use app::create_app;
pub use state::{AppState, Collaborators, PopulationStores};
