//! Client-side state for Groupin: organizations, per-organization profiles,
//! channels and messages held in one in-memory store, with selectors that
//! project it for views.

pub mod config;
pub mod credentials;
pub mod invite;
pub mod model;
pub mod persistence;
pub mod runtime;
pub mod seed;
pub mod selectors;
pub mod store;

mod appresult;

pub use appresult::{AppError, AppResult};
pub use config::Config;
pub use store::AppStore;
