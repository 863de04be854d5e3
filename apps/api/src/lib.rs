pub mod config;
pub mod documents;
pub mod errors;
pub mod export;
pub mod generation;
pub mod models;
pub mod notify;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
