//! HTTP boundary of the chat backend: the cross-origin gate in front of every
//! route and the JSON contracts exchanged with clients.

pub mod config;
pub mod cors;
pub mod error;
pub mod extract;
pub mod models;
pub mod server;

pub use config::Config;
pub use cors::CorsPolicy;
pub use error::ApiError;
pub use extract::Payload;
pub use server::Server;
