//! # Scrawl
//!
//! Server for a multiplayer drawing-and-guessing game. Players create
//! rooms, take turns drawing a secret word, and score points by guessing
//! each other's drawings before the clock runs out.
//!
//! This crate is the outermost layer: it binds the WebSocket listener,
//! runs one handler task per connection, and routes decoded commands
//! into [`scrawl_room`]. Everything below it is transport-agnostic.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scrawl::{ScrawlServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), scrawl::ScrawlError> {
//!     let config = ServerConfig::from_env();
//!     let server = ScrawlServer::bind(&config).await?;
//!     server.run().await
//! }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::ServerConfig;
pub use error::ScrawlError;
pub use server::ScrawlServer;
