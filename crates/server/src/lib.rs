//! HTTP front end for the Coffee Journey store.
//!
//! Coffees are created and updated from HTML-style forms (urlencoded or
//! multipart with an optional image), read back as JSON, and their images are
//! served from `/coffeeJourney/images/{id}`. Every error response has the
//! shape `{"result": <message>}`.
//!
//! | Route | Handler |
//! |---|---|
//! | `POST /coffeeJourney/` | [`routes::coffee::create_coffee`] |
//! | `GET /coffeeJourney/` | [`routes::coffee::list_coffees`] |
//! | `GET /coffeeJourney/{id}` | [`routes::coffee::get_coffee`] |
//! | `PUT /coffeeJourney/{id}` | [`routes::coffee::update_coffee`] |
//! | `DELETE /coffeeJourney/{id}` | [`routes::coffee::delete_coffee`] |
//! | `GET /coffeeJourney/images/{id}` | [`routes::coffee::get_image`] |
//! | `GET /health`, `GET /ready` | [`routes::health`] |
//!
//! The router is built by [`build_router`] around a [`ServerState`], so tests
//! can mount it over in-memory backends:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use coffee_journey::{FileBlobStore, MemoryStore};
//! use server::{build_router, ServerConfig, ServerState};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let state = ServerState::with_backends(
//!     ServerConfig::default(),
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(FileBlobStore::open("images")?),
//! );
//! let app = build_router(Arc::new(state));
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
