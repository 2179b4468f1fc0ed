//! Huayang Server - HTTP surface for the gazetteer
//!
//! Server-rendered pages over [`huayang_core`] and [`huayang_assist`]:
//! the public table of contents and reader, the login form, and the
//! editor dashboard. See [`routes`] for the route table.
//!
//! # Example
//!
//! ```rust,ignore
//! use huayang_server::{routes, AppState, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::new().with_admin_password("secret");
//! let state = AppState::from_config(&config).await?;
//! warp::serve(routes(state)).run(config.bind).await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod render;
pub mod routes;
pub mod session;
pub mod state;

pub use config::{AdminConfig, ServerConfig};
pub use error::ServerError;
pub use routes::routes;
pub use session::{EditorSession, SessionRegistry, SESSION_COOKIE};
pub use state::AppState;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
