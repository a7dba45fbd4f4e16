//! axum HTTP surface: market data, licensing, payment webhook and the
//! upstream pass-through proxies.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;

pub use error::ApiError;
pub use router::{AppState, build_router};
