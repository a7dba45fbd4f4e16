pub mod persistence;
pub mod services;

pub use persistence::{PersistenceBootstrap, PersistenceHandle};
pub use services::{ProxyHandle, ServicesBootstrap, ServicesHandle};
