pub mod database;
pub mod license_repository;

pub use database::Database;
pub use license_repository::SqliteLicenseRepository;
