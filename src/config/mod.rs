pub mod catalog_config;
pub mod cli;

pub use catalog_config::CatalogConfig;
pub use cli::FileCartStore;
