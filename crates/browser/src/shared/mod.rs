pub mod js;
pub mod errors;
pub mod config;

pub use config::LoaderConfig;
pub use errors::to_registry_error;
