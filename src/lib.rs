pub mod application;
pub mod config;
pub mod errors;
pub mod infrastructure;
pub mod kernel;
pub mod logger;
pub mod logging;

// Re-export commonly used items for convenience
pub use application::{Application, ApplicationBuilder, Runnable, SharedRunnable};
pub use config::{Config, ConfigSection, Settings};
pub use errors::AppError;
pub use infrastructure::container::{ClassDefinition, Container, ContainerError, Factory, Identifier, Parameter, Value};
pub use logger::{Log, LogLevel, Logger};
