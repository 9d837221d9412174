//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DistributorConfig (validated, immutable)
//!     → Router::from_config builds backends, pipeline and observers
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; the pipeline it describes never changes afterwards
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::BackendsConfig;
pub use schema::DistributorConfig;
pub use schema::HistoryConfig;
pub use schema::ObservabilityConfig;
pub use schema::ObserversConfig;
pub use schema::PipelineConfig;
pub use schema::SimulationConfig;
pub use validation::{validate_config, ValidationError};
