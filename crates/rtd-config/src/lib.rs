pub mod defaults;
pub mod errors;
pub mod loader;
pub mod model;
pub mod parse;

pub use defaults::default_config;
pub use errors::ConfigError;
pub use loader::{load_config, load_config_with_options, LoadOptions};
pub use model::{ConfigSource, ModuleConfig};
pub use parse::parse_module_config;
