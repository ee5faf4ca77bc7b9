use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod request;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use request::PortfolioRequest;
pub use settings::{Config, ProviderConfig};

/// Loads the application configuration from the `config.toml` file.
///
/// The file is optional: when it is absent, the built-in provider defaults
/// are used so the binary works out of the box.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .set_default("provider.base_url", "https://query1.finance.yahoo.com")?
        .set_default(
            "provider.user_agent",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
        )?
        .add_source(config::File::with_name("config.toml").required(false))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;

    Ok(config)
}

/// Loads and validates a portfolio request description from a TOML file.
///
/// Validation happens here, at the boundary, so malformed requests never
/// reach the analytics engine.
pub fn load_request(path: &Path) -> Result<PortfolioRequest, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .build()?;

    let request = builder.try_deserialize::<PortfolioRequest>()?;
    request.validate()?;

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_apply_without_a_file() {
        // No config.toml exists in this crate's directory, so the built-in
        // provider defaults must carry the whole configuration.
        let config = load_config().unwrap();
        assert_eq!(config.provider.base_url, "https://query1.finance.yahoo.com");
        assert!(config.provider.user_agent.starts_with("Mozilla/5.0"));
    }
}
