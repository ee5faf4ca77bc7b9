use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub provider: ProviderConfig,
}

/// Connection parameters for the external price data provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// The base URL of the provider's chart API.
    pub base_url: String,
    /// The User-Agent header sent with every request. The provider rejects
    /// requests without a browser-like agent.
    pub user_agent: String,
}
