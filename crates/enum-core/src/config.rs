//! Configuration types for the ENUM sync system
//!
//! Every field has an explicit default so a partial configuration file
//! deserializes into a complete [`EnumConfig`]. Validation happens once, when
//! the engine is constructed.

use serde::{Deserialize, Serialize};

/// Main ENUM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumConfig {
    /// Master switch. When false every operation short-circuits.
    #[serde(default)]
    pub enabled: bool,

    /// Abort an operation at the first failed backend call
    #[serde(default)]
    pub strict_mode: bool,

    /// NAPTR order field
    #[serde(default = "default_naptr_order")]
    pub naptr_order: u16,

    /// NAPTR preference field
    #[serde(default = "default_naptr_preference")]
    pub naptr_preference: u16,

    /// TTL (seconds) for created record sets
    #[serde(default = "default_naptr_ttl")]
    pub naptr_ttl: u32,

    /// DNS management backends, processed in this order
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,

    /// Reconciliation sweep settings
    #[serde(default)]
    pub reconcile: ReconcileConfig,
}

impl EnumConfig {
    /// Create a new configuration with defaults (disabled, no endpoints)
    pub fn new() -> Self {
        Self {
            enabled: false,
            strict_mode: false,
            naptr_order: default_naptr_order(),
            naptr_preference: default_naptr_preference(),
            naptr_ttl: default_naptr_ttl(),
            endpoints: Vec::new(),
            reconcile: ReconcileConfig::default(),
        }
    }

    /// Parse a configuration from JSON text
    pub fn from_json(text: &str) -> Result<Self, crate::Error> {
        Ok(serde_json::from_str(text)?)
    }

    /// Enable or disable the engine
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Enable or disable strict mode
    pub fn with_strict_mode(mut self, strict_mode: bool) -> Self {
        self.strict_mode = strict_mode;
        self
    }

    /// Append an endpoint
    pub fn with_endpoint(mut self, endpoint: EndpointConfig) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    /// Validate the configuration
    ///
    /// A disabled configuration is always valid: nothing in it is ever used.
    /// An enabled one needs at least one endpoint, and every endpoint needs a
    /// unique display name and at least one domain.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !self.enabled {
            return Ok(());
        }

        if self.endpoints.is_empty() {
            return Err(crate::Error::config(
                "ENUM management is enabled but no endpoints are configured",
            ));
        }

        for (index, endpoint) in self.endpoints.iter().enumerate() {
            endpoint.validate()?;

            let name = endpoint.display_name();
            if self.endpoints[..index].iter().any(|e| e.display_name() == name) {
                return Err(crate::Error::config(format!(
                    "Duplicate endpoint name: {}",
                    name
                )));
            }
        }

        self.reconcile.validate()?;

        Ok(())
    }
}

impl Default for EnumConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// One DNS management backend
#[derive(Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Display name used in reports and logs (defaults to `url`)
    #[serde(default)]
    pub name: Option<String>,

    /// Base URL of the management API, e.g. `http://ns1.example.org:8081`
    pub url: String,

    /// Pre-shared API key
    /// ⚠️ NEVER log this value
    pub api_key: String,

    /// SIP domain used in the NAPTR replacement URI
    #[serde(default)]
    pub sip_domain: String,

    /// Zones served by this backend, processed in this order
    #[serde(default)]
    pub domains: Vec<String>,

    /// Server identifier in the API path
    #[serde(default = "default_server_id")]
    pub server_id: String,
}

impl EndpointConfig {
    /// Create a new endpoint configuration
    pub fn new(url: impl Into<String>, api_key: impl Into<String>, sip_domain: impl Into<String>) -> Self {
        Self {
            name: None,
            url: url.into(),
            api_key: api_key.into(),
            sip_domain: sip_domain.into(),
            domains: Vec::new(),
            server_id: default_server_id(),
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a served zone
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domains.push(domain.into());
        self
    }

    /// Name used in reports: the configured name, or the URL
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }

    /// Validate the endpoint configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.url.is_empty() {
            return Err(crate::Error::config("Endpoint URL cannot be empty"));
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(crate::Error::config(format!(
                "Endpoint URL must use HTTP or HTTPS scheme. Got: {}",
                self.url
            )));
        }
        if self.api_key.is_empty() {
            return Err(crate::Error::config(format!(
                "Endpoint {} has an empty API key",
                self.display_name()
            )));
        }
        if self.domains.is_empty() {
            return Err(crate::Error::config(format!(
                "Endpoint {} serves no domains",
                self.display_name()
            )));
        }
        if self.domains.iter().any(|d| d.trim().is_empty()) {
            return Err(crate::Error::config(format!(
                "Endpoint {} has an empty domain entry",
                self.display_name()
            )));
        }
        Ok(())
    }
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("api_key", &"<REDACTED>")
            .field("sip_domain", &self.sip_domain)
            .field("domains", &self.domains)
            .field("server_id", &self.server_id)
            .finish()
    }
}

/// Reconciliation sweep settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Subscribers requested per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Hard ceiling on pages fetched in one sweep
    ///
    /// Guards against a pagination source that never returns an empty page.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum per-subscriber outcomes kept in the report
    ///
    /// Counters always cover the full sweep; only the detail list is capped.
    #[serde(default = "default_report_limit")]
    pub report_limit: usize,
}

impl ReconcileConfig {
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.page_size == 0 {
            return Err(crate::Error::config("Reconcile page size must be > 0"));
        }
        if self.max_pages == 0 {
            return Err(crate::Error::config("Reconcile page ceiling must be > 0"));
        }
        Ok(())
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            report_limit: default_report_limit(),
        }
    }
}

fn default_naptr_order() -> u16 {
    10
}

fn default_naptr_preference() -> u16 {
    10
}

fn default_naptr_ttl() -> u32 {
    3600
}

fn default_server_id() -> String {
    "localhost".to_string()
}

fn default_page_size() -> usize {
    100
}

fn default_max_pages() -> usize {
    10_000
}

fn default_report_limit() -> usize {
    1000
}
