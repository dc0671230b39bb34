use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u32,
    pub cleanup_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct WebhookConfig {
    pub checker_url: Option<String>,
    pub cotizador_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteConfig {
    pub destination_country: String,
    pub source_tag: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    pub enable_hsts: Option<bool>,
    pub hsts_max_age: Option<u64>,
    pub hsts_include_subdomains: Option<bool>,
    pub csp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub rate_limit: RateLimitConfig,
    pub webhook: WebhookConfig,
    pub quote: QuoteConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    pub security: Option<SecurityConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        let defaults: &str = include_str!("../config/default.toml");
        match ::config::Config::builder()
            .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
            .build()
        {
            Ok(cfg) => match cfg.try_deserialize() {
                Ok(app_cfg) => app_cfg,
                Err(e) => {
                    eprintln!("FATAL: Failed to deserialize default config: {}", e);
                    panic!("Failed to deserialize default config: {}", e);
                }
            },
            Err(e) => {
                eprintln!("FATAL: Failed to parse default config: {}", e);
                panic!("Failed to parse default config: {}", e);
            }
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Interval of the background sweep, clamped to 10s..=1h.
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.clamp(10, 3600))
    }
}

impl WebhookConfig {
    /// Checker webhook, `None` when unset or blank.
    pub fn checker(&self) -> Option<&str> {
        non_blank(self.checker_url.as_deref())
    }

    /// Cotizador webhook, `None` when unset or blank.
    pub fn cotizador(&self) -> Option<&str> {
        non_blank(self.cotizador_url.as_deref())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Variable names used by the original deployment. They win over everything else.
const LEGACY_OVERRIDES: &[(&str, &str)] = &[
    ("RATE_LIMIT_WINDOW", "rate_limit.window_secs"),
    ("RATE_LIMIT_TOKENS", "rate_limit.max_requests"),
    ("N8N_CHECKER_WEBHOOK_URL", "webhook.checker_url"),
    ("N8N_COTIZADOR_WEBHOOK_URL", "webhook.cotizador_url"),
];

pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let defaults: &str = include_str!("../config/default.toml");
    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
        // Optional local file: globaltrip.toml (in CWD)
        .add_source(::config::File::with_name("globaltrip").required(false));

    if let Ok(custom_path) = std::env::var("GLOBALTRIP_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    builder = builder.add_source(
        ::config::Environment::with_prefix("GLOBALTRIP")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("cors.allowed_origins"),
    );

    for (var, key) in LEGACY_OVERRIDES {
        let value = std::env::var(var).ok().filter(|v| !v.trim().is_empty());
        builder = builder.set_override_option(*key, value)?;
    }

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

pub fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    // Server
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }
    if !(1024..=10 * 1024 * 1024).contains(&cfg.server.max_body_bytes) {
        return Err(anyhow::anyhow!("server.max_body_bytes must be in 1024..=10485760"));
    }

    // Rate limit
    if cfg.rate_limit.window_secs == 0 {
        return Err(anyhow::anyhow!("rate_limit.window_secs must be > 0"));
    }
    if cfg.rate_limit.max_requests == 0 {
        tracing::warn!("rate_limit.max_requests is 0 - every new client will be rejected");
    }

    // Webhooks
    if !(1..=120).contains(&cfg.webhook.timeout_secs) {
        return Err(anyhow::anyhow!("webhook.timeout_secs must be in 1..=120"));
    }
    for (name, value) in [("webhook.checker_url", cfg.webhook.checker()), ("webhook.cotizador_url", cfg.webhook.cotizador())] {
        if let Some(raw) = value {
            let parsed = url::Url::parse(raw).map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", name, e))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(anyhow::anyhow!("{} must use http or https", name));
            }
        }
    }
    if cfg.webhook.checker().is_none() && cfg.webhook.cotizador().is_none() {
        tracing::warn!("No webhook URL configured - form submissions will fail with 500");
    }

    // Quote
    if cfg.quote.destination_country.trim().is_empty() {
        return Err(anyhow::anyhow!("quote.destination_country must not be empty"));
    }

    Ok(())
}
