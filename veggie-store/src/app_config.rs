use serde::Deserialize;
use std::env;
use veggie_core::CreditPolicy;
use veggie_shared::AppSettings;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub orders: OrdersConfig,
    #[serde(default)]
    pub recurrence: RecurrenceConfig,
    #[serde(default)]
    pub settings: AppSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 { 5 }

#[derive(Debug, Deserialize, Clone)]
pub struct OrdersConfig {
    #[serde(default = "default_fulfilment_location")]
    pub fulfilment_location: String,
    #[serde(default)]
    pub credit_policy: CreditPolicy,
}

fn default_fulfilment_location() -> String { "MAIN".to_string() }

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            fulfilment_location: default_fulfilment_location(),
            credit_policy: CreditPolicy::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecurrenceConfig {
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

fn default_sweep_interval() -> u64 { 300 }

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Optional per-environment overrides
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Machine-local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `VEGGIE_ORDERS__CREDIT_POLICY=block`
            .add_source(config::Environment::with_prefix("VEGGIE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
