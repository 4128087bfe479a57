use crate::Result;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// number of threads config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Thread {
    /// number of http server threads
    pub http: usize,
}

/// network config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Network {
    /// server bind host
    pub host: String,
    /// server bind port
    pub port: u16,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// payment gateway backend
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GatewayKind {
    Razorpay,
    Mock,
}

impl Default for GatewayKind {
    fn default() -> Self {
        Self::Razorpay
    }
}

/// razorpay api setting
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Razorpay {
    pub api_url: String,
    pub key_id: String,
    pub key_secret: String,
    pub currency: String,
    /// payment link validity in hours
    pub link_expiry_hours: u64,
    /// gateway call timeout in seconds
    pub timeout: u64,
    /// configured but unused, no webhook consumption is implemented
    pub webhook_secret: Option<String>,
}

impl Default for Razorpay {
    fn default() -> Self {
        Self {
            api_url: razorpay_client::rest::DEFAULT_API_URL.to_owned(),
            key_id: "".to_owned(),
            key_secret: "".to_owned(),
            currency: "INR".to_owned(),
            link_expiry_hours: 24,
            timeout: 5,
            webhook_secret: None,
        }
    }
}

/// auth config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Auth {
    /// auth secret
    pub secret: String,

    /// jwt access token expiry in seconds
    pub access_token_expiry: usize,
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            secret: "test".to_owned(),
            access_token_expiry: 3600,
        }
    }
}

/// one-time code config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Otp {
    /// code validity in seconds
    pub ttl: u64,

    /// Return the generated code in the register response instead of
    /// dispatching it out of band. Insecure, local/dev only.
    pub insecure_echo_code: bool,
}

impl Default for Otp {
    fn default() -> Self {
        Self {
            ttl: 300,
            insecure_echo_code: true,
        }
    }
}

/// donation lifecycle config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Donation {
    /// When true `payment_completed` is terminal and reconciliation refuses
    /// to downgrade it. When false the last poll wins.
    pub strict_terminal_status: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Setting {
    /// database url
    /// https://www.sea-ql.org/SeaORM/docs/install-and-config/connection/
    pub db_url: String,

    /// the site url, used for payment callback links
    pub site: Option<String>,

    pub thread: Thread,
    pub network: Network,

    pub gateway: GatewayKind,
    pub razorpay: Razorpay,

    pub auth: Auth,
    pub otp: Otp,
    pub donation: Donation,
}

impl Default for Setting {
    fn default() -> Self {
        Self {
            db_url: "sqlite://givebox.sqlite".to_string(),
            site: None,
            thread: Default::default(),
            network: Default::default(),
            gateway: Default::default(),
            razorpay: Default::default(),
            auth: Default::default(),
            otp: Default::default(),
            donation: Default::default(),
        }
    }
}

impl PartialEq for Setting {
    fn eq(&self, other: &Self) -> bool {
        self.db_url == other.db_url
            && self.thread == other.thread
            && self.network == other.network
            && self.gateway == other.gateway
            && self.razorpay == other.razorpay
            && self.auth == other.auth
            && self.otp == other.otp
            && self.donation == other.donation
    }
}

impl Setting {
    /// read config from file and env
    pub fn read<P: AsRef<Path>>(file: P, env_prefix: Option<String>) -> Result<Self> {
        let builder = Config::builder();
        let mut config = builder
            // Use serde default feature
            // override with file contents
            .add_source(File::with_name(file.as_ref().to_str().unwrap()));
        if let Some(prefix) = env_prefix {
            config = config.add_source(Self::env_source(&prefix));
        }

        let config = config.build()?;
        let mut setting: Setting = config.try_deserialize()?;
        setting.validate()?;
        Ok(setting)
    }

    fn env_source(prefix: &str) -> Environment {
        Environment::with_prefix(prefix)
            .try_parsing(true)
            .prefix_separator("_")
            .separator("__")
    }

    /// read config from env
    pub fn from_env(env_prefix: String) -> Result<Self> {
        let mut config = Config::builder();
        config = config.add_source(Self::env_source(&env_prefix));

        let config = config.build()?;
        let mut setting: Setting = config.try_deserialize()?;
        setting.validate()?;
        Ok(setting)
    }

    /// config from str
    pub fn from_str(s: &str, format: FileFormat) -> Result<Self> {
        let builder = Config::builder();
        let config = builder.add_source(File::from_str(s, format)).build()?;
        let mut setting: Setting = config.try_deserialize()?;
        setting.validate()?;
        Ok(setting)
    }

    fn validate(&mut self) -> Result<()> {
        Ok(())
    }
}
