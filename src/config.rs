use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

pub const DEFAULT_MAX_QUESTIONS_PER_DRAFT: usize = 200;
pub const DEFAULT_WIZARD_IDLE_MINUTES: i64 = 60;
pub const DEFAULT_MAX_OPEN_WIZARDS_PER_USER: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub jwt_secret: String,
    pub max_questions_per_draft: usize,
    pub wizard_idle_minutes: i64,
    pub max_open_wizards_per_user: usize,
    pub log_format: LogFormat,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let log_format = match env::var("LOG_FORMAT").ok().as_deref() {
            None | Some("") | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(Error::Config(format!(
                    "Invalid value for LOG_FORMAT: {}",
                    other
                )))
            }
        };

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            jwt_secret: get_env("JWT_SECRET")?,
            max_questions_per_draft: get_env_parse_or(
                "MAX_QUESTIONS_PER_DRAFT",
                DEFAULT_MAX_QUESTIONS_PER_DRAFT,
            )?,
            wizard_idle_minutes: get_env_parse_or("WIZARD_IDLE_MINUTES", DEFAULT_WIZARD_IDLE_MINUTES)?,
            max_open_wizards_per_user: get_env_parse_or(
                "MAX_OPEN_WIZARDS_PER_USER",
                DEFAULT_MAX_OPEN_WIZARDS_PER_USER,
            )?,
            log_format,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
