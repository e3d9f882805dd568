use anyhow::{Context, Result};

use crate::config::{
    config_model::{AuthConfig, Database, DotEnvyConfig, PayHereConfig, SentimentConfig, Server},
    stage::Stage,
};

const DEFAULT_CURRENCY: &str = "LKR";
const DEFAULT_PYTHON_BIN: &str = "python3";
const DEFAULT_SCRIPT_PATH: &str = "scripts/sentiment_analysis.py";
const DEFAULT_SENTIMENT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: required("SERVER_PORT")?.parse()?,
        body_limit: required("SERVER_BODY_LIMIT")?.parse()?,
        timeout: required("SERVER_TIMEOUT")?.parse()?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
        max_connections: parse_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
        connect_timeout_secs: parse_or(
            "DATABASE_CONNECT_TIMEOUT_SECS",
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )?,
    };

    let auth = AuthConfig {
        jwt_secret: required("JWT_SECRET")?,
    };

    let payhere = PayHereConfig {
        merchant_id: required("PAYHERE_MERCHANT_ID")?,
        merchant_secret: required("PAYHERE_MERCHANT_SECRET")?,
        return_url: required("PAYHERE_RETURN_URL")?,
        cancel_url: required("PAYHERE_CANCEL_URL")?,
        notify_url: required("PAYHERE_NOTIFY_URL")?,
        currency: optional("PAYHERE_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
    };

    let sentiment = SentimentConfig {
        python_bin: optional("SENTIMENT_PYTHON_BIN")
            .unwrap_or_else(|| DEFAULT_PYTHON_BIN.to_string()),
        script_path: optional("SENTIMENT_SCRIPT_PATH")
            .unwrap_or_else(|| DEFAULT_SCRIPT_PATH.to_string()),
        timeout_secs: parse_or("SENTIMENT_TIMEOUT_SECS", DEFAULT_SENTIMENT_TIMEOUT_SECS)?,
    };

    Ok(DotEnvyConfig {
        server,
        database,
        auth,
        payhere,
        sentiment,
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(&stage_str).unwrap_or_default()
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{} is invalid", key))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} is invalid", key)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn set_env_vars() {
        unsafe {
            env::set_var("SERVER_PORT", "8080");
            env::set_var("SERVER_BODY_LIMIT", "10");
            env::set_var("SERVER_TIMEOUT", "30");
            env::set_var("DATABASE_URL", "postgres://localhost:5432/mcquiz");
            env::set_var("JWT_SECRET", "supersecretjwtsecretforunittesting123");
            env::set_var("PAYHERE_MERCHANT_ID", "1211149");
            env::set_var("PAYHERE_MERCHANT_SECRET", "merchant-secret");
            env::set_var("PAYHERE_RETURN_URL", "https://mcquiz.lk/payment/success");
            env::set_var("PAYHERE_CANCEL_URL", "https://mcquiz.lk/payment/cancel");
            env::set_var("PAYHERE_NOTIFY_URL", "https://api.mcquiz.lk/api/v1/payments/notify");
            env::remove_var("PAYHERE_CURRENCY");
            env::remove_var("SENTIMENT_PYTHON_BIN");
            env::remove_var("SENTIMENT_SCRIPT_PATH");
            env::remove_var("SENTIMENT_TIMEOUT_SECS");
            env::remove_var("DATABASE_MAX_CONNECTIONS");
            env::remove_var("DATABASE_CONNECT_TIMEOUT_SECS");
        }
    }

    #[test]
    fn load_reads_required_vars_and_fills_defaults() {
        set_env_vars();

        let config = load().expect("config should load");

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.payhere.merchant_id, "1211149");
        assert_eq!(config.payhere.currency, "LKR");
        assert_eq!(config.sentiment.python_bin, "python3");
        assert_eq!(config.sentiment.script_path, "scripts/sentiment_analysis.py");
        assert_eq!(config.sentiment.timeout_secs, 10);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.connect_timeout_secs, 30);
    }
}
