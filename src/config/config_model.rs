#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub auth: AuthConfig,
    pub payhere: PayHereConfig,
    pub sentiment: SentimentConfig,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Merchant credentials and redirect targets for the PayHere hosted checkout.
#[derive(Debug, Clone)]
pub struct PayHereConfig {
    pub merchant_id: String,
    pub merchant_secret: String,
    pub return_url: String,
    pub cancel_url: String,
    pub notify_url: String,
    pub currency: String,
}

#[derive(Debug, Clone)]
pub struct SentimentConfig {
    pub python_bin: String,
    pub script_path: String,
    pub timeout_secs: u64,
}
