use clap::{Args, Parser, ValueEnum};
use ipnetwork::IpNetwork;

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Database connection URL
    #[arg(long, env = "TASKBAZAAR_DATABASE_URL")]
    pub database_url: String,

    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub auth: AuthConfig,

    #[command(flatten)]
    pub rate_limit: RateLimitConfig,

    #[command(flatten)]
    pub pagination: PaginationConfig,

    #[command(flatten)]
    pub messaging: MessagingConfig,

    #[command(flatten)]
    pub websocket: WsConfig,

    #[command(flatten)]
    pub cache: CacheConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "TASKBAZAAR_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "TASKBAZAAR_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Port for the management server (health probes)
    #[arg(long, env = "TASKBAZAAR_MGMT_PORT", default_value_t = 3001)]
    pub mgmt_port: u16,

    /// Comma-separated list of CIDRs to trust for X-Forwarded-For IP extraction
    #[arg(
        long,
        env = "TASKBAZAAR_TRUSTED_PROXIES",
        default_value = "10.0.0.0/8,172.16.0.0/12,192.168.0.0/16,127.0.0.1/32",
        value_delimiter = ','
    )]
    pub trusted_proxies: Vec<IpNetwork>,

    /// How long to wait for in-flight work during shutdown
    #[arg(long, env = "TASKBAZAAR_SHUTDOWN_TIMEOUT_SECS", default_value_t = 10)]
    pub shutdown_timeout_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct AuthConfig {
    /// Secret key for JWT verification
    #[arg(long, env = "TASKBAZAAR_JWT_SECRET")]
    pub jwt_secret: String,
}

#[derive(Clone, Debug, Args)]
pub struct RateLimitConfig {
    /// Requests per second allowed per client IP
    #[arg(long, env = "TASKBAZAAR_RATE_LIMIT_PER_SECOND", default_value_t = 50)]
    pub per_second: u32,

    /// Burst allowance per client IP
    #[arg(long, env = "TASKBAZAAR_RATE_LIMIT_BURST", default_value_t = 100)]
    pub burst: u32,
}

#[derive(Clone, Debug, Args)]
pub struct PaginationConfig {
    /// Page size used when the client does not pass one
    #[arg(long, env = "TASKBAZAAR_DEFAULT_PAGE_SIZE", default_value_t = 20)]
    pub default_limit: i64,

    /// Hard cap on the page size a client may request
    #[arg(long, env = "TASKBAZAAR_MAX_PAGE_SIZE", default_value_t = 100)]
    pub max_limit: i64,
}

#[derive(Clone, Debug, Args)]
pub struct MessagingConfig {
    /// Maximum message content length in characters
    #[arg(long, env = "TASKBAZAAR_MAX_MESSAGE_LENGTH", default_value_t = 4000)]
    pub max_content_length: usize,

    /// Maximum number of message ids accepted by a single read receipt
    #[arg(long, env = "TASKBAZAAR_MAX_READ_BATCH", default_value_t = 500)]
    pub max_read_batch: usize,
}

#[derive(Clone, Debug, Args)]
pub struct WsConfig {
    /// Size of the per-session outbound event buffer
    #[arg(long, env = "TASKBAZAAR_WS_OUTBOUND_BUFFER_SIZE", default_value_t = 64)]
    pub outbound_buffer_size: usize,

    /// Capacity of each user/room broadcast channel
    #[arg(long, env = "TASKBAZAAR_WS_CHANNEL_CAPACITY", default_value_t = 32)]
    pub channel_capacity: usize,

    /// How often to reclaim broadcast channels with no subscribers
    #[arg(long, env = "TASKBAZAAR_WS_GC_INTERVAL_SECS", default_value_t = 60)]
    pub gc_interval_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct CacheConfig {
    /// Redis connection URL for the read-through cache
    #[arg(long, env = "TASKBAZAAR_CACHE_URL", default_value = "redis://127.0.0.1:6379")]
    pub url: String,

    /// Time-to-live for cached values in seconds
    #[arg(long, env = "TASKBAZAAR_CACHE_TTL_SECS", default_value_t = 60)]
    pub ttl_secs: u64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "TASKBAZAAR_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn load() -> Self {
        Self::parse()
    }
}
