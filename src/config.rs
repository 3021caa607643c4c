use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "prompt-gateway")]
#[command(about = "Rate limited proxy that turns a prompt form into LLM generated text")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    // Rate limit max requests per window
    #[arg(long, env = "RATE_LIMIT_MAX", default_value_t = 10)]
    pub rate_limit: u32,

    // Rate limit window in milliseconds
    #[arg(long, env = "RATE_LIMIT_WINDOW_MS", default_value_t = 60_000)]
    pub rate_window_ms: u64,

    // How often expired rate limit entries are swept
    #[arg(long, env = "RATE_LIMIT_SWEEP_SECS", default_value_t = 60)]
    pub sweep_interval_secs: u64,

    // Key clients by the first X-Forwarded-For entry (only behind a trusted proxy)
    #[arg(long, env = "TRUST_FORWARDED_FOR")]
    pub trust_forwarded_for: bool,

    // Inference provider
    #[arg(long, env = "CLOUDFLARE_API_BASE", default_value = "https://api.cloudflare.com/client/v4")]
    pub api_base: String,

    #[arg(long, env = "CLOUDFLARE_ACCOUNT_ID")]
    pub account_id: String,

    #[arg(long, env = "CLOUDFLARE_API_TOKEN", hide_env_values = true)]
    pub api_token: String,

    #[arg(long, env = "AI_MODEL", default_value = "@cf/meta/llama-2-7b-chat-int8")]
    pub model: String,

    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 30)]
    pub upstream_timeout_secs: u64,

    // Analytics forwarding is disabled without a key
    #[arg(long, env = "POSTHOG_API_KEY", hide_env_values = true)]
    pub posthog_api_key: Option<String>,

    #[arg(long, env = "POSTHOG_URL", default_value = "https://app.posthog.com/capture/")]
    pub posthog_url: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "pretty")]
    pub log_format: LogFormat,
}
