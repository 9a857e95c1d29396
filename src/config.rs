use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        wiki_api_url: get_env_or_default("WIKI_API_URL", DEFAULT_WIKI_API_URL),
        bind_addr: get_env_or_default("BIND_ADDR", "127.0.0.1:3000"),
        static_dir: get_env_or_default("STATIC_DIR", "static"),
        user_agent: get_env_or_default("WIKI_USER_AGENT", DEFAULT_USER_AGENT),
    }
});

pub const DEFAULT_WIKI_API_URL: &str = "https://en.wikipedia.org/w/api.php";
pub const DEFAULT_USER_AGENT: &str = concat!("wikisearch/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct Config {
    pub wiki_api_url: String,
    pub bind_addr: String,
    pub static_dir: String,
    pub user_agent: String,
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
