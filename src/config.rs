use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB v3 API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL prepended to poster and backdrop paths
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Base URL prepended to cast profile paths
    #[serde(default = "default_tmdb_profile_url")]
    pub tmdb_profile_url: String,

    /// Language tag sent with every TMDB request
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Gemini API key. Empty means recommendations run on the fallback dataset.
    #[serde(default)]
    pub gemini_api_key: String,

    /// Gemini API base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Gemini model name
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Redis connection URL for bookmarks. Bookmarks stay in memory when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Storage key holding the serialized bookmark list
    #[serde(default = "default_bookmarks_key")]
    pub bookmarks_key: String,

    /// Optional JSON file replacing the built-in embed server table
    #[serde(default)]
    pub embed_servers_file: Option<String>,

    /// Minimum time the player spends in the connecting phase
    #[serde(default = "default_connecting_delay_ms")]
    pub connecting_delay_ms: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/original".to_string()
}

fn default_tmdb_profile_url() -> String {
    "https://image.tmdb.org/t/p/w185".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_bookmarks_key() -> String {
    "streamai-mylist".to_string()
}

fn default_connecting_delay_ms() -> u64 {
    2000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn connecting_delay(&self) -> Duration {
        Duration::from_millis(self.connecting_delay_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_optional_keys() {
        let vars = vec![("TMDB_API_KEY".to_string(), "abc".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.tmdb_api_key, "abc");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb_language, "en-US");
        assert_eq!(config.gemini_api_key, "");
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert_eq!(config.redis_url, None);
        assert_eq!(config.bookmarks_key, "streamai-mylist");
        assert_eq!(config.connecting_delay(), Duration::from_secs(2));
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_missing_tmdb_key_is_rejected() {
        let vars: Vec<(String, String)> = vec![];
        assert!(envy::from_iter::<_, Config>(vars).is_err());
    }

    #[test]
    fn test_overrides_are_read() {
        let vars = vec![
            ("TMDB_API_KEY".to_string(), "abc".to_string()),
            ("REDIS_URL".to_string(), "redis://cache:6379".to_string()),
            ("CONNECTING_DELAY_MS".to_string(), "250".to_string()),
            ("PORT".to_string(), "8080".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.connecting_delay(), Duration::from_millis(250));
        assert_eq!(config.port, 8080);
    }
}
