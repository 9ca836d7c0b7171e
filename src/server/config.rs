use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    pub jwt_secret: String,

    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
struct PartialServerConfig {
    jwt_secret: Option<String>,
    listen_addr: Option<String>,
    frontend_url: Option<String>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_frontend_url() -> String {
    "http://localhost:5173".to_string()
}

impl ServerConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self, String> {
        dotenv::dotenv().ok();

        // 1. Load from file (optional)
        let file_config: PartialServerConfig = if let Some(path_str) = config_path {
            let path = Path::new(path_str);
            if path.exists() {
                let contents = fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read config file at {path:?}: {e}"))?;
                toml::from_str(&contents)
                    .map_err(|e| format!("Failed to parse TOML from config file at {path:?}: {e}"))?
            } else {
                PartialServerConfig::default()
            }
        } else {
            PartialServerConfig::default()
        };

        // 2. Load from environment variables
        let env_config: PartialServerConfig = envy::from_env::<PartialServerConfig>()
            .map_err(|e| format!("Failed to load config from environment: {e}"))?;

        // 3. Merge: environment overrides file
        let final_config = ServerConfig {
            jwt_secret: env_config
                .jwt_secret
                .or(file_config.jwt_secret)
                .ok_or("JWT_SECRET is required")?,
            listen_addr: env_config
                .listen_addr
                .or(file_config.listen_addr)
                .unwrap_or_else(default_listen_addr),
            frontend_url: env_config
                .frontend_url
                .or(file_config.frontend_url)
                .unwrap_or_else(default_frontend_url),
        };

        Ok(final_config)
    }
}
