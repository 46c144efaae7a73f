use anyhow::Result;
use clap::Parser;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "songbook")]
#[command(about = "Runs the songbook catalog service", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".songbook")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

#[derive(Debug, Deserialize, Clone)]
pub struct App {
    database: String,
    port: u16,
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

fn default_limit() -> u32 {
    10
}

impl App {
    pub fn get_db(&self) -> &str {
        &self.database
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Provider {
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub app: App,
    pub provider: Provider,
}

impl Config {
    pub fn new(path: &str) -> Result<Self> {
        let yaml_str = fs::read_to_string(path)?;
        Config::from_yaml(&yaml_str)
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        let yaml_with_env = Config::substitute_env_vars(yaml_str)?;
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config)
    }

    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            let Some(end) = result[actual_start..].find('}') else {
                break;
            };
            let var_name = &result[actual_start + 2..actual_start + end];

            // ${VAR:-default}
            let env_value = match var_name.split_once(":-") {
                Some((actual_var, default_val)) => {
                    env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
                }
                None => env::var(var_name).unwrap_or_else(|_| {
                    tracing::warn!(var = var_name, "environment variable not found");
                    String::new()
                }),
            };

            result.replace_range(actual_start..actual_start + end + 1, &env_value);
            offset = actual_start + env_value.len();
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_fields() {
        let cfg = Config::from_yaml(
            r#"
app:
  database: ":memory:"
  port: 8000
provider:
  base_url: http://localhost:8081
"#,
        )
        .unwrap();

        assert_eq!(cfg.app.get_db(), ":memory:");
        assert_eq!(cfg.app.get_port(), 8000);
        assert_eq!(cfg.app.default_limit, 10);
        assert_eq!(cfg.provider.base_url, "http://localhost:8081");
    }

    #[test]
    fn substitutes_defaults_for_unset_variables() {
        let cfg = Config::from_yaml(
            r#"
app:
  database: ${SONGBOOK_TEST_UNSET_DB:-songs.db}
  port: ${SONGBOOK_TEST_UNSET_PORT:-9000}
provider:
  base_url: ${SONGBOOK_TEST_UNSET_URL:-http://lyrics.local}
"#,
        )
        .unwrap();

        assert_eq!(cfg.app.get_db(), "songs.db");
        assert_eq!(cfg.app.get_port(), 9000);
        assert_eq!(cfg.provider.base_url, "http://lyrics.local");
    }

    #[test]
    fn missing_provider_section_is_an_error() {
        let result = Config::from_yaml("app:\n  database: a.db\n  port: 1\n");
        assert!(result.is_err());
    }
}
