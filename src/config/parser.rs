use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Missing sections and keys fall back to their defaults; the merged result
/// is validated before it is returned.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use problem_harvest::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// println!("Page size: {}", config.crawl.page_size);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is stored with each crawl run so runs made with different
/// settings can be told apart.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SinkKind;
    use crate::problem::DifficultyFilter;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[source]
base-url = "https://leetcode.com"
graphql-path = "/graphql"
landing-path = "/problemset/"

[crawl]
difficulty = "medium"
page-size = 50
page-delay-ms = 250
detail-delay-ms = 1000
request-timeout-secs = 20
bootstrap-timeout-secs = 5
max-problems = 30

[client]
user-agent = "TestAgent/1.0"

[output]
sink = "json"
json-dir = "./out"
placeholders = true
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawl.difficulty, DifficultyFilter::Medium);
        assert_eq!(config.crawl.page_size, 50);
        assert_eq!(config.crawl.max_problems, Some(30));
        assert_eq!(config.client.user_agent, "TestAgent/1.0");
        assert_eq!(config.output.sink, SinkKind::Json);
        assert!(config.output.placeholders);
        // Unset keys keep their defaults
        assert_eq!(config.output.database_path, "./db/problems.db");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.source.base_url, "https://leetcode.com");
        assert_eq!(config.crawl.difficulty, DifficultyFilter::Easy);
        assert_eq!(config.crawl.page_size, 100);
        assert_eq!(config.crawl.detail_delay_ms, 1500);
        assert_eq!(config.output.sink, SinkKind::Sqlite);
    }

    #[test]
    fn test_shipped_sample_config_is_valid() {
        let config = parse_config(include_str!("../../harvest.toml")).unwrap();
        assert_eq!(config.crawl.page_size, 100);
        assert_eq!(config.output.sink, SinkKind::Sqlite);
    }

    #[test]
    fn test_unknown_difficulty_is_a_parse_error() {
        let result = parse_config("[crawl]\ndifficulty = \"brutal\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/harvest.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawl]\npage-size = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
