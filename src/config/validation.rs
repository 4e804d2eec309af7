use crate::config::types::{ClientConfig, Config, CrawlConfig, OutputConfig, SinkKind, SourceConfig};
use crate::ConfigError;
use url::Url;

/// Largest page the listing endpoint is asked for
const MAX_PAGE_SIZE: u32 = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_crawl_config(&config.crawl)?;
    validate_client_config(&config.client)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the question bank location
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' has no host",
            config.base_url
        )));
    }

    for (name, path) in [
        ("graphql-path", &config.graphql_path),
        ("landing-path", &config.landing_path),
    ] {
        if !path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "{} must start with '/', got '{}'",
                name, path
            )));
        }
    }

    Ok(())
}

/// Validates crawl behavior settings
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.page_size < 1 || config.page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::Validation(format!(
            "page-size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, config.page_size
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be > 0".to_string(),
        ));
    }

    if config.bootstrap_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "bootstrap-timeout-secs must be > 0".to_string(),
        ));
    }

    if config.max_problems == Some(0) {
        return Err(ConfigError::Validation(
            "max-problems must be > 0 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates client identification
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates output configuration for the selected sink
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    match config.sink {
        SinkKind::Sqlite if config.database_path.is_empty() => Err(ConfigError::Validation(
            "database-path cannot be empty for the sqlite sink".to_string(),
        )),
        SinkKind::Json if config.json_dir.is_empty() => Err(ConfigError::Validation(
            "json-dir cannot be empty for the json sink".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_base_url() {
        let mut source = SourceConfig::default();
        source.base_url = "http://127.0.0.1:8080".to_string();
        assert!(validate_source_config(&source).is_ok());

        source.base_url = "ftp://example.com".to_string();
        assert!(matches!(
            validate_source_config(&source),
            Err(ConfigError::InvalidUrl(_))
        ));

        source.base_url = "not a url".to_string();
        assert!(validate_source_config(&source).is_err());
    }

    #[test]
    fn test_validate_paths() {
        let mut source = SourceConfig::default();
        source.graphql_path = "graphql".to_string();
        assert!(validate_source_config(&source).is_err());
    }

    #[test]
    fn test_validate_page_size_bounds() {
        let mut crawl = CrawlConfig::default();
        crawl.page_size = 0;
        assert!(validate_crawl_config(&crawl).is_err());

        crawl.page_size = MAX_PAGE_SIZE + 1;
        assert!(validate_crawl_config(&crawl).is_err());

        crawl.page_size = 1;
        assert!(validate_crawl_config(&crawl).is_ok());
    }

    #[test]
    fn test_zero_delays_are_allowed() {
        let mut crawl = CrawlConfig::default();
        crawl.page_delay_ms = 0;
        crawl.detail_delay_ms = 0;
        assert!(validate_crawl_config(&crawl).is_ok());
    }

    #[test]
    fn test_zero_timeouts_are_rejected() {
        let mut crawl = CrawlConfig::default();
        crawl.request_timeout_secs = 0;
        assert!(validate_crawl_config(&crawl).is_err());

        let mut crawl = CrawlConfig::default();
        crawl.bootstrap_timeout_secs = 0;
        assert!(validate_crawl_config(&crawl).is_err());
    }

    #[test]
    fn test_max_problems_must_be_positive() {
        let mut crawl = CrawlConfig::default();
        crawl.max_problems = Some(0);
        assert!(validate_crawl_config(&crawl).is_err());
    }

    #[test]
    fn test_validate_output_for_selected_sink() {
        let mut output = OutputConfig::default();
        output.sink = SinkKind::Json;
        output.database_path = String::new();
        assert!(validate_output_config(&output).is_ok());

        output.json_dir = String::new();
        assert!(validate_output_config(&output).is_err());

        output.sink = SinkKind::Memory;
        assert!(validate_output_config(&output).is_ok());
    }

    #[test]
    fn test_empty_user_agent() {
        let client = ClientConfig {
            user_agent: "  ".to_string(),
            ..ClientConfig::default()
        };
        assert!(validate_client_config(&client).is_err());
    }
}
