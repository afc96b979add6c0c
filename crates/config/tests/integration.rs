//! Integration tests for config

#[cfg(test)]
mod tests {
    use lapse_config::*;
    use lapse_errors::{ConfigError, Error};
    use lapse_types::ClockKind;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for var in ["LAPSE_CLOCK", "LAPSE_ROLLUP", "LAPSE_LOG_FILTER", "LAPSE_LOG_JSON"] {
            std::env::remove_var(var);
        }
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[timer]
clock = "monotonic"
rollup_nested = true

[logging]
filter = "debug"
json = true
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.timer.clock, ClockKind::Monotonic);
        assert!(config.timer.rollup_nested);
        assert!(config.timer.emit_events);
        assert_eq!(config.logging.filter, "debug");
        assert!(config.logging.json);
    }

    #[tokio::test]
    async fn test_missing_sections_use_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[timer]\nemit_events = false").unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.timer.clock, ClockKind::System);
        assert!(!config.timer.rollup_nested);
        assert!(!config.timer.emit_events);
        assert_eq!(config.logging.filter, "warn,lapse_timer=info");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = Config::load_from_file(&path).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[timer]\nclock = \"sundial\"").unwrap();

        let err = Config::load_from_file(temp_file.path()).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ParseError { .. })));
    }

    #[tokio::test]
    async fn test_load_or_default_with_path() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[timer]\nrollup_nested = true").unwrap();

        let config = Config::load_or_default(Some(temp_file.path()))
            .await
            .unwrap();
        assert!(config.timer.rollup_nested);
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("LAPSE_CLOCK", "monotonic");
        std::env::set_var("LAPSE_ROLLUP", "yes");
        std::env::set_var("LAPSE_LOG_FILTER", "trace");
        std::env::set_var("LAPSE_LOG_JSON", "1");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.timer.clock, ClockKind::Monotonic);
        assert!(config.timer.rollup_nested);
        assert_eq!(config.logging.filter, "trace");
        assert!(config.logging.json);

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("LAPSE_ROLLUP", "maybe");

        let mut config = Config::default();
        let result = config.merge_env();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue { ref field, .. }))
                if field == "LAPSE_ROLLUP"
        ));

        clear_env();
    }

    #[test]
    fn test_init_tracing_twice_is_ok() {
        let config = LoggingConfig::default();
        assert!(init_tracing(&config).is_ok());
        assert!(init_tracing(&config).is_ok());
    }
}
