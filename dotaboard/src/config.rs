use std::fs::File;
use std::path::Path;
use tracker::config::Config;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

pub fn load_from_file(path: &Path) -> Result<Config, ConfigError> {
    let file = File::open(path)?;
    let config = serde_yaml::from_reader(file)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp_file(s: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        write!(tmp, "{}", s).expect("write yaml");

        tmp
    }

    #[test]
    fn full_config() {
        let yaml = r#"
            listener:
                host: 0.0.0.0
                port: 8080
            upstream:
                base_url: https://api.opendota.com/api
                user_agent: dotaboard/0.1
            crawl:
                delay_ms: 500
                match_limit: 5
            freshness:
                threshold_minutes: 120
            sync_secret: dev-key
            roster: roster.yaml
            "#;
        let tmp = write_tmp_file(yaml);
        let config = load_from_file(tmp.path()).expect("load config");
        assert_eq!(config.listener.host, "0.0.0.0");
        assert_eq!(config.sync_secret, "dev-key");
        assert_eq!(config.crawl.delay_ms, 500);
    }

    #[test]
    fn missing_required_fields_fail() {
        let tmp = write_tmp_file("listener:\n  host: 127.0.0.1\n  port: 3000\n");
        assert!(load_from_file(tmp.path()).is_err());
    }
}
