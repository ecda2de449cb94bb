//! Configuration for loading records and building the index.
use crate::compute::validation::MAX_GEOHASH_PRECISION;
use crate::index::DEFAULT_GEOHASH_PRECISION;
use serde::de::Error;
use std::path::PathBuf;
use std::time::Duration;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Geohash length used for every indexed record
    #[serde(default = "Config::default_geohash_precision")]
    pub geohash_precision: usize,

    /// JSON file holding the record array
    #[serde(default = "Config::default_data_path")]
    pub data_path: PathBuf,

    /// Give up on the initial load after this many seconds
    #[serde(default)]
    pub load_timeout_secs: Option<u64>,
}

impl Config {
    const fn default_geohash_precision() -> usize {
        DEFAULT_GEOHASH_PRECISION
    }

    fn default_data_path() -> PathBuf {
        PathBuf::from("Data").join("geocity.json")
    }

    pub fn with_geohash_precision(mut self, precision: usize) -> Self {
        assert!(
            (1..=MAX_GEOHASH_PRECISION).contains(&precision),
            "Geohash precision must be between 1 and {}",
            MAX_GEOHASH_PRECISION
        );
        self.geohash_precision = precision;
        self
    }

    pub fn with_data_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.data_path = path.into();
        self
    }

    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        if timeout > Duration::from_secs(600) {
            log::warn!(
                "Load timeout of {:?} is very long; requests wait this long before failing",
                timeout
            );
        }
        self.load_timeout_secs = Some(timeout.as_secs().max(1));
        self
    }

    pub fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_GEOHASH_PRECISION).contains(&self.geohash_precision) {
            return Err(format!(
                "Geohash precision must be between 1 and {}, got {}",
                MAX_GEOHASH_PRECISION, self.geohash_precision
            ));
        }

        if let Some(secs) = self.load_timeout_secs
            && secs == 0
        {
            return Err("Load timeout must be greater than zero".to_string());
        }

        if self.data_path.as_os_str().is_empty() {
            return Err("Data path must not be empty".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geohash_precision: Self::default_geohash_precision(),
            data_path: Self::default_data_path(),
            load_timeout_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.geohash_precision, 9);
        assert_eq!(config.data_path, PathBuf::from("Data").join("geocity.json"));
        assert!(config.load_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default()
            .with_geohash_precision(7)
            .with_data_path("/srv/cities.json")
            .with_load_timeout(Duration::from_secs(30));

        let json = config.to_json().unwrap();
        let deserialized = Config::from_json(&json).unwrap();

        assert_eq!(deserialized, config);
        assert_eq!(deserialized.load_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config = Config::from_json(r#"{"geohash_precision": 6}"#).unwrap();
        assert_eq!(config.geohash_precision, 6);
        assert_eq!(config.data_path, Config::default().data_path);
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        assert!(Config::from_json(r#"{"precision": 6}"#).is_err());
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::from_json(r#"{"geohash_precision": 0}"#).is_err());
        assert!(Config::from_json(r#"{"geohash_precision": 13}"#).is_err());
        assert!(Config::from_json(r#"{"load_timeout_secs": 0}"#).is_err());
    }

    #[test]
    #[should_panic(expected = "Geohash precision")]
    fn test_with_geohash_precision_panics_out_of_range() {
        let _ = Config::default().with_geohash_precision(20);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_config_toml_round_trip() {
        let config = Config::default().with_geohash_precision(8);
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }
}
