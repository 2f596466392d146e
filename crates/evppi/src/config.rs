//! Loading run configurations from YAML

use std::path::Path;

use color_eyre::eyre::{WrapErr, eyre};
use evppi_core::config::EvppiConfig;

/// Parse a configuration document; fields left out take their defaults
pub fn config_from_yaml(yaml: &str) -> color_eyre::Result<EvppiConfig> {
    serde_saphyr::from_str(yaml).map_err(|e| eyre!("Failed to parse configuration: {e}"))
}

pub fn config_to_yaml(config: &EvppiConfig) -> color_eyre::Result<String> {
    serde_saphyr::to_string(config).map_err(|e| eyre!("Failed to serialize configuration: {e}"))
}

/// Load the configuration at `path`, or the built-in example when there is none
pub fn load_config(path: Option<&Path>) -> color_eyre::Result<EvppiConfig> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using built-in example");
        return Ok(EvppiConfig::default());
    };

    let yaml = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read configuration {}", path.display()))?;
    let config = config_from_yaml(&yaml)
        .wrap_err_with(|| format!("Invalid configuration {}", path.display()))?;
    tracing::info!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evppi_core::model::{Distribution, DoseResponseCurve};
    use evppi_core::smoothing::{BinnedMeans, SmootherConfig};
    use tempfile::tempdir;

    const EXAMPLE: &str = r#"
baseline_burden: 20000.0
n_samples: 500
seed: 7
parameters:
  - name: background_pm25
    distribution:
      type: LogNormal
      mean: 12.0
      variance: 9.0
  - name: car_fraction
    distribution:
      type: Beta
      alpha: 2.0
      beta: 6.0
  - name: dose_response_scale
    distribution:
      type: Fixed
      value: 1.1
scenarios:
  - name: halve
    travel_multiplier: 0.5
dose_response:
  type: LogLinear
  coefficient: 0.006
smoother:
  type: BinnedMeans
  bins: 20
"#;

    #[test]
    fn test_parse_full_document() {
        let config = config_from_yaml(EXAMPLE).unwrap();

        assert_eq!(config.baseline_burden, 20_000.0);
        assert_eq!(config.n_samples, 500);
        assert_eq!(config.seed, 7);
        assert_eq!(
            config.parameters[0].distribution,
            Distribution::LogNormal {
                mean: 12.0,
                variance: 9.0
            }
        );
        assert_eq!(
            config.parameters[2].distribution,
            Distribution::Fixed { value: 1.1 }
        );
        assert_eq!(
            config.dose_response,
            DoseResponseCurve::LogLinear { coefficient: 0.006 }
        );
        assert_eq!(
            config.smoother,
            SmootherConfig::BinnedMeans(BinnedMeans { bins: 20 })
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = config_from_yaml("n_samples: 64\n").unwrap();
        let default = EvppiConfig::default();

        assert_eq!(config.n_samples, 64);
        assert_eq!(config.parameters, default.parameters);
        assert_eq!(config.smoother, default.smoother);
    }

    #[test]
    fn test_default_config_round_trips() {
        let default = EvppiConfig::default();
        let yaml = config_to_yaml(&default).unwrap();
        assert_eq!(config_from_yaml(&yaml).unwrap(), default);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.yaml");
        std::fs::write(&path, EXAMPLE).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.scenarios[0].name, "halve");
        assert_eq!(load_config(None).unwrap(), EvppiConfig::default());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.yaml"))).is_err());
    }
}
