//! Loading a [`PSOConfig`] from JSON or YAML.
//!
//! Missing keys take their default value, except that the hyperparameters
//! stay unset and are reported by name when the optimizer is built.

use std::path::Path;

use crate::PSOConfig;
use crate::error::Result;

impl PSOConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Read a config file; `.yaml` and `.yml` are parsed as YAML, anything
    /// else as JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            _ => Self::from_json_str(&text),
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoundsSpec, HyperparameterSet, Init, Optimizer, PSOError};
    use std::io::Write;

    #[test]
    fn test_json_with_defaults() {
        let cfg = PSOConfig::from_json_str(
            r#"{
                "n_particles": 8,
                "dims": 2,
                "bounds": {"lower": [-1.0, -1.0], "upper": [1.0, 1.0]},
                "hyperparameters": {"c1": 0.5, "c2": 0.3, "m": 0.9},
                "init": "latin_hypercube",
                "seed": 12
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.n_particles, 8);
        assert_eq!(
            cfg.bounds,
            Some(BoundsSpec {
                lower: vec![-1.0, -1.0],
                upper: vec![1.0, 1.0]
            })
        );
        assert_eq!(cfg.hyperparameters, HyperparameterSet::new(0.5, 0.3, 0.9));
        assert_eq!(cfg.init, Init::LatinHypercube);
        assert_eq!(cfg.seed, Some(12));
        assert_eq!(cfg.verbose, 1);
        assert!(cfg.parallel.enabled);
    }

    #[test]
    fn test_yaml_missing_momentum_is_reported() {
        let cfg = PSOConfig::from_yaml_str("n_particles: 4\nhyperparameters:\n  c1: 0.5\n  c2: 0.5\n")
            .unwrap();
        match Optimizer::new(&cfg) {
            Err(PSOError::MissingHyperparameter { name }) => assert_eq!(name, "m"),
            Err(e) => panic!("unexpected error {}", e),
            Ok(_) => panic!("construction should fail"),
        }
    }

    #[test]
    fn test_load_by_extension_and_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let original = crate::PSOConfigBuilder::new()
            .n_particles(5)
            .bounds(vec![0.0], vec![2.0])
            .c1(1.0)
            .c2(1.0)
            .m(0.5)
            .build();

        let json_path = dir.path().join("swarm.json");
        std::fs::write(&json_path, original.to_json_string().unwrap()).unwrap();
        assert_eq!(PSOConfig::load(&json_path).unwrap(), original);

        let yaml_path = dir.path().join("swarm.yml");
        let mut f = std::fs::File::create(&yaml_path).unwrap();
        writeln!(f, "n_particles: 5\ndims: 1\nbounds:\n  lower: [0.0]\n  upper: [2.0]").unwrap();
        writeln!(f, "hyperparameters:\n  c1: 1.0\n  c2: 1.0\n  m: 0.5").unwrap();
        assert_eq!(PSOConfig::load(&yaml_path).unwrap(), original);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            PSOConfig::load(dir.path().join("missing.json")),
            Err(PSOError::Io(_))
        ));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(PSOConfig::load(&bad), Err(PSOError::Json(_))));
    }
}
