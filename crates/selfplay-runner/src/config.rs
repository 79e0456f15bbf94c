use std::io::Read;

/// Self-play run settings, loaded from a TOML file.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Config {
    /// How many games to play.
    pub num_games: u32,
    /// Game `i` is seeded with `base_seed + i`, so runs replay exactly.
    #[serde(default = "defaults::base_seed")]
    pub base_seed: u64,
    /// Optional cap on effective moves per game; uncapped games play until
    /// the board is stuck.
    #[serde(default)]
    pub max_steps: Option<u64>,
    /// Optional worker count; unset means the rayon default.
    #[serde(default)]
    pub max_workers: Option<usize>,
    #[serde(default)]
    pub report: Report,
}

/// Where run results go.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
pub struct Report {
    /// JSONL output path; unset means results are only logged.
    #[serde(default)]
    pub results_file: Option<std::path::PathBuf>,
}

impl Config {
    pub fn from_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = std::fs::File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}

mod defaults {
    pub fn base_seed() -> u64 {
        42
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("num_games = 8").unwrap();
        assert_eq!(config.num_games, 8);
        assert_eq!(config.base_seed, 42);
        assert_eq!(config.max_steps, None);
        assert_eq!(config.max_workers, None);
        assert_eq!(config.report.results_file, None);
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            num_games = 100
            base_seed = 7
            max_steps = 5000
            max_workers = 4

            [report]
            results_file = "out/results.jsonl"
            "#,
        )
        .unwrap();
        assert_eq!(config.num_games, 100);
        assert_eq!(config.base_seed, 7);
        assert_eq!(config.max_steps, Some(5000));
        assert_eq!(config.max_workers, Some(4));
        assert_eq!(
            config.report.results_file,
            Some(std::path::PathBuf::from("out/results.jsonl"))
        );
    }

    #[test]
    fn test_num_games_is_required() {
        assert!(toml::from_str::<Config>("base_seed = 7").is_err());
    }
}
