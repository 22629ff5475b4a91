use std::path::PathBuf;

use clap::Parser;
use crowdwatch_config::{Config, ConfigError, ConfigLoader};
use crowdwatch_simulation::SURGE_CROWD_SIZE;

#[derive(Parser, Debug)]
#[command(author, version, about = "Crowd density simulation runner", long_about = None)]
pub struct Args {
    /// Path to a JSON or TOML configuration file; defaults are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of people to simulate
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub crowd_size: Option<i64>,

    /// Stop after this many ticks
    #[arg(short, long)]
    pub ticks: Option<u64>,

    /// RNG seed for a reproducible run
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Use the high-density surge crowd size (ignored when --crowd-size is given)
    #[arg(long)]
    pub surge: bool,

    /// Attach a heat map to every published frame
    #[arg(long)]
    pub heat_map: bool,
}

impl Args {
    /// Loads the configured file (or defaults), applies command line
    /// overrides, and validates the result.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::from_file(path)?,
            None => Config::default(),
        };
        self.apply_overrides(&mut config);
        ConfigLoader::validate(&config)?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut Config) {
        let sim = &mut config.simulation;
        if let Some(size) = self.crowd_size {
            sim.crowd_size = size;
        } else if self.surge {
            sim.crowd_size = SURGE_CROWD_SIZE as i64;
        }
        if let Some(ticks) = self.ticks {
            sim.max_ticks = Some(ticks);
        }
        if let Some(seed) = self.seed {
            sim.seed = Some(seed);
        }
        if self.heat_map {
            sim.heat_map = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("crowdwatch-runner").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_arguments_gives_defaults() {
        let config = parse(&[]).load_config().unwrap();
        assert_eq!(config.simulation.crowd_size(), 150);
        assert_eq!(config.simulation.max_ticks, None);
        assert_eq!(config.simulation.seed, None);
    }

    #[test]
    fn surge_preset() {
        let config = parse(&["--surge"]).load_config().unwrap();
        assert_eq!(config.simulation.crowd_size(), SURGE_CROWD_SIZE);
    }

    #[test]
    fn explicit_size_beats_surge() {
        let config = parse(&["--surge", "-n", "12"]).load_config().unwrap();
        assert_eq!(config.simulation.crowd_size(), 12);
    }

    #[test]
    fn negative_size_means_empty_crowd() {
        let config = parse(&["--crowd-size", "-3"]).load_config().unwrap();
        assert_eq!(config.simulation.crowd_size(), 0);
    }

    #[test]
    fn overrides_apply_on_top_of_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{ "simulation": {{ "crowd_size": 80, "seed": 1, "frame_rate": 30 }} }}"#).unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let config = parse(&["-c", &path, "--seed", "5", "--ticks", "100", "--heat-map"])
            .load_config()
            .unwrap();
        assert_eq!(config.simulation.crowd_size(), 80);
        assert_eq!(config.simulation.frame_rate, 30);
        assert_eq!(config.simulation.seed, Some(5));
        assert_eq!(config.simulation.max_ticks, Some(100));
        assert!(config.simulation.heat_map);
    }

    #[test]
    fn invalid_file_config_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "[simulation]\nframe_rate = 0\n").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let result = parse(&["--config", &path]).load_config();
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn unknown_flag_is_a_parse_error() {
        assert!(Args::try_parse_from(["crowdwatch-runner", "--bogus"]).is_err());
    }
}
