//! Command-line parsing shared by `tui-merge` and `merge-sim`.
//!
//! Flags are few and fixed, so they are parsed by hand.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;

use crate::core::GameConfig;

/// Flags accepted by the interactive binary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TuiArgs {
    pub config: Option<PathBuf>,
    pub log: Option<PathBuf>,
    pub seed: Option<u32>,
}

/// One scripted drop: a column and optionally the value to drop there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropSpec {
    pub column: usize,
    pub value: Option<u32>,
}

impl DropSpec {
    /// Parse `col` or `col:value`.
    pub fn parse(s: &str) -> Result<Self> {
        let (column, value) = match s.split_once(':') {
            Some((column, value)) => (column, Some(value)),
            None => (s, None),
        };
        let column = column
            .parse()
            .map_err(|_| anyhow!("invalid column in drop {s:?}"))?;
        let value = value
            .map(|v| v.parse().map_err(|_| anyhow!("invalid value in drop {s:?}")))
            .transpose()?;
        Ok(Self { column, value })
    }
}

/// Flags and drops accepted by the headless runner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimArgs {
    pub config: Option<PathBuf>,
    pub seed: Option<u32>,
    pub drops: Vec<DropSpec>,
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing value for {flag}"))
}

fn parse_seed(value: &str) -> Result<u32> {
    value
        .parse()
        .map_err(|_| anyhow!("invalid --seed value: {value}"))
}

/// Parse the arguments after the program name.
pub fn parse_tui_args(args: &[String]) -> Result<TuiArgs> {
    let mut out = TuiArgs::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                out.config = Some(flag_value(args, i, "--config")?.into());
            }
            "--log" => {
                i += 1;
                out.log = Some(flag_value(args, i, "--log")?.into());
            }
            "--seed" => {
                i += 1;
                out.seed = Some(parse_seed(flag_value(args, i, "--seed")?)?);
            }
            other => bail!("unknown argument: {other}"),
        }
        i += 1;
    }
    Ok(out)
}

/// Parse the arguments after the program name.
pub fn parse_sim_args(args: &[String]) -> Result<SimArgs> {
    let mut out = SimArgs::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                out.config = Some(flag_value(args, i, "--config")?.into());
            }
            "--seed" => {
                i += 1;
                out.seed = Some(parse_seed(flag_value(args, i, "--seed")?)?);
            }
            other if other.starts_with("--") => bail!("unknown argument: {other}"),
            drop => out.drops.push(DropSpec::parse(drop)?),
        }
        i += 1;
    }
    Ok(out)
}

/// Load the config file if given (defaults otherwise), then apply `seed`.
pub fn load_config(path: Option<&Path>, seed: Option<u32>) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => {
            let config = GameConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?;
            info!(path = %path.display(), "config loaded");
            config
        }
        None => GameConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tui_args() {
        let parsed = parse_tui_args(&args(&["--seed", "7", "--log", "game.log"])).unwrap();
        assert_eq!(parsed.seed, Some(7));
        assert_eq!(parsed.log, Some(PathBuf::from("game.log")));
        assert_eq!(parsed.config, None);
    }

    #[test]
    fn test_tui_args_errors() {
        assert!(parse_tui_args(&args(&["--seed"])).is_err());
        assert!(parse_tui_args(&args(&["--seed", "-1"])).is_err());
        assert!(parse_tui_args(&args(&["--fast"])).is_err());
    }

    #[test]
    fn test_sim_args_collect_drops() {
        let parsed = parse_sim_args(&args(&["--seed", "3", "0", "1:8", "2"])).unwrap();
        assert_eq!(parsed.seed, Some(3));
        assert_eq!(
            parsed.drops,
            vec![
                DropSpec { column: 0, value: None },
                DropSpec { column: 1, value: Some(8) },
                DropSpec { column: 2, value: None },
            ]
        );
    }

    #[test]
    fn test_bad_drops_are_rejected() {
        assert!(DropSpec::parse("x").is_err());
        assert!(DropSpec::parse("1:").is_err());
        assert!(DropSpec::parse("-1").is_err());
        assert!(parse_sim_args(&args(&["--verbose"])).is_err());
    }

    #[test]
    fn test_seed_overrides_default_config() {
        let config = load_config(None, Some(99)).unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.columns, 4);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/merge.json")), None).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/merge.json"));
    }
}
