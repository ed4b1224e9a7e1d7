//! Flat argument maps assembled from TOML files and `--set` overrides.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use nexus_randomizer_core::Args;
use serde::{Deserialize, Serialize};

/// Randomizer flavours selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Kind {
    /// Difficulty-ranked catalog levels.
    Atlas,
    /// The base game's own levels.
    Stock,
    /// Catalog levels clustered by theme into the historical 64-door layout.
    Affinity,
}

impl Kind {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Atlas => "atlas",
            Self::Stock => "stock",
            Self::Affinity => "affinity",
        }
    }

    /// Form defaults of the flavour; share codes omit arguments equal to these.
    pub(crate) const fn defaults(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Atlas | Self::Affinity => ATLAS_DEFAULTS,
            Self::Stock => STOCK_DEFAULTS,
        }
    }
}

const ATLAS_DEFAULTS: &[(&str, &str)] = &[
    ("min-ss", "5"),
    ("max-ss", ""),
    ("min-time", ""),
    ("max-time", "3:00.000"),
    ("cmp-filter", ""),
    ("daily-filter", ""),
    ("community-filter", ""),
    ("cw-filter", "n"),
    ("ccw-filter", "n"),
    ("clunky-filter", "n"),
    ("backwards-filter", "n"),
    ("apples-filter", ""),
    ("required-authors", ""),
    ("blocked-authors", ""),
    ("ss-users", ""),
    ("no-ss-users", ""),
    ("min-difficulty", "0"),
    ("max-difficulty", "1000"),
    ("hide-authors", ""),
    ("hide-names", ""),
    ("rand-doors", ""),
];

const STOCK_DEFAULTS: &[(&str, &str)] = &[
    ("builtin-filter", "y"),
    ("stock-filter", ""),
    ("forest-filter", ""),
    ("mansion-filter", ""),
    ("city-filter", ""),
    ("lab-filter", ""),
    ("tutorials-filter", ""),
    ("difficults-filter", ""),
    ("yotta-filter", "n"),
    ("old-tutorial-filter", "n"),
    ("devclip-filter", "n"),
    ("infini-filter", "n"),
    ("rand-doors", "normal"),
    ("hide-authors", ""),
    ("hide-names", ""),
];

/// Builds the argument map from an optional TOML file and `key=value` overrides.
///
/// The TOML file is a flat table; strings are taken as-is and numbers or
/// booleans are converted to their textual form.
pub(crate) fn collect_args(config: Option<&Path>, overrides: &[String]) -> Result<Args> {
    let mut args = Args::new();
    if let Some(path) = config {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let table: toml::Table = toml::from_str(&text)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        for (key, value) in table {
            let value = match value {
                toml::Value::String(text) => text,
                toml::Value::Integer(number) => number.to_string(),
                toml::Value::Float(number) => number.to_string(),
                toml::Value::Boolean(flag) => (if flag { "y" } else { "n" }).to_owned(),
                other => bail!("{}: '{key}' must be a plain value, got {other}", path.display()),
            };
            let _ = args.insert(key, value);
        }
    }

    for pair in overrides {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("override '{pair}' is not of the form key=value"))?;
        let _ = args.insert(key.trim().to_owned(), value.to_owned());
    }
    Ok(args)
}

/// Arguments that differ from the flavour's defaults.
pub(crate) fn non_default_args(kind: Kind, args: &Args) -> Args {
    args.iter()
        .filter(|(key, value)| {
            kind.defaults()
                .iter()
                .find(|(default_key, _)| default_key == key)
                .map_or(true, |(_, default)| default != value)
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_the_config_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("weekly.toml");
        fs::write(&path, "min-ss = 10\nmax-time = \"2:00\"\ncw-filter = true\n").expect("write");

        let overrides = vec!["min-ss=20".to_owned(), "blocked-authors=a, b".to_owned()];
        let args = collect_args(Some(&path), &overrides).expect("args");
        assert_eq!(args["min-ss"], "20");
        assert_eq!(args["max-time"], "2:00");
        assert_eq!(args["cw-filter"], "y");
        assert_eq!(args["blocked-authors"], "a, b");
    }

    #[test]
    fn malformed_overrides_are_rejected() {
        assert!(collect_args(None, &["min-ss".to_owned()]).is_err());
    }

    #[test]
    fn defaults_are_dropped_from_share_arguments() {
        let mut args = Args::new();
        let _ = args.insert("min-ss".to_owned(), "5".to_owned());
        let _ = args.insert("max-ss".to_owned(), "40".to_owned());
        let _ = args.insert("num-levels".to_owned(), "12".to_owned());
        let kept = non_default_args(Kind::Atlas, &args);
        assert_eq!(kept.keys().map(String::as_str).collect::<Vec<_>>(), ["max-ss", "num-levels"]);
    }
}
