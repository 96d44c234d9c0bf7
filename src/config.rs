use crate::error::{BfResult, BindForgeError};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub loss: LossWeights,
    #[command(flatten)]
    pub tree: TreeParams,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    clap::ValueEnum,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    Random,
    Tree,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    #[arg(long, value_enum, default_value_t = SolverKind::Tree)]
    pub solver: SolverKind,
    #[arg(long, default_value_t = 10_000)]
    pub iterations: usize,
    /// Wall-clock budget in seconds; overrides `iterations` when set.
    #[arg(long)]
    pub time_secs: Option<u64>,
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            solver: SolverKind::Tree,
            iterations: 10_000,
            time_secs: None,
            seed: None,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LossWeights {
    #[arg(long, default_value_t = 1.0)]
    pub individual_coefficient: f64,
    #[arg(long, default_value_t = 1.0)]
    pub combination_coefficient: f64,

    // Per-node additive offsets on the individual term, comma separated.
    // Empty disables the term.
    #[arg(long, default_value = "")]
    pub node_preference: String,
}

impl Default for LossWeights {
    fn default() -> Self {
        Self {
            individual_coefficient: 1.0,
            combination_coefficient: 1.0,
            node_preference: String::new(),
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    #[arg(long, default_value_t = 0.01)]
    pub uct_epsilon: f64,
    #[arg(long, default_value_t = 1.0)]
    pub exploration: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            uct_epsilon: 0.01,
            exploration: 1.0,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> BfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overwrites fields with values the user typed explicitly on the command line.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(search.solver);
        update_if_present!(search.iterations);
        update_if_present!(search.time_secs);
        update_if_present!(search.seed);

        update_if_present!(loss.individual_coefficient);
        update_if_present!(loss.combination_coefficient);
        update_if_present!(loss.node_preference);

        update_if_present!(tree.uct_epsilon);
        update_if_present!(tree.exploration);
    }
}

impl LossWeights {
    pub fn get_node_preference(&self) -> BfResult<Option<Vec<f64>>> {
        let s = self.node_preference.trim();
        if s.is_empty() {
            return Ok(None);
        }
        s.split(',')
            .map(|p| {
                match p.trim().parse::<f64>() {
                    Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
                    _ => Err(BindForgeError::Config(format!(
                        "Invalid number '{}' in node_preference",
                        p
                    ))),
                }
            })
            .collect::<BfResult<Vec<f64>>>()
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_defaults_match_reference_loss() {
        let cfg = Config::default();
        assert_eq!(cfg.loss.individual_coefficient, 1.0);
        assert_eq!(cfg.loss.combination_coefficient, 1.0);
        assert_eq!(cfg.tree.uct_epsilon, 0.01);
        assert_eq!(cfg.search.solver, SolverKind::Tree);
        assert!(cfg.loss.get_node_preference().unwrap().is_none());
    }

    #[test]
    fn test_node_preference_parsing() {
        let weights = LossWeights {
            node_preference: "0.5, 1,2.25".to_string(),
            ..Default::default()
        };
        assert_eq!(
            weights.get_node_preference().unwrap(),
            Some(vec![0.5, 1.0, 2.25])
        );

        let bad = LossWeights {
            node_preference: "1,x".to_string(),
            ..Default::default()
        };
        assert!(bad.get_node_preference().is_err());

        for bad in ["nan,1", "1,-0.5", "inf"] {
            let weights = LossWeights {
                node_preference: bad.to_string(),
                ..Default::default()
            };
            assert!(weights.get_node_preference().is_err(), "{}", bad);
        }
    }

    #[test]
    fn test_solver_kind_strings() {
        assert_eq!(SolverKind::from_str("random").unwrap(), SolverKind::Random);
        assert_eq!(SolverKind::Tree.to_string(), "tree");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: Config =
            serde_json::from_str(r#"{ "search": { "solver": "random", "iterations": 42 } }"#)
                .unwrap();
        assert_eq!(cfg.search.solver, SolverKind::Random);
        assert_eq!(cfg.search.iterations, 42);
        assert_eq!(cfg.tree.exploration, 1.0);
    }
}
