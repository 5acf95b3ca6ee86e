//! Options shared by the play and match commands

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Args};

use wargame_core::{HeuristicKind, RuleSet, SearchConfig};

#[derive(Args, Clone, Debug)]
pub struct SearchArgs {
    /// Deepest search in plies
    #[arg(long, default_value = "4")]
    pub max_depth: u32,

    /// Seconds the AI may think per move
    #[arg(long, default_value = "5.0")]
    pub max_time: f64,

    /// Prune with alpha-beta (`--alpha-beta false` for plain minimax)
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub alpha_beta: bool,

    /// Evaluation: e0 (material), e1 (material + health), e2 (threat aware)
    #[arg(long, default_value = "e2")]
    pub heuristic: HeuristicKind,
}

impl SearchArgs {
    /// Build the search configuration; a seed turns on root shuffling
    pub fn to_config(&self, seed: Option<u64>) -> Result<SearchConfig> {
        let budget = Duration::try_from_secs_f64(self.max_time)
            .with_context(|| format!("invalid --max-time: {}", self.max_time))?;

        let mut config = SearchConfig {
            max_depth: self.max_depth,
            time_budget: Some(budget),
            alpha_beta: self.alpha_beta,
            heuristic: self.heuristic,
            ..Default::default()
        };
        if let Some(seed) = seed {
            config = config.with_seed(seed);
        }
        config.validate()?;
        Ok(config)
    }
}

/// Rule set from a JSON file, or the standard 5x5 game
pub fn load_rules(path: Option<&Path>, max_turns: Option<u32>) -> Result<RuleSet> {
    let mut rules = match path {
        Some(path) => RuleSet::load(path)
            .with_context(|| format!("Failed to load rule set: {}", path.display()))?,
        None => RuleSet::default(),
    };
    if let Some(max_turns) = max_turns {
        rules = rules.with_max_turns(max_turns);
    }
    rules.validate()?;
    Ok(rules)
}
