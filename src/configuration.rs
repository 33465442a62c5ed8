use serde_derive::{Deserialize, Serialize};

/// Ceilings for every search the engine runs. Hitting one is reported as rejection.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchBudget {
    pub regular_steps: usize,
    pub earley_steps: usize,
    pub rewrite_steps: usize,

    pub rewrite_length_factor: usize,
    pub rewrite_length_slack: usize,
    pub rewrite_length_floor: usize,

    pub enumeration_iterations: usize,
    pub enumeration_max_length: usize,

    pub completed_state_cap: usize,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            regular_steps: 10_000,
            earley_steps: 1_000_000,
            rewrite_steps: 5_000,
            rewrite_length_factor: 3,
            rewrite_length_slack: 50,
            rewrite_length_floor: 100,
            enumeration_iterations: 10_000,
            enumeration_max_length: 20,
            completed_state_cap: 30,
        }
    }
}

impl SearchBudget {
    /// Same budget with every step ceiling replaced by `steps`.
    pub fn with_step_limit(self, steps: usize) -> Self {
        Self {
            regular_steps: steps,
            earley_steps: steps,
            rewrite_steps: steps,
            enumeration_iterations: steps,
            ..self
        }
    }

    /// Longest sentential form the rewrite search keeps for a target of `target_len` symbols.
    pub fn rewrite_length_cap(&self, target_len: usize) -> usize {
        (self.rewrite_length_factor * target_len + self.rewrite_length_slack)
            .max(self.rewrite_length_floor)
    }
}

#[derive(Debug)]
pub enum ConfigReadError {
    ReadError(std::io::Error),
    ParseError(toml::de::Error),
}

pub fn parse_budget(content: &str) -> Result<SearchBudget, toml::de::Error> {
    toml::from_str::<SearchBudget>(content)
}

pub fn load_budget<P: AsRef<std::path::Path>>(path: P) -> Result<SearchBudget, ConfigReadError> {
    let config = std::fs::read_to_string(path).map_err(ConfigReadError::ReadError)?;

    parse_budget(&config).map_err(ConfigReadError::ParseError)
}
