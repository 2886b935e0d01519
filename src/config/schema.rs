use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::WeightsConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Starting weights; unset weights use the built-in defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<WeightsConfig>,

    /// Seed CSV; relative paths are resolved against the config file's directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<PathBuf>,

    /// Number of opportunities in the summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<usize>,
}
