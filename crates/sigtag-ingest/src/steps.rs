//! Step configuration: which tags to plot for each step.
//!
//! ```json
//! {
//!   "time_column": "Date",
//!   "steps": [
//!     { "name": "fill", "tags": ["PUMP_01", "TEMP_01"] },
//!     { "tags": ["VLV_01"] }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

pub const DEFAULT_TIME_COLUMN: &str = "Date";

fn default_time_column() -> Option<String> {
    Some(DEFAULT_TIME_COLUMN.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepConfig {
    /// Column excluded from the multi-source intersection and always
    /// extracted; `null` disables it.
    #[serde(default = "default_time_column")]
    pub time_column: Option<String>,
    #[serde(default)]
    pub steps: Vec<StepSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSpec {
    #[serde(default)]
    pub name: Option<String>,
    pub tags: Vec<String>,
}

impl StepConfig {
    /// Step name, falling back to `step01`, `step02`, ...
    pub fn step_name(&self, index: usize) -> String {
        self.steps
            .get(index)
            .and_then(|step| step.name.clone())
            .unwrap_or_else(|| format!("step{:02}", index + 1))
    }
}

pub fn parse_step_config(text: &str) -> serde_json::Result<StepConfig> {
    serde_json::from_str(text)
}

pub fn load_step_config(path: &Path) -> Result<StepConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_step_config(&text).map_err(|source| IngestError::StepConfig {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let config = parse_step_config(r#"{"steps": [{"tags": ["A"]}, {"name": "x", "tags": []}]}"#)
            .expect("parse");
        assert_eq!(config.time_column.as_deref(), Some("Date"));
        assert_eq!(config.step_name(0), "step01");
        assert_eq!(config.step_name(1), "x");
    }

    #[test]
    fn null_time_column_disables_it() {
        let config = parse_step_config(r#"{"time_column": null}"#).expect("parse");
        assert_eq!(config.time_column, None);
        assert!(config.steps.is_empty());
    }
}
