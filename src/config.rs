use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Options for rendering matrices as text.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PrintConfig {
    /// Digits after the decimal point. `None` prints the shortest form that
    /// round-trips.
    pub precision: Option<usize>,
    /// Spaces before each row.
    pub indent: usize,
}

impl PrintConfig {
    pub fn new(precision: Option<usize>, indent: usize) -> Self {
        Self { precision, indent }
    }

    pub fn format_value(&self, value: f64) -> String {
        match self.precision {
            Some(digits) => format!("{:.*}", digits, value),
            None => value.to_string(),
        }
    }
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            precision: None,
            indent: 4,
        }
    }
}

/// Load a print configuration from a JSON file.
pub fn load_print_config<P: AsRef<Path>>(path: P) -> Result<PrintConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: PrintConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}
