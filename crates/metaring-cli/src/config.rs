//! TOML configuration deserialisation for simulation jobs.

use metaring_geometry::structure::Structure;
use serde::Deserialize;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub structure: Structure,
    #[serde(default)]
    pub drive: DriveConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// External drive specification.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Field direction (normalised by the solver).
    pub direction: [f64; 3],
    /// Field amplitude (T).
    pub amplitude: f64,
    /// Frequencies to solve at; defaults to the structure's own frequency.
    pub frequencies: Option<FrequencySpec>,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            direction: [0.0, 0.0, 1.0],
            amplitude: 1.0e-6,
            frequencies: None,
        }
    }
}

/// Frequency specification: either a linear range or an explicit list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FrequencySpec {
    Range { range: [f64; 2], points: usize },
    List { values: Vec<f64> },
}

impl FrequencySpec {
    pub fn expand(&self) -> Vec<f64> {
        match self {
            FrequencySpec::Range { range, points } => {
                let [start, end] = *range;
                (0..*points)
                    .map(|i| start + (end - start) * i as f64 / (*points - 1).max(1) as f64)
                    .collect()
            }
            FrequencySpec::List { values } => values.clone(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory.
    pub directory: String,
    /// Write per-ring currents at the peak-response frequency as CSV.
    pub save_currents: bool,
    /// Write the solution artifact as a NumPy `.npz` archive.
    pub save_solution: bool,
    /// Export lattice vertices/edges as CSV for external viewers.
    pub save_geometry: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "./output".into(),
            save_currents: true,
            save_solution: false,
            save_geometry: false,
        }
    }
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: JobConfig = toml::from_str(&content)?;
    Ok(config)
}
