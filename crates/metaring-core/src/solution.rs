//! Solution artifact persistence.
//!
//! Bundles the solved current vector with the frequencies and the parameter
//! set that produced it, and round-trips through a NumPy `.npz` archive so
//! the arrays come back bit-for-bit and stay readable from Python tooling.
//!
//! Archive layout: `currents_re`/`currents_im` (f64, length N), an optional
//! `frequencies` array, and one `param.<key>` single-element array per
//! recorded parameter.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use ndarray::Array1;
use ndarray_npy::{NpzReader, NpzWriter};
use num_complex::Complex64;

use crate::error::{ModelError, ModelResult};

const PARAM_PREFIX: &str = "param.";

/// A persisted solve result: currents plus optional run metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Solved complex ring currents (A).
    pub currents: Array1<Complex64>,
    /// Frequencies the currents correspond to (Hz), if recorded.
    pub frequencies: Option<Vec<f64>>,
    /// Parameter set that produced the solve, if recorded.
    pub parameters: Option<BTreeMap<String, f64>>,
}

impl Solution {
    pub fn new(currents: Array1<Complex64>) -> Self {
        Self {
            currents,
            frequencies: None,
            parameters: None,
        }
    }

    /// Write the artifact to `path` as an `.npz` archive.
    pub fn save(&self, path: &Path) -> ModelResult<()> {
        let mut npz = NpzWriter::new(File::create(path)?);
        npz.add_array("currents_re", &self.currents.mapv(|c| c.re))?;
        npz.add_array("currents_im", &self.currents.mapv(|c| c.im))?;
        if let Some(frequencies) = &self.frequencies {
            npz.add_array("frequencies", &Array1::from_vec(frequencies.clone()))?;
        }
        if let Some(parameters) = &self.parameters {
            for (key, value) in parameters {
                let name = format!("{PARAM_PREFIX}{key}");
                npz.add_array(name.as_str(), &Array1::from_vec(vec![*value]))?;
            }
        }
        npz.finish()?;
        Ok(())
    }

    /// Read an artifact previously written by [`Solution::save`].
    pub fn load(path: &Path) -> ModelResult<Self> {
        let mut npz = NpzReader::new(File::open(path)?)?;
        let names = npz.names()?;

        let re = read_array1(&mut npz, "currents_re")?;
        let im = read_array1(&mut npz, "currents_im")?;
        if re.len() != im.len() {
            return Err(ModelError::ShapeMismatch(format!(
                "current component lengths disagree: {} vs {}",
                re.len(),
                im.len()
            )));
        }
        let currents = Array1::from_iter(
            re.iter()
                .zip(im.iter())
                .map(|(&r, &i)| Complex64::new(r, i)),
        );

        let has_frequencies = names
            .iter()
            .any(|n| n == "frequencies" || n == "frequencies.npy");
        let frequencies = if has_frequencies {
            Some(read_array1(&mut npz, "frequencies")?.to_vec())
        } else {
            None
        };

        let mut parameters = BTreeMap::new();
        for name in &names {
            let trimmed = name.strip_suffix(".npy").unwrap_or(name);
            if let Some(key) = trimmed.strip_prefix(PARAM_PREFIX) {
                let value = read_array1(&mut npz, trimmed)?;
                if value.is_empty() {
                    return Err(ModelError::ShapeMismatch(format!(
                        "parameter entry '{key}' is empty"
                    )));
                }
                parameters.insert(key.to_string(), value[0]);
            }
        }

        Ok(Self {
            currents,
            frequencies,
            parameters: if parameters.is_empty() {
                None
            } else {
                Some(parameters)
            },
        })
    }
}

fn read_array1(npz: &mut NpzReader<File>, key: &str) -> ModelResult<Array1<f64>> {
    npz.by_name::<ndarray::OwnedRepr<f64>, ndarray::Ix1>(&format!("{key}.npy"))
        .or_else(|_| npz.by_name::<ndarray::OwnedRepr<f64>, ndarray::Ix1>(key))
        .map_err(ModelError::from)
}
