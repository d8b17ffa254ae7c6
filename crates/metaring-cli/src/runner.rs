//! Simulation runner: ties together geometry, the ring network, and solver.

use std::path::Path;

use anyhow::{Context, Result};

use metaring_core::solution::Solution;
use metaring_core::solver::circuit::CircuitSolver;
use metaring_core::solver::ResponseSolver;
use metaring_core::types::{CurrentResponse, DriveField, RingNetwork};
use metaring_geometry::cubic::LatticeGeometry;

use crate::config::JobConfig;

/// Per-frequency aggregate response of the network.
pub struct SweepPoint {
    pub frequency_hz: f64,
    pub mean_current: f64,
    pub max_current: f64,
    pub dissipated_power: f64,
}

/// Results from a simulation run.
pub struct SimulationOutput {
    pub sweep: Vec<SweepPoint>,
    /// Full response at the frequency with the strongest mean current.
    pub peak: CurrentResponse,
    pub geometry: LatticeGeometry,
    pub ring_count: usize,
}

/// Run a full simulation from a parsed job configuration.
pub fn run_simulation(job: &JobConfig) -> Result<SimulationOutput> {
    job.structure
        .validate()
        .context("invalid structure parameters")?;

    let geometry = job.structure.generate_geometry()?;
    let sites = job.structure.ring_sites()?;

    // Textual summary; 3D rendering belongs to external viewers fed by the
    // optional geometry export.
    println!(
        "Structure '{}': {} vertices, {} edges, {} faces",
        job.structure.name(),
        geometry.vertices.len(),
        geometry.edges.len(),
        geometry.faces.len()
    );

    let mut network = RingNetwork::new();
    for site in &sites {
        let p = site.params;
        network
            .add_ring(
                site.position,
                site.normal,
                p.resistance,
                p.inductance,
                p.capacitance,
                p.omega,
                p.radius,
                p.strip_width,
            )
            .map_err(|e| anyhow::anyhow!("failed to add ring: {e}"))?;
    }
    println!("Ring network: {} rings", network.len());
    if network.is_empty() {
        anyhow::bail!("no rings generated — check the ring inclusion flags");
    }

    let frequencies = match &job.drive.frequencies {
        Some(spec) => spec.expand(),
        None => vec![job.structure.frequency_hz()],
    };
    if frequencies.is_empty() {
        anyhow::bail!("frequency list is empty");
    }

    let solver = CircuitSolver::with_drive(DriveField {
        direction: job.drive.direction,
        amplitude: job.drive.amplitude,
    });
    println!("Method: {}", solver.method_name());

    let mut sweep = Vec::with_capacity(frequencies.len());
    let mut peak: Option<CurrentResponse> = None;
    let mut peak_mean = f64::NEG_INFINITY;

    for (fi, &freq) in frequencies.iter().enumerate() {
        let response = solver
            .solve_currents(&network, freq)
            .map_err(|e| anyhow::anyhow!("solver error at f={freq:.4e} Hz: {e}"))?;

        let n = response.currents.len() as f64;
        let mean = response.currents.iter().map(|c| c.norm()).sum::<f64>() / n;
        let max = response.currents.iter().map(|c| c.norm()).fold(0.0, f64::max);
        let power = response.dissipated_power(network.rings());

        if (fi + 1) % 10 == 0 || fi == 0 || fi == frequencies.len() - 1 {
            println!(
                "  [{}/{}] f={:.4e} Hz: mean|I|={:.3e} A, max|I|={:.3e} A, P={:.3e} W",
                fi + 1,
                frequencies.len(),
                freq,
                mean,
                max,
                power
            );
        }

        if mean > peak_mean {
            peak_mean = mean;
            peak = Some(response);
        }
        sweep.push(SweepPoint {
            frequency_hz: freq,
            mean_current: mean,
            max_current: max,
            dissipated_power: power,
        });
    }

    let peak = peak.context("no frequency point was solved")?;
    Ok(SimulationOutput {
        sweep,
        peak,
        geometry,
        ring_count: network.len(),
    })
}

/// Write the per-frequency sweep summary to a CSV file.
pub fn write_sweep_csv(sweep: &[SweepPoint], path: &Path) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(path)?;
    writeln!(file, "# Metaring — frequency sweep summary")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "frequency_hz,mean_current_a,max_current_a,dissipated_power_w")?;
    for point in sweep {
        writeln!(
            file,
            "{:.6e},{:.6e},{:.6e},{:.6e}",
            point.frequency_hz, point.mean_current, point.max_current, point.dissipated_power
        )?;
    }

    println!("Sweep summary written to: {}", path.display());
    Ok(())
}

/// Write the per-ring currents at the peak frequency to a CSV file.
pub fn write_currents_csv(response: &CurrentResponse, path: &Path) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(path)?;
    writeln!(file, "# Metaring — per-ring currents")?;
    writeln!(file, "# Frequency: {:.6e} Hz", response.frequency_hz)?;
    writeln!(file, "ring,current_re_a,current_im_a,magnitude_a,phase_rad")?;
    for (i, c) in response.currents.iter().enumerate() {
        writeln!(
            file,
            "{},{:.6e},{:.6e},{:.6e},{:.6e}",
            i,
            c.re,
            c.im,
            c.norm(),
            c.arg()
        )?;
    }

    println!("Currents written to: {}", path.display());
    Ok(())
}

/// Write the solution artifact (currents at peak, sweep frequencies, and
/// the structure parameter record) as an `.npz` archive.
pub fn write_solution_npz(result: &SimulationOutput, job: &JobConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let solution = Solution {
        currents: result.peak.currents.clone(),
        frequencies: Some(result.sweep.iter().map(|p| p.frequency_hz).collect()),
        parameters: Some(job.structure.parameter_map()),
    };
    solution.save(path)?;

    println!("Solution artifact written to: {}", path.display());
    Ok(())
}

/// Export lattice vertices and edges as CSV files for external viewers.
pub fn write_geometry_csv(geometry: &LatticeGeometry, directory: &Path) -> Result<()> {
    use std::io::Write;

    std::fs::create_dir_all(directory)?;

    let vertex_path = directory.join("vertices.csv");
    let mut file = std::fs::File::create(&vertex_path)?;
    writeln!(file, "x_m,y_m,z_m")?;
    for v in &geometry.vertices {
        writeln!(file, "{:.9e},{:.9e},{:.9e}", v[0], v[1], v[2])?;
    }

    let edge_path = directory.join("edges.csv");
    let mut file = std::fs::File::create(&edge_path)?;
    writeln!(file, "vertex_a,vertex_b")?;
    for e in &geometry.edges {
        writeln!(file, "{},{}", e[0], e[1])?;
    }

    println!(
        "Geometry written to: {} and {}",
        vertex_path.display(),
        edge_path.display()
    );
    Ok(())
}
