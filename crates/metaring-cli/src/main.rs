//! Metaring command-line interface.
//!
//! Run simulations from TOML configuration files:
//! ```sh
//! metaring-cli run job.toml
//! metaring-cli validate job.toml
//! metaring-cli structures
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "metaring-cli")]
#[command(about = "Metaring: coupled ring-resonator metamaterial solver")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation from a TOML configuration file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without running the simulation.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Display information about available structure types.
    Structures,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Metaring coupled-circuit solver");
            println!("===============================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let result = runner::run_simulation(&job)?;

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            runner::write_sweep_csv(&result.sweep, &out_dir.join("sweep.csv"))?;

            if job.output.save_currents {
                runner::write_currents_csv(&result.peak, &out_dir.join("currents.csv"))?;
            }

            if job.output.save_solution {
                runner::write_solution_npz(&result, &job, &out_dir.join("solution.npz"))?;
            }

            if job.output.save_geometry {
                runner::write_geometry_csv(&result.geometry, &out_dir)?;
            }

            println!("Simulation complete ({} rings).", result.ring_count);
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            job.structure.validate()?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Structures => {
            println!("Available structure types:");
            println!();
            println!("  cubic — regular grid of unit cubes with rings on faces,");
            println!("          edge midpoints, and vertices, each placement");
            println!("          category toggled by its own flag.");
            println!();
            println!("  Planned: srr (split-ring pairs), clr (capacitively loaded rings).");
            Ok(())
        }
    }
}
