use anyhow::Result;
use clap::Parser;
use colony_common::{PopulationSnapshot, SimulationConfig};
use colony_engine::ColonySimulation;
use log::{debug, error, info, trace, warn};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

/// Command-line arguments for the colony engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario configuration file (.toml)
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override `timing.total_steps`
    #[arg(short, long)]
    steps: Option<u32>,
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();
    let args = Args::parse();

    info!("Starting Colony Engine...");

    // --- Load Configuration ---
    let mut config = SimulationConfig::load(&args.config)?;
    if let Some(steps) = args.steps {
        config.timing.total_steps = steps;
    }

    info!("Using {} Rayon threads.", rayon::current_num_threads());

    // --- Initialize Simulation ---
    let mut sim = ColonySimulation::new(config)?;
    info!("Colony initialized with {} agents.", sim.current_agent_count());
    debug!("Simulation Parameters: {:#?}", sim.params());

    // --- Simulation Loop ---
    let total_steps = sim.config().timing.total_steps;
    let mut record_interval = sim.config().timing.record_interval;
    if record_interval == 0 {
        warn!("Record interval is 0. Recording every step.");
        record_interval = 1;
    }
    let dt = sim.params().dt;
    info!("Recording snapshot every {} steps ({:.2} time units).", record_interval, record_interval as f32 * dt);

    info!("Starting simulation loop for {} steps...", total_steps);
    let start_time = Instant::now();
    let mut previous_print_time = start_time;

    // --- Initial Snapshot (tick = 0) ---
    if let Err(e) = sim.record_snapshot() {
        error!("Error recording initial snapshot: {}", e);
        anyhow::bail!("Failed to record initial snapshot.");
    }

    for step in 0..total_steps {
        let step_start_time = Instant::now();
        if let Err(e) = sim.step() {
            error!("Error during simulation step {}: {}", step + 1, e);
            anyhow::bail!("Simulation step failed.");
        }
        let step_duration = step_start_time.elapsed();

        let current_time = Instant::now();
        let print_interval_secs = 5.0;
        let should_print_status = current_time.duration_since(previous_print_time).as_secs_f64() >= print_interval_secs;
        let is_record_step = (step + 1) % record_interval == 0;
        let is_last_step = step + 1 == total_steps;

        if should_print_status || is_last_step {
            info!(
                "Step [{}/{}] ({:.2}) | Agents: {} | Step Time: {:6.2} ms | Elapsed: {:.2} s",
                step + 1,
                total_steps,
                (step + 1) as f32 * dt,
                sim.current_agent_count(),
                step_duration.as_secs_f64() * 1000.0,
                start_time.elapsed().as_secs_f64()
            );
            previous_print_time = current_time;
        } else {
            trace!(
                "Step [{}/{}] completed in {:.2} ms",
                step + 1,
                total_steps,
                step_duration.as_secs_f64() * 1000.0
            );
        }

        if is_record_step || is_last_step {
            if let Err(e) = sim.record_snapshot() {
                error!("Error recording snapshot at step {}: {}", step + 1, e);
                anyhow::bail!("Failed to record snapshot.");
            }
        }
    }

    let total_duration = start_time.elapsed();
    info!("Simulation finished in {:.3} seconds.", total_duration.as_secs_f64());

    // --- Save Recorded Data ---
    let output = sim.config().output.clone();
    if output.save_stats {
        let format = output.format.as_deref().unwrap_or("json");
        save_snapshots(sim.get_recorded_snapshots(), &output.base_filename, format);
    } else {
        info!("Skipping saving snapshots as per config (save_stats is false).");
    }

    if output.save_final_population {
        let filename = format!("{}_final_population.csv", output.base_filename);
        match csv::Writer::from_path(&filename) {
            Ok(mut writer) => {
                writer.write_record(["key", "cell_type", "x", "y", "length", "growth_rate", "dead_counter"])?;
                for agent in sim.population().iter() {
                    writer.write_record(&[
                        agent.key.0.to_string(),
                        agent.cell_type.code().to_string(),
                        format!("{:.4}", agent.body.position.x),
                        format!("{:.4}", agent.body.position.y),
                        format!("{:.4}", agent.body.length),
                        format!("{:.4}", agent.growth_rate),
                        agent.dead_counter.to_string(),
                    ])?;
                }
                writer.flush()?;
                info!("Final population saved to {}", filename);
            }
            Err(e) => error!("Error saving CSV file '{}': {}", filename, e),
        }
    } else {
        info!("Skipping saving final population as per config.");
    }

    info!("Simulation Complete.");
    Ok(())
}

/// Writes every recorded snapshot in the requested format. Errors are
/// logged, not returned, so a failed write does not discard the run.
fn save_snapshots(snapshots: &[PopulationSnapshot], base_filename: &str, format: &str) {
    match format {
        "bincode" => {
            let filename = format!("{}_snapshots.bin", base_filename);
            match File::create(&filename) {
                Ok(file) => match bincode::serialize_into(file, snapshots) {
                    Ok(_) => info!("All snapshots saved to {} (binary format)", filename),
                    Err(e) => error!("Error serializing snapshots to bincode: {}", e),
                },
                Err(e) => error!("Error creating snapshot file '{}': {}", filename, e),
            }
        }
        "messagepack" => {
            let filename = format!("{}_snapshots.msgpack", base_filename);
            match &mut File::create(&filename) {
                Ok(file) => match rmp_serde::encode::write(file, snapshots) {
                    Ok(_) => info!("All snapshots saved to {} (MessagePack format)", filename),
                    Err(e) => error!("Error serializing snapshots to MessagePack: {}", e),
                },
                Err(e) => error!("Error creating snapshot file '{}': {}", filename, e),
            }
        }
        other => {
            if other != "json" {
                error!("Unknown output format: {}. Using JSON instead.", other);
            }
            let filename = format!("{}_snapshots.json", base_filename);
            match File::create(&filename) {
                Ok(mut file) => match serde_json::to_string(snapshots) {
                    Ok(json_string) => {
                        if let Err(e) = file.write_all(json_string.as_bytes()) {
                            error!("Error writing snapshot JSON to file '{}': {}", filename, e);
                        } else {
                            info!("All snapshots saved to {}", filename);
                        }
                    }
                    Err(e) => error!("Error serializing snapshots to JSON: {}", e),
                },
                Err(e) => error!("Error creating snapshot file '{}': {}", filename, e),
            }
        }
    }
}
