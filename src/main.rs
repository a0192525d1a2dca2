//! Replay a recorded observation log and print the solved position
//!
//! The observation file is a JSON array of decoded advertisements:
//! `[{"building_id": 1, "floor": 4, "north_raw": 0.0, "east_raw": 984.252,
//! "strength_dbm": -58.5}, ...]`. An optional second argument points at an
//! engine configuration file.

use beacon_positioning::{EngineConfig, Observation, PositionReport, PositioningEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!(
            "Usage: {} <observations.json> [config.json]",
            args.get(0).map_or("beacon-positioning", |s| s.as_str())
        );
        return Err("Invalid arguments".into());
    }

    let config = match args.get(2) {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    let json_data = std::fs::read_to_string(&args[1])?;
    let observations: Vec<Observation> = serde_json::from_str(&json_data)?;
    let total = observations.len();

    let mut engine = PositioningEngine::new(config)?;
    let mut rejected = 0usize;
    for observation in observations {
        if engine.record(observation).is_err() {
            rejected += 1;
        }
    }
    if rejected > 0 {
        eprintln!("Skipped {} of {} observation(s) as malformed", rejected, total);
    }

    let report = match engine.solve_position() {
        Ok(position) => {
            println!(
                "Estimated receiver position: x={:.2} m east, y={:.2} m north (building {}, floor {})",
                position.east_m, position.north_m, position.building_id, position.floor
            );
            PositionReport::from(position)
        }
        Err(error) => {
            println!("No position: {}", error);
            PositionReport::default()
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);

    let snapshot = engine.snapshot();
    println!("Live beacons: {}", snapshot.len());
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
