//! Transit Hunt - Interactive Console Front-End
//!
//! Thin shell over the library: loads a dataset, wires a progression store
//! and the scoring engine, then reads commands from stdin.
//!
//! Commands:
//!   show [id]            - display a light curve (random when no id)
//!   hint <id> <index>    - classifier opinion about one point
//!   guess <user> <id> <index> - submit a transit guess
//!   board [n]            - leaderboard
//!   quit

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use transit_hunt_core::constants;
use transit_hunt_core::logic::dataset::{DatasetProvider, InMemoryDataset, LightCurve};
use transit_hunt_core::logic::progress::{
    MemoryProgressionStore, ProgressionStore, SqliteProgressionStore,
};
use transit_hunt_core::{GameConfig, GameEngine};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Transit Hunt v{}...", env!("CARGO_PKG_VERSION"));

    let dataset: Arc<dyn DatasetProvider> = match constants::get_dataset_path() {
        Some(path) => match InMemoryDataset::from_jsonl(&path) {
            Ok(ds) => {
                log::info!("Loaded dataset from {}", path.display());
                Arc::new(ds)
            }
            Err(e) => {
                log::error!("Failed to load dataset {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            log::info!("No dataset configured, using built-in demo curves");
            Arc::new(demo_dataset())
        }
    };

    let store: Arc<dyn ProgressionStore> = match constants::get_db_path() {
        Some(path) => match SqliteProgressionStore::open(&path) {
            Ok(s) => {
                log::info!("Progression database at {}", path.display());
                Arc::new(s)
            }
            Err(e) => {
                log::error!("Failed to open database {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            log::info!("No database configured, progression is in-memory only");
            Arc::new(MemoryProgressionStore::new())
        }
    };

    let mut config = GameConfig::from_env();
    config.model_path = Some(transit_hunt_core::logic::model::default_model_path());

    let engine = GameEngine::new(dataset, store, config);

    println!("Transit Hunt - commands: show [id] | hint <id> <idx> | guess <user> <id> <idx> | board [n] | quit");
    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                log::error!("stdin read failed: {}", e);
                break;
            }
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            [] => {}
            ["quit"] | ["exit"] => break,
            ["show"] => show(&engine, None),
            ["show", id] => match id.parse() {
                Ok(id) => show(&engine, Some(id)),
                Err(_) => println!("bad id: {}", id),
            },
            ["hint", id, idx] => match (id.parse(), idx.parse()) {
                (Ok(id), Ok(idx)) => match engine.get_hint(id, idx) {
                    Ok(h) => println!(
                        "AI: p(transit) = {:.3} -> {}",
                        h.ai_probability,
                        if h.ai_prediction == 1 { "transit" } else { "no transit" }
                    ),
                    Err(e) => println!("error: {}", e),
                },
                _ => println!("usage: hint <id> <index>"),
            },
            ["guess", user, id, idx] => match (id.parse(), idx.parse()) {
                (Ok(id), Ok(idx)) => match engine.submit_guess(user, id, idx) {
                    Ok(out) => {
                        println!(
                            "{} | AI said {:.3} | score {} (streak {}) | level {}",
                            if out.is_correct { "CORRECT" } else { "MISS" },
                            out.ai_probability,
                            out.new_score,
                            out.streak,
                            out.level
                        );
                        if !out.badges.is_empty() {
                            println!("badges: {}", out.badges.join(", "));
                        }
                    }
                    Err(e) => println!("error: {}", e),
                },
                _ => println!("usage: guess <user> <id> <index>"),
            },
            ["board"] => board(&engine, constants::DEFAULT_LEADERBOARD_SIZE),
            ["board", n] => match n.parse() {
                Ok(n) => board(&engine, n),
                Err(_) => println!("bad count: {}", n),
            },
            _ => println!("unknown command"),
        }
    }

    log::info!("Shutting down");
}

fn show(engine: &GameEngine, id: Option<u32>) {
    match engine.get_lightcurve_view(id) {
        Ok(view) => {
            println!("light curve {} ({} samples)", view.id, view.length);
            for (i, (t, f)) in view.time.iter().zip(view.flux.iter()).enumerate() {
                println!("  [{:3}] t={:8.3} flux={:.4}", i, t, f);
            }
        }
        Err(e) => println!("error: {}", e),
    }
}

fn board(engine: &GameEngine, top_n: usize) {
    match engine.leaderboard(top_n) {
        Ok(entries) if entries.is_empty() => println!("no players yet"),
        Ok(entries) => {
            for (rank, e) in entries.iter().enumerate() {
                println!("{:2}. {:20} {:6} (streak {})", rank + 1, e.user_id, e.score, e.streak);
            }
        }
        Err(e) => println!("error: {}", e),
    }
}

/// Two tiny hand-made curves with obvious dips, enough to play with
fn demo_dataset() -> InMemoryDataset {
    let mk = |id: u32, dips: &[usize], n: usize| {
        let mut flux: Vec<f32> = (0..n).map(|i| 1.0 + 0.002 * ((i % 5) as f32 - 2.0)).collect();
        let mut label = vec![0u8; n];
        for &d in dips {
            flux[d] = 0.62;
            label[d] = 1;
        }
        LightCurve {
            id,
            time: (0..n).map(|i| i as f32 * 0.02).collect(),
            flux,
            label,
        }
    };
    let curves = vec![mk(1, &[7, 19], 32), mk(2, &[4, 15, 27], 32)];
    // Hand-built curves are valid by construction
    InMemoryDataset::new(curves).unwrap_or_else(|e| {
        log::error!("demo dataset invalid: {}", e);
        std::process::exit(1);
    })
}
