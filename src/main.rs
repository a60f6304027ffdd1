//! Storm Sword entry point
//!
//! In the browser this wires the game to the page. Natively it plays one
//! headless session (autopilot by default) and prints the final frame as JSON.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    storm_sword::platform::web::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::Duration;

    use anyhow::{Context, Result};
    use clap::Parser;

    use storm_sword::platform::headless::{self, FRAME_STEP, HeadlessConfig};
    use storm_sword::{Settings, Tuning};

    /// Play a headless Storm Sword session and print the result
    #[derive(Parser, Debug)]
    #[command(name = "storm-sword", version)]
    struct Cli {
        /// Tuning JSON (missing fields use defaults)
        tuning: Option<PathBuf>,

        /// RNG seed; the same seed replays the same session
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Settings JSON (key bindings, volumes)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Stop after this many frames
        #[arg(long)]
        max_frames: Option<u64>,

        /// Frame rate of the virtual clock
        #[arg(long, default_value_t = 60)]
        fps: u32,

        /// Don't play; just let the clock run out
        #[arg(long)]
        idle: bool,
    }

    pub fn main() -> Result<()> {
        env_logger::init();
        let cli = Cli::parse();

        log::info!("Storm Sword (native) starting...");

        let tuning = match &cli.tuning {
            Some(path) => Tuning::load(path)
                .with_context(|| format!("loading tuning from {}", path.display()))?,
            None => Tuning::default(),
        };
        let settings = match &cli.settings {
            Some(path) => Settings::load(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::default(),
        };

        let frame_step = if cli.fps == 0 {
            FRAME_STEP
        } else {
            Duration::from_secs_f64(1.0 / f64::from(cli.fps))
        };
        let config = HeadlessConfig {
            seed: cli.seed,
            max_frames: cli.max_frames,
            frame_step,
            autopilot: !cli.idle,
        };

        let report = headless::run(tuning, &settings, &config).context("running session")?;
        log::info!(
            "Session over after {} frames: score {} ({:?})",
            report.frames,
            report.score,
            report.outcome
        );
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::main()
}
