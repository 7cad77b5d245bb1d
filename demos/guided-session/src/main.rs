//! STANCE Guided Session Demo
//!
//! Plays a scripted user through one exercise cycle on a simulated sensor
//! and prints the prompt and guidance markers whenever the phase changes.
//!
//! Usage: guided-session [none|mild|noisy] [seed]
//!
//! Set `RUST_LOG=stance_posture=debug` to watch the debounce windows.

use stance_posture::{FrameOutcome, PostureConfig, PostureSession};
use stance_test::{JitterConfig, SensorJitter, SkeletonBuilder};
use tracing::warn;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let preset = args.next().unwrap_or_else(|| "mild".to_string());
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(7);

    let jitter = match preset.as_str() {
        "none" => JitterConfig::none(),
        "mild" => JitterConfig::mild(),
        "noisy" => JitterConfig::noisy(),
        other => {
            warn!(preset = other, "unknown jitter preset, using mild");
            JitterConfig::mild()
        }
    };

    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║           STANCE Demo - Guided Crouch and Reach            ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();
    println!("Sensor: {preset} (seed {seed})");
    println!();

    let config = PostureConfig::default();
    let script = stance_test::relaxed_script(&config);
    let builder = SkeletonBuilder::default();
    let mut sensor = SensorJitter::new(jitter, seed);
    let mut session = PostureSession::with_config(config)?;

    println!("[     start] {}", session.state().prompt());

    for clean in script.frames(&builder) {
        let Some(frame) = sensor.apply(&clean) else {
            continue;
        };

        match session.on_frame(&frame) {
            Ok(outcome) if outcome.transition.is_some() => print_outcome(&outcome),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "frame rejected"),
        }
    }

    let stats = sensor.stats();
    println!();
    println!(
        "Frames: {} seen, {} dropped, {} joints inferred, {} spikes",
        stats.frames_seen, stats.frames_dropped, stats.joints_inferred, stats.spikes
    );

    Ok(())
}

fn print_outcome(outcome: &FrameOutcome) {
    println!("[{:>10}] {}", outcome.frame.to_string(), outcome.prompt());

    for point in &outcome.guidance {
        let p = point.position;
        println!(
            "             {:?} -> ({:.2}, {:.2}, {:.2}) {:?}",
            point.target, p.x, p.y, p.z, point.status
        );
    }
}
