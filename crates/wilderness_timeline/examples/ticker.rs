//! Ticker Demo
//!
//! Drives a two-shape timeline from a simulated 60fps clock, printing each
//! frame and every lifecycle event as it fires.
//!
//! Features demonstrated:
//! - Loading a timeline from a TOML document
//! - Subscribing to events
//! - Pausing, then resuming in reverse mid-cycle
//!
//! Run with: RUST_LOG=wilderness_timeline=debug cargo run -p wilderness_timeline --example ticker

use wilderness_timeline::{
    EasingRegistry, EventName, PlaybackConfig, Result, TimelineConfig, TimelineError,
};

const DOCUMENT: &str = r##"
[playback]
iterations = 2
alternate = true

[[shapes]]
name = "fade"
keyframes = [
    { name = "dark", value = { fill = "#000000" } },
    { name = "light", value = { fill = "#ffffff" }, duration = 300, easing = "ease-in-quad" },
]

[[shapes]]
name = "grow"
queue = ["light", -100]
keyframes = [
    { value = { width = "0px" } },
    { value = { width = "120px" }, duration = 200 },
]
"##;

const FRAME_MS: f64 = 1000.0 / 60.0;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut easings = EasingRegistry::new();
    easings.register_fn("ease-in-quad", |t| t * t);

    let mut timeline = TimelineConfig::from_toml_str(DOCUMENT)?
        .builder(&easings)?
        .build()?;

    for name in EventName::ALL {
        if name == EventName::Frame {
            continue;
        }
        timeline.subscribe(name, |event| {
            println!("  {:>8.1}ms  {:<16} {:?}", event.at, event.name.as_str(), event.args);
        });
    }

    let mut now = 0.0;
    timeline.play(now, PlaybackConfig::default())?;

    while now <= 1400.0 {
        if (now - 500.0).abs() < FRAME_MS / 2.0 {
            timeline.pause(now, PlaybackConfig::default())?;
            println!("-- paused at {:.1}ms", now);
        }
        if (now - 700.0).abs() < FRAME_MS / 2.0 {
            timeline.play(now, PlaybackConfig::default().reverse(true))?;
            println!("-- resumed in reverse at {:.1}ms", now);
        }

        let position = timeline.sample_position(now);
        timeline.collect_events();

        let mut values = Vec::new();
        for frame in timeline.frame_at_position(position)? {
            let value = serde_json::to_string(&frame.value)
                .map_err(|e| TimelineError::Validation(e.to_string()))?;
            values.push(format!("{}={}", frame.name, value));
        }
        println!("{:>8.1}ms  {:.3}  {}", now, position, values.join("  "));

        if timeline.state().finished {
            break;
        }
        now += FRAME_MS;
    }

    Ok(())
}
