//! Concurrent producers example
//!
//! Four producer threads share a 40 lines/second budget; trace ids stay
//! unique and every line reaches stdout whole.
//!
//! Run with: cargo run --example concurrent_producers

use fake_log_generator::prelude::*;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    let generator = Generator::builder()
        .config(
            GeneratorConfig::new()
                .with_lines_per_second(40.0)
                .with_producers(4)
                .with_zone_mode(ZoneMode::Utc)
                .with_format(OutputFormat::Syslog),
        )
        .appender(ConsoleAppender::new())
        .build()?;

    let shutdown = generator.shutdown_handle();
    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_secs(1));
        shutdown.trigger();
    });

    let emitted = generator.run(None)?;
    let _ = stopper.join();
    println!("\nLog generation stopped after {} lines.", emitted);
    Ok(())
}
