//! File output example
//!
//! Writes a burst of Apache combined lines to a file and to stdout.
//!
//! Run with: cargo run --example file_output

use fake_log_generator::prelude::*;

fn main() -> Result<()> {
    let path = std::env::temp_dir().join("fake-log-generator/demo.log");

    let generator = Generator::builder()
        .config(
            GeneratorConfig::new()
                .with_lines_per_second(20.0)
                .with_format(OutputFormat::ApacheCombined),
        )
        .appender(ConsoleAppender::new())
        .appender(FileAppender::new(&path)?)
        .build()?;

    let emitted = generator.run(Some(10))?;
    println!("\nWrote {} lines to {}", emitted, path.display());
    Ok(())
}
