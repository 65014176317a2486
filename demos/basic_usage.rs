//! Basic usage example
//!
//! Renders one record in every supported format.
//!
//! Run with: cargo run --example basic_usage

use fake_log_generator::prelude::*;
use std::sync::Arc;

fn main() {
    println!("=== Fake Log Generator - Basic Usage Example ===\n");

    let factory = RecordFactory::new(Arc::new(TraceIdAllocator::new()))
        .with_length_range(40, 60)
        .with_zone_mode(ZoneMode::Utc);
    let mut rng = rand::thread_rng();
    let record = factory.next_record(&mut rng);

    for format in OutputFormat::ALL {
        println!("{:>16}: {}", format, format.render(&record, &mut rng));
    }

    println!("\nUnknown names fall back to JSON:");
    println!("{:>16}: {}", "xml", render(&record, "xml", &mut rng));
}
