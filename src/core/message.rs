//! Filler text for synthesized records

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Operational sentences messages are assembled from
pub const SENTENCES: [&str; 20] = [
    "Processing request from client.",
    "Database connection established successfully.",
    "Cache hit ratio is below threshold.",
    "User authentication completed.",
    "API request processing time exceeded limits.",
    "Memory usage is within normal parameters.",
    "Disk I/O operations completed.",
    "Network latency detected on primary interface.",
    "Configuration loaded from environment variables.",
    "Background task scheduler initiated.",
    "Garbage collection cycle completed.",
    "Service health check passed.",
    "Rate limiting applied to incoming requests.",
    "Thread pool resources allocated.",
    "Security policy validation completed.",
    "Data synchronization process started.",
    "Backup procedure executed successfully.",
    "Input validation performed on user data.",
    "Rendering engine initialized with default parameters.",
    "Encryption key rotation completed.",
];

const DETAIL_PROBABILITY: f64 = 0.3;
const DETAIL_MIN_LEN: usize = 10;
const DETAIL_MAX_LEN: usize = 30;

/// Builds messages of an exact length from [`SENTENCES`]
///
/// Sentences are appended (each followed by a space, and sometimes by a
/// random ` Details: <token>` suffix) until the text is long enough, then
/// the result is cut to the requested length.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageGenerator;

impl MessageGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, length: usize) -> String {
        let mut message = String::with_capacity(length + 64);
        while message.len() < length {
            message.push_str(SENTENCES[rng.gen_range(0..SENTENCES.len())]);
            if rng.gen_bool(DETAIL_PROBABILITY) {
                message.push_str(" Details: ");
                let detail_len = rng.gen_range(DETAIL_MIN_LEN..=DETAIL_MAX_LEN);
                message.extend((0..detail_len).map(|_| char::from(rng.sample(Alphanumeric))));
            }
            message.push(' ');
        }
        // ASCII only, so byte length == character length
        message.truncate(length);
        message
    }
}
