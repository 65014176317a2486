//! Emission loop
//!
//! A [`Generator`] builds one record per tick, renders it in the configured
//! format and writes the line to every registered appender. With more than
//! one producer, records are built and rendered on worker threads and a
//! single writer drains them from a bounded channel, so sinks always see
//! whole lines.

use super::{
    appender::Appender,
    config::GeneratorConfig,
    error::{GeneratorError, Result},
    metrics::GeneratorMetrics,
    output_format::OutputFormat,
    record_factory::RecordFactory,
    trace_id::TraceIdAllocator,
};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Rendered lines buffered between producers and the writer
pub const CHANNEL_CAPACITY: usize = 1024;

/// Stops a running [`Generator`] from any thread
///
/// Triggering closes the shutdown channel; the loop notices it at the next
/// tick or while sleeping, finishes the line in flight and returns.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    sender: Arc<Mutex<Option<Sender<()>>>>,
}

impl ShutdownHandle {
    fn channel() -> (Self, Receiver<()>) {
        let (sender, receiver) = bounded(0);
        (
            Self {
                sender: Arc::new(Mutex::new(Some(sender))),
            },
            receiver,
        )
    }

    pub fn trigger(&self) {
        drop(self.sender.lock().take());
    }

    pub fn is_triggered(&self) -> bool {
        self.sender.lock().is_none()
    }
}

pub struct Generator {
    factory: RecordFactory,
    format: OutputFormat,
    interval: Duration,
    producers: usize,
    seed: Option<u64>,
    appenders: Arc<Mutex<Vec<Box<dyn Appender>>>>,
    metrics: Arc<GeneratorMetrics>,
    shutdown: ShutdownHandle,
    shutdown_rx: Receiver<()>,
}

impl Generator {
    /// Create a generator with a fresh trace id counter
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        Self::with_trace_ids(config, Arc::new(TraceIdAllocator::new()))
    }

    /// Create a generator drawing trace ids from `trace_ids`
    pub fn with_trace_ids(config: GeneratorConfig, trace_ids: Arc<TraceIdAllocator>) -> Result<Self> {
        config.validate()?;
        let (shutdown, shutdown_rx) = ShutdownHandle::channel();
        Ok(Self {
            factory: RecordFactory::from_config(&config, trace_ids),
            format: config.format,
            interval: config.producer_interval(),
            producers: config.producers,
            seed: None,
            appenders: Arc::new(Mutex::new(Vec::new())),
            metrics: Arc::new(GeneratorMetrics::new()),
            shutdown,
            shutdown_rx,
        })
    }

    pub fn builder() -> GeneratorBuilder {
        GeneratorBuilder::new()
    }

    pub fn add_appender(&mut self, appender: Box<dyn Appender>) {
        self.appenders.lock().push(appender);
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn factory(&self) -> &RecordFactory {
        &self.factory
    }

    pub fn metrics(&self) -> &GeneratorMetrics {
        &self.metrics
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Build and render one record without writing it anywhere
    pub fn next_line<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let record = self.factory.next_record(rng);
        self.format.render(&record, rng)
    }

    /// Build, render and write one record; returns the rendered line
    pub fn emit_one<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let line = self.next_line(rng);
        Self::write_line(&self.appenders, &line, &self.metrics);
        line
    }

    /// Emit lines until shut down or until `limit` lines went out.
    ///
    /// Returns the number of lines emitted by this call.
    pub fn run(&self, limit: Option<u64>) -> Result<u64> {
        tracing::info!(
            format = %self.format,
            producers = self.producers,
            interval_ms = self.interval.as_millis() as u64,
            "starting log generation"
        );

        let emitted = if self.producers > 1 {
            self.run_concurrent(limit)?
        } else {
            let mut rng = self.producer_rng(0);
            self.run_with_rng(&mut rng, limit)
        };

        self.flush()?;
        tracing::info!(
            emitted,
            write_failures = self.metrics.write_failures(),
            "log generation stopped"
        );
        Ok(emitted)
    }

    /// Single-producer loop using the caller's random source
    pub fn run_with_rng<R: Rng + ?Sized>(&self, rng: &mut R, limit: Option<u64>) -> u64 {
        let mut emitted = 0u64;
        while limit.map_or(true, |max| emitted < max) && !self.is_shutdown() {
            self.emit_one(rng);
            emitted += 1;

            if limit.is_some_and(|max| emitted >= max) {
                break;
            }
            if self.wait(self.interval) {
                break;
            }
        }
        emitted
    }

    /// Fan records out to producer threads and write from this thread
    fn run_concurrent(&self, limit: Option<u64>) -> Result<u64> {
        let (sender, receiver) = bounded::<String>(CHANNEL_CAPACITY);
        let budget = limit.map(AtomicU64::new);

        thread::scope(|scope| {
            let handles: Vec<_> = (0..self.producers)
                .map(|index| {
                    let sender = sender.clone();
                    let budget = budget.as_ref();
                    scope.spawn(move || self.produce(index, &sender, budget))
                })
                .collect();

            // Only producers hold senders now; the loop ends when all exit
            drop(sender);

            let mut emitted = 0u64;
            for line in receiver.iter() {
                Self::write_line(&self.appenders, &line, &self.metrics);
                emitted += 1;
            }

            for (index, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(result) => result?,
                    Err(_) => {
                        return Err(GeneratorError::other(format!(
                            "producer #{} panicked",
                            index
                        )))
                    }
                }
            }
            Ok(emitted)
        })
    }

    fn produce(
        &self,
        index: usize,
        sender: &Sender<String>,
        budget: Option<&AtomicU64>,
    ) -> Result<()> {
        let mut rng = self.producer_rng(index);

        loop {
            if self.is_shutdown() || !Self::claim(budget) {
                return Ok(());
            }

            let line = self.next_line(&mut rng);
            sender
                .send(line)
                .map_err(|_| GeneratorError::ChannelSendError)?;

            if self.wait(self.interval) {
                return Ok(());
            }
        }
    }

    /// Take one line from the shared budget; `true` when unlimited
    fn claim(budget: Option<&AtomicU64>) -> bool {
        match budget {
            None => true,
            Some(remaining) => remaining
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
                .is_ok(),
        }
    }

    fn producer_rng(&self, index: usize) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
            None => StdRng::from_entropy(),
        }
    }

    fn is_shutdown(&self) -> bool {
        !matches!(self.shutdown_rx.try_recv(), Err(TryRecvError::Empty))
    }

    /// Sleep for `delay`; `true` if shutdown was requested meanwhile
    fn wait(&self, delay: Duration) -> bool {
        !matches!(
            self.shutdown_rx.recv_timeout(delay),
            Err(RecvTimeoutError::Timeout)
        )
    }

    /// Write one line to every appender
    ///
    /// Each appender is isolated: an error or panic in one is logged and
    /// counted, and the remaining appenders still receive the line.
    fn write_line(
        appenders: &Arc<Mutex<Vec<Box<dyn Appender>>>>,
        line: &str,
        metrics: &Arc<GeneratorMetrics>,
    ) {
        let mut appenders = appenders.lock();
        let mut written = 0u64;
        metrics.record_write_attempts(appenders.len() as u64);

        for (idx, appender) in appenders.iter_mut().enumerate() {
            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(line)
            }));

            match append_result {
                Ok(Ok(())) => written += line.len() as u64 + 1,
                Ok(Err(e)) => {
                    tracing::error!(appender = appender.name(), index = idx, error = %e, "appender failed");
                    metrics.record_write_failure();
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    tracing::error!(
                        index = idx,
                        panic = %panic_msg,
                        "appender panicked, other appenders continue"
                    );
                    metrics.record_write_failure();
                }
            }
        }

        metrics.record_emitted(written);
    }

    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.lock();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }
}

impl Drop for Generator {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::error!(error = %e, "failed to flush appenders during shutdown");
        }

        let failures = self.metrics.write_failures();
        if failures > 0 {
            tracing::warn!(
                failures,
                failure_rate = self.metrics.failure_rate(),
                "generator shutting down with failed writes"
            );
        }
    }
}

/// Builder for constructing a [`Generator`] with a fluent API
///
/// # Example
/// ```
/// use fake_log_generator::prelude::*;
///
/// let generator = Generator::builder()
///     .config(GeneratorConfig::new().with_format(OutputFormat::Logfmt))
///     .seed(7)
///     .build()
///     .unwrap();
/// let line = generator.next_line(&mut rand::thread_rng());
/// assert!(line.starts_with("timestamp=\""));
/// ```
pub struct GeneratorBuilder {
    config: GeneratorConfig,
    appenders: Vec<Box<dyn Appender>>,
    trace_ids: Option<Arc<TraceIdAllocator>>,
    seed: Option<u64>,
}

impl GeneratorBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
            appenders: Vec::new(),
            trace_ids: None,
            seed: None,
        }
    }

    #[must_use]
    pub fn config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    /// Share a trace id counter with other generators
    #[must_use]
    pub fn trace_ids(mut self, trace_ids: Arc<TraceIdAllocator>) -> Self {
        self.trace_ids = Some(trace_ids);
        self
    }

    /// Seed the random sources (producer `i` uses `seed + i`)
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<Generator> {
        let trace_ids = self
            .trace_ids
            .unwrap_or_else(|| Arc::new(TraceIdAllocator::new()));
        let mut generator = Generator::with_trace_ids(self.config, trace_ids)?;
        generator.seed = self.seed;
        for appender in self.appenders {
            generator.add_appender(appender);
        }
        Ok(generator)
    }
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ZoneMode;
    use std::time::Instant;

    #[derive(Clone, Default)]
    struct Collect(Arc<Mutex<Vec<String>>>);

    impl Appender for Collect {
        fn append(&mut self, line: &str) -> Result<()> {
            self.0.lock().push(line.to_string());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "collect"
        }
    }

    struct Failing;

    impl Appender for Failing {
        fn append(&mut self, _line: &str) -> Result<()> {
            Err(GeneratorError::from(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn fast_config() -> GeneratorConfig {
        GeneratorConfig::new()
            .with_lines_per_second(10_000.0)
            .with_length_range(10, 20)
            .with_zone_mode(ZoneMode::Utc)
    }

    #[test]
    fn test_run_with_limit() {
        let sink = Collect::default();
        let generator = Generator::builder()
            .config(fast_config())
            .appender(sink.clone())
            .seed(1)
            .build()
            .unwrap();

        assert_eq!(generator.run(Some(5)).unwrap(), 5);
        assert_eq!(sink.0.lock().len(), 5);
        assert_eq!(generator.metrics().lines_emitted(), 5);
        assert_eq!(generator.factory().trace_ids().peek(), 6);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = Generator::new(GeneratorConfig::new().with_length_range(5, 1));
        assert!(matches!(result, Err(GeneratorError::InvalidConfiguration { .. })));

        let result = Generator::new(GeneratorConfig::new().with_lines_per_second(1e-20));
        assert!(matches!(result, Err(GeneratorError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_failing_appender_does_not_block_others() {
        let sink = Collect::default();
        let generator = Generator::builder()
            .config(fast_config())
            .appender(Failing)
            .appender(sink.clone())
            .build()
            .unwrap();

        generator.run(Some(3)).unwrap();
        assert_eq!(sink.0.lock().len(), 3);
        assert_eq!(generator.metrics().write_attempts(), 6);
        assert_eq!(generator.metrics().write_failures(), 3);
        assert_eq!(generator.metrics().failure_rate(), 50.0);
    }

    #[test]
    fn test_failure_rate_with_only_failing_appender() {
        let generator = Generator::builder()
            .config(fast_config())
            .appender(Failing)
            .build()
            .unwrap();

        generator.run(Some(3)).unwrap();
        assert_eq!(generator.metrics().lines_emitted(), 3);
        assert_eq!(generator.metrics().failure_rate(), 100.0);
    }

    #[test]
    fn test_shutdown_interrupts_sleep() {
        let generator = Generator::new(
            GeneratorConfig::new().with_lines_per_second(0.01),
        )
        .unwrap();
        let handle = generator.shutdown_handle();

        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            handle.trigger();
        });

        let start = Instant::now();
        let emitted = generator.run(None).unwrap();
        stopper.join().unwrap();

        assert_eq!(emitted, 1);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_triggered_before_run_emits_nothing() {
        let generator = Generator::new(fast_config()).unwrap();
        generator.shutdown_handle().trigger();
        assert!(generator.shutdown_handle().is_triggered());
        assert_eq!(generator.run(None).unwrap(), 0);
    }

    #[test]
    fn test_concurrent_run_respects_limit() {
        let sink = Collect::default();
        let generator = Generator::builder()
            .config(fast_config().with_producers(4).with_include_pid(false))
            .appender(sink.clone())
            .build()
            .unwrap();

        assert_eq!(generator.run(Some(100)).unwrap(), 100);
        let lines = sink.0.lock();
        assert_eq!(lines.len(), 100);
        assert!(lines.iter().all(|l| l.starts_with('{') && l.ends_with('}')));
    }

    #[test]
    fn test_seeded_lines_share_shape() {
        let generator = Generator::builder()
            .config(fast_config().with_format(OutputFormat::BsdSyslog))
            .build()
            .unwrap();
        let line = generator.next_line(&mut StdRng::seed_from_u64(3));
        assert!(line.starts_with("<13>"));
        assert!(line.contains(" localhost fake-app: "));
    }
}
