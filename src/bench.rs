//! Concurrent load harness for the splitting pipeline.
//!
//! Simulates production load by fanning independent splitter instances out
//! over a fixed-size worker pool. Each worker owns its own backend handle and
//! tokenizer, so the measured path is exactly the unsynchronized per-call
//! shape the pipeline guarantees.

use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tokenizers::Tokenizer;

use crate::backend::TritonBackend;
use crate::config::SplitConfig;
use crate::error::{Error, Result};
use crate::split::Splitter;

/// Text scored by every benchmark request (~350 chars).
const SAMPLE_TEXT: &str = "Machine learning is a subset of artificial intelligence. \
It enables computers to learn from data. \
Deep learning is a subset of machine learning. \
Neural networks are the foundation of deep learning. \
These technologies have revolutionized many industries. \
Natural language processing is one application area.";

/// Concurrency levels exercised by one benchmark run.
const CLIENT_COUNTS: [usize; 6] = [1, 2, 4, 8, 16, 32];

/// Requests issued before measurements start.
const WARMUP_ITERATIONS: usize = 10;

/// Settings for one benchmark run.
pub struct Benchmark {
    host: String,
    port: u16,
    model: String,
    requests_per_client: usize,
    tokenizer: Tokenizer,
    config: SplitConfig,
}

/// Aggregate metrics for one concurrency level.
#[derive(Debug, Clone, Copy)]
pub struct BenchResult {
    /// Wall-clock duration of the whole level, in seconds.
    pub total_time_sec: f64,
    /// Characters scored per second across all clients.
    pub throughput_chars_per_sec: f64,
    /// Mean per-request latency in milliseconds.
    pub avg_latency_ms: f64,
    /// 99th-percentile per-request latency in milliseconds.
    pub p99_latency_ms: f64,
}

impl Benchmark {
    /// Creates a benchmark run against the given server and model.
    pub fn new(
        host: &str,
        port: u16,
        model: &str,
        requests_per_client: usize,
        tokenizer: Tokenizer,
        config: SplitConfig,
    ) -> Self {
        Self {
            host: host.to_string(),
            port,
            model: model.to_string(),
            requests_per_client,
            tokenizer,
            config,
        }
    }

    /// Runs the warmup plus every concurrency level, printing a result table.
    pub fn run(&self) -> Result<()> {
        println!("{}", "=".repeat(80));
        println!(" satsplit concurrent benchmark");
        println!("{}", "=".repeat(80));
        println!("  Server: {}:{}", self.host, self.port);
        println!("  Model: {}", self.model);
        println!("  Requests per client: {}", self.requests_per_client);
        println!("  Text length: {} chars", SAMPLE_TEXT.chars().count());
        println!("{}", "=".repeat(80));

        self.warmup()?;

        println!(
            "  {:>8} | {:>12} | {:>15} | {:>12} | {:>12}",
            "Clients", "Total Time", "Throughput", "Avg Latency", "P99 Latency"
        );
        println!("  {}", "-".repeat(70));

        for &clients in &CLIENT_COUNTS {
            match self.run_with_clients(clients) {
                Ok(result) => println!(
                    "  {:>8} | {:>10.2} s | {:>11.0} c/s | {:>9.2} ms | {:>9.2} ms",
                    clients,
                    result.total_time_sec,
                    result.throughput_chars_per_sec,
                    result.avg_latency_ms,
                    result.p99_latency_ms
                ),
                Err(err) => println!("  {:>8} | FAILED: {}", clients, err),
            }
        }

        println!("{}", "=".repeat(80));
        Ok(())
    }

    fn warmup(&self) -> Result<()> {
        let splitter = self.connect()?;
        let bar = ProgressBar::new(WARMUP_ITERATIONS as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("Warming up {bar:30} {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        for _ in 0..WARMUP_ITERATIONS {
            splitter.split(SAMPLE_TEXT)?;
            bar.inc(1);
        }

        bar.finish_and_clear();
        Ok(())
    }

    /// Measures one concurrency level. Every worker owns its own connection,
    /// tokenizer, and splitter.
    fn run_with_clients(&self, clients: usize) -> Result<BenchResult> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(clients)
            .build()
            .map_err(|e| Error::Backend(format!("failed to build worker pool: {}", e)))?;

        let started = Instant::now();
        let per_client: Vec<Vec<f64>> = pool.install(|| {
            (0..clients)
                .into_par_iter()
                .map(|_| self.client_worker())
                .collect::<Result<Vec<Vec<f64>>>>()
        })?;
        let total_time_sec = started.elapsed().as_secs_f64();

        let latencies: Vec<f64> = per_client.into_iter().flatten().collect();
        let total_chars =
            (clients * self.requests_per_client * SAMPLE_TEXT.chars().count()) as f64;
        let avg_latency_ms =
            latencies.iter().sum::<f64>() / latencies.len().max(1) as f64;

        Ok(BenchResult {
            total_time_sec,
            throughput_chars_per_sec: total_chars / total_time_sec,
            avg_latency_ms,
            p99_latency_ms: percentile(&latencies, 99.0),
        })
    }

    fn client_worker(&self) -> Result<Vec<f64>> {
        let splitter = self.connect()?;
        let mut latencies = Vec::with_capacity(self.requests_per_client);

        for _ in 0..self.requests_per_client {
            let started = Instant::now();
            splitter.split(SAMPLE_TEXT)?;
            latencies.push(started.elapsed().as_secs_f64() * 1_000.0);
        }

        Ok(latencies)
    }

    fn connect(&self) -> Result<Splitter<TritonBackend>> {
        let backend = TritonBackend::new(&self.host, self.port, &self.model)?;
        backend.ensure_ready()?;
        Splitter::new(backend, self.tokenizer.clone(), self.config.clone())
    }
}

/// Rank-selected percentile, no interpolation: `ceil(p/100 * n) - 1` into the
/// sorted values, clamped to the valid range.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let index = ((p / 100.0 * sorted.len() as f64).ceil() as usize).saturating_sub(1);
    sorted[index.min(sorted.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_p99_selects_last_of_ten() {
        let latencies: Vec<f64> = (1..=10).map(|i| (i * 10) as f64).collect();
        assert_eq!(percentile(&latencies, 99.0), 100.0);
    }

    #[test]
    fn test_p50_selects_fifth_of_ten() {
        let latencies: Vec<f64> = (1..=10).map(|i| (i * 10) as f64).collect();
        assert_eq!(percentile(&latencies, 50.0), 50.0);
    }

    #[test]
    fn test_percentile_sorts_input() {
        let latencies = vec![30.0, 10.0, 20.0];
        assert_eq!(percentile(&latencies, 100.0), 30.0);
        assert_eq!(percentile(&latencies, 1.0), 10.0);
    }

    #[test]
    fn test_percentile_of_empty_is_zero() {
        assert_eq!(percentile(&[], 99.0), 0.0);
    }

    #[test]
    fn test_percentile_single_value() {
        assert_eq!(percentile(&[42.0], 99.0), 42.0);
        assert_eq!(percentile(&[42.0], 1.0), 42.0);
    }
}
