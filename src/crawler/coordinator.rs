//! Batch coordinator - main run orchestration logic
//!
//! This module contains the loop that ties a run together:
//! - Scanning every input as one logical stream of lines
//! - Answering URLs from the resume cache or dispatching them to workers
//! - Draining worker results in completion order
//! - Promoting the temporary output file once everything succeeded
//!
//! The coordinator is the only writer of the output file; workers just return
//! rows.

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::input::InputSource;
use crate::crawler::resolver::RowResolver;
use crate::output::{CsvSink, ResumeCache, Row, RunSummary};
use crate::state::BatchState;
use crate::url::extract_url;
use crate::GrabberError;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinSet};

/// Main batch coordinator structure
pub struct Coordinator {
    config: Config,
    resolver: Arc<RowResolver>,
    cache: ResumeCache,
    state: BatchState,
    summary: RunSummary,
}

impl Coordinator {
    /// Creates a coordinator for a run
    ///
    /// Builds the shared HTTP client and loads the resume cache from the
    /// current output file, before any input is read.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(GrabberError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, GrabberError> {
        let fetcher = Fetcher::new(&config.fetch)?;
        let cache = ResumeCache::load(&config.output_path);
        Ok(Self::with_parts(config, RowResolver::new(fetcher), cache))
    }

    /// Creates a coordinator from prebuilt parts
    pub fn with_parts(config: Config, resolver: RowResolver, cache: ResumeCache) -> Self {
        Self {
            config,
            resolver: Arc::new(resolver),
            cache,
            state: BatchState::Idle,
            summary: RunSummary::default(),
        }
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Runs the batch over all inputs
    ///
    /// The output file is replaced only if every input was read and every
    /// dispatched task was accounted for. On any run-level error the
    /// temporary file is discarded and the previous output stays in place.
    ///
    /// Every call starts over from `Idle` with zeroed counters.
    pub async fn run(&mut self, inputs: &[InputSource]) -> Result<RunSummary, GrabberError> {
        self.state = BatchState::Idle;
        self.summary = RunSummary::default();

        tracing::info!(
            "Starting run over {} input(s), {} cached rows, up to {} concurrent fetches",
            inputs.len(),
            self.cache.len(),
            self.config.max_threads
        );

        let mut sink = match CsvSink::create(&self.config.output_path) {
            Ok(sink) => sink,
            Err(e) => {
                self.transition(BatchState::Aborted);
                return Err(e);
            }
        };

        if let Err(e) = self.scan_and_drain(inputs, &mut sink).await {
            tracing::error!("Run aborted, keeping previous output: {}", e);
            self.transition(BatchState::Aborted);
            return Err(e);
        }

        self.transition(BatchState::Finalizing);
        if let Err(e) = sink.finish() {
            tracing::error!("Failed to finalize output: {}", e);
            self.transition(BatchState::Aborted);
            return Err(e);
        }

        self.transition(BatchState::Done);
        tracing::info!("Run complete: {}", self.summary);

        Ok(self.summary)
    }

    async fn scan_and_drain(
        &mut self,
        inputs: &[InputSource],
        sink: &mut CsvSink,
    ) -> Result<(), GrabberError> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_threads.max(1)));
        let mut tasks: JoinSet<Option<Row>> = JoinSet::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut buf = Vec::new();

        self.transition(BatchState::Scanning);

        for input in inputs {
            tracing::debug!("Scanning {}", input);
            let mut reader = input.open().await.map_err(|source| GrabberError::Input {
                path: input.to_string(),
                source,
            })?;

            loop {
                buf.clear();
                let read = reader
                    .read_until(b'\n', &mut buf)
                    .await
                    .map_err(|source| GrabberError::Input {
                        path: input.to_string(),
                        source,
                    })?;
                if read == 0 {
                    break;
                }

                let line = String::from_utf8_lossy(&buf);
                let Some(url) = extract_url(&line) else {
                    self.summary.lines_without_url += 1;
                    continue;
                };

                if !seen.insert(url.to_string()) {
                    tracing::debug!("Skipping duplicate {}", url);
                    self.summary.duplicates += 1;
                    continue;
                }

                self.transition(BatchState::Dispatching);

                if let Some(row) = self.cache.get(url) {
                    tracing::debug!("Cache hit for {}", url);
                    sink.write(&row)?;
                    self.summary.cache_hits += 1;
                } else {
                    let permit = self.acquire_permit(&semaphore, &mut tasks, sink).await?;
                    let resolver = Arc::clone(&self.resolver);
                    let url = url.to_string();

                    tasks.spawn(async move {
                        let _permit = permit;
                        resolver.resolve(&url).await
                    });
                }

                self.transition(BatchState::Scanning);
            }
        }

        self.transition(BatchState::Draining);
        tracing::debug!("Input exhausted, waiting for {} task(s)", tasks.len());

        while let Some(result) = tasks.join_next().await {
            self.record(result, sink)?;
        }

        Ok(())
    }

    /// Waits for a free worker slot, writing any results that complete in
    /// the meantime
    async fn acquire_permit(
        &mut self,
        semaphore: &Arc<Semaphore>,
        tasks: &mut JoinSet<Option<Row>>,
        sink: &mut CsvSink,
    ) -> Result<OwnedSemaphorePermit, GrabberError> {
        loop {
            tokio::select! {
                biased;

                Some(result) = tasks.join_next() => self.record(result, sink)?,
                Ok(permit) = Arc::clone(semaphore).acquire_owned() => return Ok(permit),
                else => return Err(GrabberError::WorkerPoolClosed),
            }
        }
    }

    /// Writes a finished task's row, or accounts for why there is none
    fn record(
        &mut self,
        result: Result<Option<Row>, JoinError>,
        sink: &mut CsvSink,
    ) -> Result<(), GrabberError> {
        match result {
            Ok(Some(row)) => {
                sink.write(&row)?;
                self.summary.fetched += 1;
            }
            Ok(None) => self.summary.skipped += 1,
            Err(e) => {
                tracing::error!("Error resolving task: {}", e);
                self.summary.task_failures += 1;
            }
        }
        Ok(())
    }

    fn transition(&mut self, next: BatchState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal batch transition {} -> {}",
            self.state,
            next
        );
        tracing::trace!("Batch state {} -> {}", self.state, next);
        self.state = next;
    }
}

/// Runs a complete batch
///
/// # Example
///
/// ```no_run
/// use title_grabber::config::Config;
/// use title_grabber::crawler::{run_batch, InputSource};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_batch(Config::default(), &[InputSource::from_arg("urls.txt")]).await?;
/// println!("{}", summary);
/// # Ok(())
/// # }
/// ```
pub async fn run_batch(config: Config, inputs: &[InputSource]) -> Result<RunSummary, GrabberError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run(inputs).await
}
