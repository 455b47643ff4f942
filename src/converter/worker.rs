use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};

use super::{convert_with_cancel, ConvertOptions};
use crate::decoder::RasterImage;
use crate::error::ConvertError;
use crate::grid::{Grid, Theme};
use crate::utils::logger;

/// Cooperative cancellation flag shared between a caller and a running conversion.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Identifies one submitted conversion. Later submissions get larger tickets.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Ticket(pub u64);

pub struct ConversionOutcome {
    pub ticket: Ticket,
    pub result: Result<Grid, ConvertError>,
}

struct Job {
    ticket: Ticket,
    image: Arc<RasterImage>,
    rows: usize,
    cols: usize,
    options: ConvertOptions,
    cancel: CancelToken,
}

/// Runs conversions off the calling thread with last-request-wins semantics.
///
/// Submitting a request cancels the one in flight. Results of superseded requests are
/// never handed back, neither by the worker nor by the `*_latest` accessors.
pub struct ConversionWorker {
    jobs: Option<Sender<Job>>,
    outcomes: Receiver<ConversionOutcome>,
    latest: Arc<AtomicU64>,
    in_flight: Option<CancelToken>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl ConversionWorker {
    pub fn spawn(theme: Theme) -> Self {
        let (job_sender, job_receiver) = crossbeam_channel::unbounded::<Job>();
        let (outcome_sender, outcome_receiver) = crossbeam_channel::unbounded();
        let latest = Arc::new(AtomicU64::new(0));

        let worker_latest = Arc::clone(&latest);
        let handle = std::thread::spawn(move || {
            run_jobs(job_receiver, outcome_sender, worker_latest, theme);
        });

        Self {
            jobs: Some(job_sender),
            outcomes: outcome_receiver,
            latest,
            in_flight: None,
            handle: Some(handle),
        }
    }

    /// Queues a conversion and supersedes every earlier one.
    pub fn submit(
        &mut self,
        image: Arc<RasterImage>,
        rows: usize,
        cols: usize,
        options: ConvertOptions,
    ) -> Ticket {
        let ticket = Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1);
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }

        let cancel = CancelToken::new();
        self.in_flight = Some(cancel.clone());

        let job = Job {
            ticket,
            image,
            rows,
            cols,
            options,
            cancel,
        };
        if let Some(jobs) = &self.jobs {
            if jobs.send(job).is_err() {
                crate::utils::logger::error("Conversion worker is gone, request dropped");
            }
        }
        ticket
    }

    pub fn latest_ticket(&self) -> Option<Ticket> {
        match self.latest.load(Ordering::SeqCst) {
            0 => None,
            n => Some(Ticket(n)),
        }
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Non-blocking: the outcome of the newest request, if it has finished.
    pub fn poll_latest(&self) -> Option<ConversionOutcome> {
        let mut found = None;
        loop {
            match self.outcomes.try_recv() {
                Ok(outcome) if self.is_current(outcome.ticket) => found = Some(outcome),
                Ok(stale) => {
                    crate::utils::logger::debug(&format!(
                        "Discarding stale outcome {:?}",
                        stale.ticket
                    ));
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        found
    }

    /// Waits up to `timeout` for the outcome of the newest request.
    pub fn recv_latest(&self, timeout: Duration) -> Option<ConversionOutcome> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.outcomes.recv_timeout(remaining) {
                Ok(outcome) if self.is_current(outcome.ticket) => return Some(outcome),
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }
}

impl Drop for ConversionWorker {
    fn drop(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        // Closing the job channel ends the worker loop.
        self.jobs = None;
        if let Some(handle) = self.handle.take() {
            if let Err(payload) = handle.join() {
                crate::utils::logger::error(&format!(
                    "Conversion worker panicked: {}",
                    logger::panic_message(payload.as_ref())
                ));
            }
        }
    }
}

fn run_jobs(
    jobs: Receiver<Job>,
    outcomes: Sender<ConversionOutcome>,
    latest: Arc<AtomicU64>,
    theme: Theme,
) {
    crate::utils::logger::debug("Conversion worker started");

    while let Ok(mut job) = jobs.recv() {
        // Drain to the newest request; everything older is already superseded.
        loop {
            match jobs.try_recv() {
                Ok(newer) => {
                    crate::utils::logger::debug(&format!(
                        "Skipping superseded job {:?}",
                        job.ticket
                    ));
                    job = newer;
                }
                Err(_) => break,
            }
        }

        if latest.load(Ordering::SeqCst) != job.ticket.0 {
            continue;
        }

        crate::utils::logger::debug(&format!(
            "Converting job {:?}: {}x{} -> {}x{}",
            job.ticket,
            job.image.width(),
            job.image.height(),
            job.rows,
            job.cols
        ));
        let result =
            convert_with_cancel(&job.image, job.rows, job.cols, &job.options, &theme, &job.cancel);

        if matches!(result, Err(ConvertError::Cancelled))
            || latest.load(Ordering::SeqCst) != job.ticket.0
        {
            crate::utils::logger::debug(&format!("Job {:?} superseded", job.ticket));
            continue;
        }
        if outcomes
            .send(ConversionOutcome {
                ticket: job.ticket,
                result,
            })
            .is_err()
        {
            break;
        }
    }

    crate::utils::logger::debug("Conversion worker exiting");
}
