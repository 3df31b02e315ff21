//! Worker thread management
//!
//! Runs renders on dedicated worker threads. Each job carries its own
//! options and cancel token, and produces exactly one response.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{unbounded, Receiver, SendError, Sender};
use image::DynamicImage;

use crate::cancel::CancelToken;
use crate::error::{AsciiError, Result};
use crate::generator::Generator;
use crate::options::Options;

/// One render request
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub id: u64,
    pub image: Arc<DynamicImage>,
    pub options: Options,
    pub cancel: CancelToken,
}

impl RenderJob {
    pub fn new(id: u64, image: Arc<DynamicImage>, options: Options) -> Self {
        Self {
            id,
            image,
            options,
            cancel: CancelToken::new(),
        }
    }
}

/// Messages sent from main thread to workers
#[derive(Debug)]
pub enum WorkerMessage {
    Render(RenderJob),
    /// Shutdown signal
    Shutdown,
}

/// Responses sent from workers to main thread
#[derive(Debug)]
pub enum WorkerResponse {
    /// Rendering complete
    Complete {
        id: u64,
        image: DynamicImage,
        render_time: u64,
    },
    /// Cancelled mid-render, with the rows drawn so far
    Cancelled {
        id: u64,
        partial: DynamicImage,
        render_time: u64,
    },
    /// Error occurred
    Error { id: u64, message: String },
}

impl WorkerResponse {
    pub fn id(&self) -> u64 {
        match self {
            WorkerResponse::Complete { id, .. }
            | WorkerResponse::Cancelled { id, .. }
            | WorkerResponse::Error { id, .. } => *id,
        }
    }
}

/// Handle to worker threads and channels
pub struct WorkerHandle {
    pub request_tx: Sender<WorkerMessage>,
    pub response_rx: Receiver<WorkerResponse>,
    threads: Vec<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Queue a job; fails only when every worker is gone
    pub fn submit(&self, job: RenderJob) -> std::result::Result<(), SendError<WorkerMessage>> {
        self.request_tx.send(WorkerMessage::Render(job))
    }

    pub fn worker_count(&self) -> usize {
        self.threads.len()
    }

    /// Shutdown all worker threads
    pub fn shutdown(self) {
        // Send shutdown signal to all workers
        for _ in &self.threads {
            let _ = self.request_tx.send(WorkerMessage::Shutdown);
        }

        // Wait for threads to finish
        for handle in self.threads {
            let _ = handle.join();
        }
    }
}

/// Spawn `count` render workers (at least one)
pub fn spawn_workers(count: usize) -> Result<WorkerHandle> {
    let (request_tx, request_rx) = unbounded::<WorkerMessage>();
    let (response_tx, response_rx) = unbounded::<WorkerResponse>();

    let mut threads = Vec::new();
    for id in 0..count.max(1) {
        let rx = request_rx.clone();
        let tx = response_tx.clone();

        let handle = thread::Builder::new()
            .name(format!("render-worker-{}", id))
            .spawn(move || {
                worker_loop(rx, tx);
            })?;

        threads.push(handle);
    }

    log::debug!("spawned {} render workers", threads.len());

    Ok(WorkerHandle {
        request_tx,
        response_rx,
        threads,
    })
}

/// Main worker loop - processes messages until shutdown
fn worker_loop(rx: Receiver<WorkerMessage>, tx: Sender<WorkerResponse>) {
    while let Ok(msg) = rx.recv() {
        match msg {
            WorkerMessage::Shutdown => break,
            WorkerMessage::Render(job) => {
                let _ = tx.send(run_job(job));
            }
        }
    }
}

fn run_job(job: RenderJob) -> WorkerResponse {
    let start = Instant::now();
    let generator = Generator::new(job.options);
    let result = generator.generate(job.image.as_ref(), &job.cancel);
    let render_time = start.elapsed().as_millis() as u64;

    match result {
        Ok(image) => WorkerResponse::Complete {
            id: job.id,
            image,
            render_time,
        },
        Err(AsciiError::Cancelled(partial)) => {
            log::info!("job {} cancelled after {} ms", job.id, render_time);
            WorkerResponse::Cancelled {
                id: job.id,
                partial: *partial,
                render_time,
            }
        }
        Err(e) => {
            log::warn!("job {} failed: {}", job.id, e);
            WorkerResponse::Error {
                id: job.id,
                message: e.to_string(),
            }
        }
    }
}
