use crate::domain::jobs::PhotoJob;
use flume::{Receiver, Sender};
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tracing::{debug, error, info};

/// Name of the dedicated transform thread.
pub const INGEST_THREAD_NAME: &str = "ingest-worker";

/// Work run on the ingest lane for every accepted photo.
pub trait JobHandler: Send + 'static {
    fn handle(&self, job: PhotoJob);
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("ingest lane is no longer accepting photos")]
    LaneClosed,
}

/// Producer side of the ingest lane. Cheap to clone, one per request is fine.
#[derive(Clone, Debug)]
pub struct IngestHandle {
    sender: Sender<PhotoJob>,
}

impl IngestHandle {
    /// Hand `job` to the lane, blocking until the worker takes it.
    ///
    /// `Ok` only means the job was accepted, not that any variant was stored.
    pub fn submit_blocking(&self, job: PhotoJob) -> Result<(), SubmitError> {
        debug!(filename = %job.filename, "sending photo to ingest lane");
        self.sender.send(job).map_err(|_| SubmitError::LaneClosed)
    }

    /// Async flavour of [`submit_blocking`](Self::submit_blocking). A waiting
    /// submitter is a parked future and holds no thread.
    pub async fn submit(&self, job: PhotoJob) -> Result<(), SubmitError> {
        debug!(filename = %job.filename, "sending photo to ingest lane");
        self.sender
            .send_async(job)
            .await
            .map_err(|_| SubmitError::LaneClosed)
    }
}

/// The single thread that runs every crop and resize, one job at a time.
pub struct IngestWorker {
    thread: JoinHandle<()>,
}

impl IngestWorker {
    /// Spawn the lane. Submissions are a rendezvous: nothing is buffered.
    pub fn start<H: JobHandler>(handler: H) -> io::Result<(IngestHandle, IngestWorker)> {
        let (sender, receiver) = flume::bounded(0);
        let thread = thread::Builder::new()
            .name(INGEST_THREAD_NAME.to_string())
            .spawn(move || receive_photos(handler, receiver))?;

        Ok((IngestHandle { sender }, IngestWorker { thread }))
    }

    /// Wait for the lane to stop. It only stops once every handle is dropped.
    pub fn join(self) -> thread::Result<()> {
        self.thread.join()
    }
}

fn receive_photos<H: JobHandler>(handler: H, jobs: Receiver<PhotoJob>) {
    info!("ingest lane started on dedicated thread");

    while let Ok(job) = jobs.recv() {
        let filename = job.filename.clone();
        info!(filename = %filename, "received photo");

        if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(|| handler.handle(job))) {
            error!(
                filename = %filename,
                "photo processing panicked: {}",
                panic_message(panic.as_ref())
            );
        }
    }

    info!("ingest lane stopped, no submitters left");
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;
    use std::sync::mpsc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn job(name: &str) -> PhotoJob {
        PhotoJob::new(DynamicImage::new_rgb8(4, 3), name)
    }

    /// Records entry and exit of every job, holding the lane for a moment.
    struct RecordingHandler {
        events: Arc<Mutex<Vec<String>>>,
        hold: Duration,
    }

    impl JobHandler for RecordingHandler {
        fn handle(&self, job: PhotoJob) {
            self.events.lock().unwrap().push(format!("enter:{}", job.filename));
            if job.filename == "boom" {
                panic!("corrupt photo");
            }
            thread::sleep(self.hold);
            self.events.lock().unwrap().push(format!("exit:{}", job.filename));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_jobs_never_interleave() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let (handle, worker) = IngestWorker::start(RecordingHandler {
            events: events.clone(),
            hold: Duration::from_millis(15),
        })
        .unwrap();

        let submissions: Vec<_> = (0..8)
            .map(|i| {
                let handle = handle.clone();
                tokio::spawn(async move { handle.submit(job(&format!("photo{}", i))).await })
            })
            .collect();
        for submission in submissions {
            submission.await.unwrap().unwrap();
        }

        drop(handle);
        tokio::task::spawn_blocking(move || worker.join())
            .await
            .unwrap()
            .unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 16);
        for pair in events.chunks(2) {
            let entered = pair[0].strip_prefix("enter:").expect("expected enter");
            let exited = pair[1].strip_prefix("exit:").expect("expected exit");
            assert_eq!(entered, exited);
        }
    }

    #[test]
    fn test_panicking_job_does_not_stop_lane() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let (handle, worker) = IngestWorker::start(RecordingHandler {
            events: events.clone(),
            hold: Duration::ZERO,
        })
        .unwrap();

        handle.submit_blocking(job("boom")).unwrap();
        handle.submit_blocking(job("fine")).unwrap();
        drop(handle);
        worker.join().unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec!["enter:boom", "enter:fine", "exit:fine"]
        );
    }

    /// Blocks inside the first job until the gate is opened.
    struct GatedHandler {
        gate: Mutex<mpsc::Receiver<()>>,
    }

    impl JobHandler for GatedHandler {
        fn handle(&self, _job: PhotoJob) {
            let _ = self.gate.lock().unwrap().recv();
        }
    }

    #[test]
    fn test_submission_waits_for_busy_lane() {
        let (open_gate, gate) = mpsc::channel();
        let (handle, worker) = IngestWorker::start(GatedHandler {
            gate: Mutex::new(gate),
        })
        .unwrap();

        // Accepted at once: the lane is idle.
        handle.submit_blocking(job("first")).unwrap();

        let accepted = Arc::new(AtomicBool::new(false));
        let producer = {
            let handle = handle.clone();
            let accepted = accepted.clone();
            thread::spawn(move || {
                handle.submit_blocking(job("second")).unwrap();
                accepted.store(true, Ordering::SeqCst);
            })
        };

        thread::sleep(Duration::from_millis(100));
        assert!(!accepted.load(Ordering::SeqCst), "lane buffered a job while busy");

        open_gate.send(()).unwrap();
        open_gate.send(()).unwrap();
        producer.join().unwrap();
        assert!(accepted.load(Ordering::SeqCst));

        drop(handle);
        worker.join().unwrap();
    }

    #[test]
    fn test_waiting_submissions_leave_blocking_pool_free() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .max_blocking_threads(2)
            .enable_all()
            .build()
            .unwrap();
        let (open_gate, gate) = mpsc::channel();
        let (handle, worker) = IngestWorker::start(GatedHandler {
            gate: Mutex::new(gate),
        })
        .unwrap();

        runtime.block_on(async {
            // Lane is now stuck inside the first job.
            handle.submit(job("first")).await.unwrap();

            let waiting: Vec<_> = (0..5)
                .map(|i| {
                    let handle = handle.clone();
                    tokio::spawn(async move { handle.submit(job(&format!("queued{}", i))).await })
                })
                .collect();
            tokio::time::sleep(Duration::from_millis(100)).await;
            assert!(waiting.iter().all(|w| !w.is_finished()));

            // A decode on the blocking pool must not queue behind them.
            let decoded = tokio::time::timeout(
                Duration::from_secs(2),
                tokio::task::spawn_blocking(|| 42),
            )
            .await;
            assert_eq!(decoded.expect("blocking pool starved").unwrap(), 42);

            for _ in 0..6 {
                open_gate.send(()).unwrap();
            }
            for w in waiting {
                w.await.unwrap().unwrap();
            }
        });

        drop(handle);
        worker.join().unwrap();
    }

    #[tokio::test]
    async fn test_async_submit_after_lane_stopped() {
        let (sender, receiver) = flume::bounded(0);
        drop(receiver);
        let handle = IngestHandle { sender };
        assert!(matches!(
            handle.submit(job("late")).await,
            Err(SubmitError::LaneClosed)
        ));
    }

    #[test]
    fn test_submit_after_lane_stopped() {
        let (sender, receiver) = flume::bounded(0);
        drop(receiver);
        let handle = IngestHandle { sender };
        assert!(matches!(
            handle.submit_blocking(job("late")),
            Err(SubmitError::LaneClosed)
        ));
    }

    #[test]
    fn test_worker_thread_is_named() {
        struct NameRecorder(Arc<Mutex<Option<String>>>);
        impl JobHandler for NameRecorder {
            fn handle(&self, _job: PhotoJob) {
                *self.0.lock().unwrap() = thread::current().name().map(str::to_string);
            }
        }

        let seen = Arc::new(Mutex::new(None));
        let (handle, worker) = IngestWorker::start(NameRecorder(seen.clone())).unwrap();
        handle.submit_blocking(job("named")).unwrap();
        drop(handle);
        worker.join().unwrap();

        assert_eq!(seen.lock().unwrap().as_deref(), Some(INGEST_THREAD_NAME));
    }
}
