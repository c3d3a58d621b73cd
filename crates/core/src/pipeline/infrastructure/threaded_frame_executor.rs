use crate::detection::domain::blob_detector::BlobDetector;
use crate::pipeline::frame_executor::FrameExecutor;
use crate::shared::detection_record::DetectionRecord;
use crate::shared::frame::Frame;

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

/// Fans a batch of frames out to a fixed pool of worker threads.
///
/// Layout: `feeder → [worker × N] → collector`
///
/// The detector is shared by reference since it holds no per-frame state.
/// Workers tag each result with its input index so the collector can restore
/// input order regardless of completion order.
pub struct ThreadedFrameExecutor {
    workers: usize,
    channel_capacity: usize,
}

impl ThreadedFrameExecutor {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Default for ThreadedFrameExecutor {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(workers)
    }
}

impl FrameExecutor for ThreadedFrameExecutor {
    fn run(&self, detector: &dyn BlobDetector, frames: &[Frame]) -> Vec<Vec<DetectionRecord>> {
        if frames.is_empty() {
            return Vec::new();
        }
        let cap = self.channel_capacity;
        let workers = self.workers.min(frames.len());

        let (job_tx, job_rx) = crossbeam_channel::bounded::<(usize, &Frame)>(cap);
        let (result_tx, result_rx) =
            crossbeam_channel::bounded::<(usize, Vec<DetectionRecord>)>(cap);

        let mut results: Vec<Vec<DetectionRecord>> = vec![Vec::new(); frames.len()];

        std::thread::scope(|scope| {
            scope.spawn(move || {
                for job in frames.iter().enumerate() {
                    if job_tx.send(job).is_err() {
                        break;
                    }
                }
            });

            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    for (index, frame) in job_rx {
                        let detections = detector.predict(Some(frame));
                        if result_tx.send((index, detections)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(job_rx);
            drop(result_tx);

            for (index, detections) in result_rx {
                results[index] = detections;
            }
        });

        results
    }
}
