use std::path::Path;
use std::time::Instant;

use crate::detection::domain::blob_detector::BlobDetector;
use crate::pipeline::frame_executor::FrameExecutor;
use crate::pipeline::pipeline_logger::{NullPipelineLogger, PipelineLogger};
use crate::shared::frame::Frame;
use crate::video::domain::detection_sink::DetectionSink;
use crate::video::domain::frame_source::FrameSource;

const DEFAULT_BATCH_SIZE: usize = 16;

/// Totals for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: usize,
    pub detections: usize,
    pub empty_frames: usize,
}

/// Frame sequence pipeline: read → detect (batched) → sinks.
///
/// Frames are read in batches so the executor can spread one batch over
/// several threads; sinks always see frames in id order.
pub struct DetectFramesUseCase {
    source: Box<dyn FrameSource>,
    detector: Box<dyn BlobDetector>,
    executor: Box<dyn FrameExecutor>,
    sinks: Vec<Box<dyn DetectionSink>>,
    logger: Box<dyn PipelineLogger>,
    batch_size: usize,
}

impl DetectFramesUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn BlobDetector>,
        executor: Box<dyn FrameExecutor>,
        sinks: Vec<Box<dyn DetectionSink>>,
    ) -> Self {
        Self {
            source,
            detector,
            executor,
            sinks,
            logger: Box::new(NullPipelineLogger),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Processes every frame of `input` and returns run totals.
    ///
    /// A frame that fails to decode or a sink that fails to write aborts the
    /// run. Frames the detector rejects only produce empty detection lists.
    pub fn execute(&mut self, input: &Path) -> Result<RunSummary, Box<dyn std::error::Error>> {
        let metadata = self.source.open(input)?;
        self.logger.info(&format!(
            "Processing {} ({} frames, first {}x{})",
            input.display(),
            metadata.total_frames,
            metadata.width,
            metadata.height
        ));

        let mut stage = BatchStage {
            detector: &*self.detector,
            executor: &*self.executor,
            sinks: &mut self.sinks,
            logger: &mut *self.logger,
            total: metadata.total_frames,
            summary: RunSummary::default(),
        };

        let mut batch: Vec<Frame> = Vec::with_capacity(self.batch_size);
        let mut result = Ok(());
        for frame in self.source.frames() {
            match frame {
                Ok(frame) => batch.push(frame),
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
            if batch.len() == self.batch_size {
                if let Err(e) = stage.process(&batch) {
                    result = Err(e);
                    break;
                }
                batch.clear();
            }
        }
        if result.is_ok() && !batch.is_empty() {
            result = stage.process(&batch);
        }
        self.source.close();
        result?;

        for sink in stage.sinks.iter_mut() {
            sink.finish()?;
        }
        let summary = stage.summary;
        stage.logger.summary();
        Ok(summary)
    }
}

/// Borrowed view of the use case that runs one batch at a time.
struct BatchStage<'a> {
    detector: &'a dyn BlobDetector,
    executor: &'a dyn FrameExecutor,
    sinks: &'a mut Vec<Box<dyn DetectionSink>>,
    logger: &'a mut dyn PipelineLogger,
    total: usize,
    summary: RunSummary,
}

impl BatchStage<'_> {
    fn process(&mut self, batch: &[Frame]) -> Result<(), Box<dyn std::error::Error>> {
        let t0 = Instant::now();
        let results = self.executor.run(self.detector, batch);
        let per_frame_ms = t0.elapsed().as_secs_f64() * 1000.0 / batch.len() as f64;

        for (frame, detections) in batch.iter().zip(&results) {
            self.logger.timing("detect", per_frame_ms);

            let t0 = Instant::now();
            for sink in self.sinks.iter_mut() {
                sink.consume(frame, detections)?;
            }
            self.logger.timing("sink", t0.elapsed().as_secs_f64() * 1000.0);

            self.summary.frames += 1;
            self.summary.detections += detections.len();
            if detections.is_empty() {
                self.summary.empty_frames += 1;
            }
            self.logger.metric("detections", detections.len() as f64);
            self.logger.progress(self.summary.frames, self.total);
        }
        Ok(())
    }
}
