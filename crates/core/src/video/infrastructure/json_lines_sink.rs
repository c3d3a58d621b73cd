use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::shared::detection_record::DetectionRecord;
use crate::shared::frame::Frame;
use crate::video::domain::detection_sink::DetectionSink;

#[derive(Serialize)]
struct FrameLine<'a> {
    frame_id: u64,
    detections: &'a [DetectionRecord],
}

/// Writes one JSON object per frame, one per line.
///
/// Frames with no detections produce `"detections":[]`, so the output has
/// exactly one line per frame.
pub struct JsonLinesSink<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl JsonLinesSink<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write + Send> DetectionSink for JsonLinesSink<W> {
    fn consume(
        &mut self,
        frame: &Frame,
        detections: &[DetectionRecord],
    ) -> Result<(), Box<dyn std::error::Error>> {
        let line = FrameLine {
            frame_id: frame.id(),
            detections,
        };
        serde_json::to_writer(&mut self.out, &line)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.out.flush()?;
        Ok(())
    }
}
