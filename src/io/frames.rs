//! JSON ingest and emit for timestamped detection frames.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::io::timestamp::{format_iso, parse_iso};
use crate::tracker::{Detection, Label};

/// One input frame, timestamp resolved to seconds since the epoch.
#[derive(Debug, Clone)]
pub struct Frame {
    pub ts: f64,
    pub detections: Vec<Detection>,
}

/// One output frame: the labels the tracker emitted at a timestamp.
#[derive(Debug, Clone)]
pub struct FrameLabels {
    pub ts: f64,
    pub labels: Vec<Label>,
}

#[derive(Debug, Deserialize)]
struct FrameRecord {
    timestamp: String,
    detections: Vec<DetectionRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DetectionRecord {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

#[derive(Debug, Serialize)]
struct OutputRecord {
    timestamp: String,
    tracks: Vec<TrackRecord>,
}

#[derive(Debug, Serialize)]
struct TrackRecord {
    id: u64,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

/// Load a chronological frame stream from a JSON file.
///
/// Rejects the whole stream on the first detection with non-positive width
/// or height, naming the offending frame timestamp.
pub fn load_frames(path: &Path) -> Result<Vec<Frame>, Error> {
    let file = File::open(path)?;
    let records: Vec<FrameRecord> = serde_json::from_reader(BufReader::new(file))?;

    let mut frames = Vec::with_capacity(records.len());
    for record in records {
        let ts = parse_iso(&record.timestamp)?;
        let mut detections = Vec::with_capacity(record.detections.len());
        for (idx, det) in record.detections.iter().enumerate() {
            if det.w <= 0.0 || det.h <= 0.0 {
                return Err(Error::MalformedInput {
                    timestamp: record.timestamp.clone(),
                    reason: format!(
                        "detection {idx} has non-positive size (w = {}, h = {})",
                        det.w, det.h
                    ),
                });
            }
            detections.push(Detection::new(det.x, det.y, det.w, det.h));
        }
        frames.push(Frame { ts, detections });
    }

    Ok(frames)
}

/// Write the labeled frames as JSON, one object per input frame in order.
///
/// Each track entry carries the raw associated detection rectangle, in the
/// order the detections arrived that frame.
pub fn save_labels(path: &Path, frames: &[FrameLabels]) -> Result<(), Error> {
    let records: Vec<OutputRecord> = frames
        .iter()
        .map(|frame| OutputRecord {
            timestamp: format_iso(frame.ts),
            tracks: frame
                .labels
                .iter()
                .map(|label| TrackRecord {
                    id: label.track_id,
                    x: label.det.x,
                    y: label.det.y,
                    w: label.det.w,
                    h: label.det.h,
                })
                .collect(),
        })
        .collect();

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_frames() {
        let file = write_temp(
            r#"[
              {"timestamp": "2025-03-24T18:00:00.000000",
               "detections": [{"x": 0.5, "y": 0.5, "w": 0.1, "h": 0.1}]},
              {"timestamp": "2025-03-24T18:00:00.033000", "detections": []}
            ]"#,
        );

        let frames = load_frames(file.path()).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].detections.len(), 1);
        assert_eq!(frames[0].detections[0], Detection::new(0.5, 0.5, 0.1, 0.1));
        assert!(frames[1].ts > frames[0].ts);
    }

    #[test]
    fn test_load_rejects_non_positive_size() {
        let file = write_temp(
            r#"[{"timestamp": "2025-03-24T18:00:00",
                 "detections": [{"x": 0.5, "y": 0.5, "w": 0.0, "h": 0.1}]}]"#,
        );

        let err = load_frames(file.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("2025-03-24T18:00:00"));
        assert!(message.contains("non-positive"));
    }

    #[test]
    fn test_load_rejects_missing_field() {
        let file = write_temp(r#"[{"timestamp": "2025-03-24T18:00:00"}]"#);
        assert!(matches!(
            load_frames(file.path()),
            Err(Error::Json(_))
        ));
    }
}
