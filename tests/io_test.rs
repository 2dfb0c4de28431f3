use std::fs;

use boxtrack_rs::driver::FrameDriver;
use boxtrack_rs::{io, TrackerConfig};

const INPUT_JSON: &str = r#"[
  {"timestamp": "2025-03-24T18:00:00.000000",
   "detections": [{"x": 0.2, "y": 0.2, "w": 0.1, "h": 0.1}]},
  {"timestamp": "2025-03-24T18:00:00.033000",
   "detections": [{"x": 0.8, "y": 0.8, "w": 0.1, "h": 0.1},
                  {"x": 0.21, "y": 0.2, "w": 0.1, "h": 0.1}]},
  {"timestamp": "2025-03-24T18:00:00.066000",
   "detections": []}
]"#;

fn run_pipeline(input: &str) -> String {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("input.json");
    let output_path = dir.path().join("output.json");
    fs::write(&input_path, input).unwrap();

    let frames = io::load_frames(&input_path).unwrap();
    let mut driver = FrameDriver::new(TrackerConfig::default());
    let outputs: Vec<_> = frames.iter().map(|f| driver.process(f)).collect();
    io::save_labels(&output_path, &outputs).unwrap();

    fs::read_to_string(&output_path).unwrap()
}

#[test]
fn test_output_mirrors_input_frames() {
    let output = run_pipeline(INPUT_JSON);
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let frames = parsed.as_array().unwrap();
    assert_eq!(frames.len(), 3);

    // Canonical timestamps, identical instants.
    assert_eq!(frames[0]["timestamp"], "2025-03-24T18:00:00.000000");
    assert_eq!(frames[1]["timestamp"], "2025-03-24T18:00:00.033000");

    // Frame 0: the single detection spawned id 0 and is echoed raw.
    let tracks0 = frames[0]["tracks"].as_array().unwrap();
    assert_eq!(tracks0.len(), 1);
    assert_eq!(tracks0[0]["id"], 0);
    assert_eq!(tracks0[0]["x"], 0.2);
    assert_eq!(tracks0[0]["w"], 0.1);

    // Frame 1 lists the far (new id 1) then the near (id 0) detection,
    // preserving input detection order.
    let tracks1 = frames[1]["tracks"].as_array().unwrap();
    assert_eq!(tracks1.len(), 2);
    assert_eq!(tracks1[0]["id"], 1);
    assert_eq!(tracks1[0]["x"], 0.8);
    assert_eq!(tracks1[1]["id"], 0);
    assert_eq!(tracks1[1]["x"], 0.21);

    // Frame 2 had no detections: empty tracks array, frame still present.
    let tracks2 = frames[2]["tracks"].as_array().unwrap();
    assert!(tracks2.is_empty());
}

#[test]
fn test_pipeline_is_byte_deterministic() {
    assert_eq!(run_pipeline(INPUT_JSON), run_pipeline(INPUT_JSON));
}

#[test]
fn test_bad_detection_rejects_stream() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("input.json");
    fs::write(
        &input_path,
        r#"[{"timestamp": "2025-03-24T18:00:01",
             "detections": [{"x": 0.2, "y": 0.2, "w": 0.1, "h": -0.5}]}]"#,
    )
    .unwrap();

    let err = io::load_frames(&input_path).unwrap_err().to_string();
    assert!(err.contains("2025-03-24T18:00:01"));
}

#[test]
fn test_bad_timestamp_rejects_stream() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("input.json");
    fs::write(
        &input_path,
        r#"[{"timestamp": "yesterday", "detections": []}]"#,
    )
    .unwrap();

    let err = io::load_frames(&input_path).unwrap_err().to_string();
    assert!(err.contains("yesterday"));
}
