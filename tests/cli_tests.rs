use assert_cmd::Command;
use regex::Regex;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct TestContext {
    dir: TempDir,
    history: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let history = dir.path().join("history.json");
        Self { dir, history }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("lanesignal").unwrap();
        cmd.arg("--history").arg(&self.history);
        cmd
    }
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("stdout is JSON")
}

fn history_ids(ctx: &TestContext) -> Vec<String> {
    let out = ctx
        .cmd()
        .args(["history", "list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    stdout_json(&out)
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_cli_simulated_analysis_json() {
    let ctx = TestContext::new();
    let out = ctx
        .cmd()
        .args(["analyze", "--seed", "11", "--json", "--no-save"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let v = stdout_json(&out);
    let lanes = v["lanes_detected"].as_u64().unwrap();
    assert!((2..=4).contains(&lanes));
    assert_eq!(v["lane_data"].as_array().unwrap().len() as u64, lanes);
    assert!(v["signal_recommendation"]["lane_number"].is_u64());
    assert!(!Path::new(&ctx.history).exists());
}

#[test]
fn test_cli_json_detections_file() {
    let ctx = TestContext::new();
    let input = ctx.write(
        "frame.json",
        r#"{ "lane_count": 2, "detections": [
            { "vehicle_type": "car", "confidence": 0.9, "bbox": [0, 0, 50, 40], "lane_number": 1 },
            { "vehicle_type": "car", "confidence": 0.8, "bbox": [0, 0, 50, 40], "lane_number": 1 },
            { "vehicle_type": "truck", "confidence": 0.7, "bbox": [0, 0, 50, 40], "lane_number": 1 },
            { "vehicle_type": "car", "confidence": 0.9, "bbox": [0, 0, 50, 40], "lane_number": 2 }
        ] }"#,
    );

    let out = ctx
        .cmd()
        .args(["analyze", "--json", "--no-save", "--detections"])
        .arg(&input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let v = stdout_json(&out);
    assert_eq!(v["optimization_score"], 75.0);
    assert_eq!(v["total_vehicles"], 4);
    assert_eq!(v["vehicle_types"]["truck"], 1);
}

#[test]
fn test_cli_table_report() {
    let ctx = TestContext::new();
    let out = ctx
        .cmd()
        .args(["analyze", "--seed", "5", "--lanes", "3", "--no-save"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8_lossy(&out);

    let re = Regex::new(r"Lane [1-3] \(\d+ vehicles, (low|medium|high) congestion\)").unwrap();
    assert!(re.is_match(&stdout), "STDOUT:\n{}", stdout);
    assert!(stdout.contains("Lane Analysis"));
    assert!(stdout.contains("Traffic Metrics"));
}

#[test]
fn test_cli_video_frames() {
    let ctx = TestContext::new();
    let out = ctx
        .cmd()
        .args([
            "analyze", "--seed", "2", "--frames", "5", "-i", "video", "--json", "--no-save",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let v = stdout_json(&out);
    let frames = v.as_array().unwrap();
    assert_eq!(frames.len(), 5);
    assert!(frames.iter().all(|f| f["input_type"] == "video"));
    assert_eq!(frames[4]["frame_index"], 4);
}

#[test]
fn test_cli_csv_requires_lanes() {
    let ctx = TestContext::new();
    let input = ctx.write(
        "frame.csv",
        "vehicle_type,confidence,x,y,width,height,lane_number\ncar,0.9,1,1,1,1,1\n",
    );
    ctx.cmd()
        .args(["analyze", "--no-save", "--detections"])
        .arg(&input)
        .assert()
        .failure();

    ctx.cmd()
        .args(["analyze", "--no-save", "--json", "--lanes", "2", "--detections"])
        .arg(&input)
        .assert()
        .success();
}

#[test]
fn test_cli_out_of_range_lane_fails() {
    let ctx = TestContext::new();
    let input = ctx.write(
        "frame.csv",
        "vehicle_type,confidence,x,y,width,height,lane_number\ncar,0.9,1,1,1,1,3\n",
    );
    ctx.cmd()
        .args(["analyze", "--lanes", "2", "--detections"])
        .arg(&input)
        .assert()
        .failure();
    assert!(!ctx.history.exists());
}

#[test]
fn test_cli_history_lifecycle() {
    let ctx = TestContext::new();
    for seed in ["1", "2"] {
        ctx.cmd()
            .args(["analyze", "--json", "-i", "webcam", "--seed", seed])
            .assert()
            .success();
    }

    let ids = history_ids(&ctx);
    assert_eq!(ids.len(), 2);

    ctx.cmd()
        .args(["history", "show", &ids[0], "--json"])
        .assert()
        .success();

    ctx.cmd()
        .args(["history", "delete", &ids[0]])
        .assert()
        .success();
    assert_eq!(history_ids(&ctx), vec![ids[1].clone()]);

    ctx.cmd()
        .args(["history", "delete", &ids[0]])
        .assert()
        .failure();
}

#[test]
fn test_cli_config_file_and_override() {
    let ctx = TestContext::new();
    let config = ctx.write("config.json", r#"{ "policy": { "weight_low": 4 } }"#);
    let input = ctx.write(
        "frame.csv",
        "vehicle_type,confidence,x,y,width,height,lane_number\ncar,0.9,1,1,1,1,1\nbus,0.9,1,1,1,1,1\n",
    );

    let run = |extra: &[&str]| -> Value {
        let out = ctx
            .cmd()
            .arg("--config")
            .arg(&config)
            .args(["analyze", "--json", "--no-save", "--lanes", "1", "--detections"])
            .arg(&input)
            .args(extra)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        stdout_json(&out)
    };

    assert_eq!(run(&[])["lane_data"][0]["priority_score"], 8);
    assert_eq!(
        run(&["--weight-low", "7"])["lane_data"][0]["priority_score"],
        14
    );
}

#[test]
fn test_cli_overflowing_weight_fails_cleanly() {
    let ctx = TestContext::new();
    let rows: String = (0..10).map(|_| "car,0.9,1,1,1,1,1\n").collect();
    let input = ctx.write(
        "frame.csv",
        &format!("vehicle_type,confidence,x,y,width,height,lane_number\n{}", rows),
    );
    let out = ctx
        .cmd()
        .args(["analyze", "--lanes", "1", "--weight-high", "9223372036854775807", "--detections"])
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8_lossy(&out);
    assert!(stderr.contains("overflows"), "STDERR:\n{}", stderr);
    assert!(!ctx.history.exists());
}
