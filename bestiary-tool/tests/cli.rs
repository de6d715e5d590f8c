use std::path::PathBuf;
use std::process::Command;

const SAMPLE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../bestiary-power/data/sample_bestiary.json"
);

fn temp_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "bestiary-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_writes_table_dump_and_json_report() {
    let exe = env!("CARGO_BIN_EXE_bestiary");
    let table_path = temp_path("table");
    let dump_path = temp_path("dump");
    let report_path = temp_path("report");
    let status = Command::new(exe)
        .args(["--input", SAMPLE, "--report", "json", "--output"])
        .arg(&table_path)
        .arg("--dump")
        .arg(&dump_path)
        .arg("--report-output")
        .arg(&report_path)
        .status()
        .expect("run cli");
    assert!(status.success());

    let table = std::fs::read_to_string(&table_path).expect("read table");
    assert!(table.contains("\"scaled_power\""));

    let dump = std::fs::read_to_string(&dump_path).expect("read dump");
    let mut lines = dump.lines();
    assert_eq!(
        lines.next(),
        Some("ridx|level|rarity|d_char|name|pwr|scaled|melee|spell|hp")
    );
    assert_eq!(lines.count(), 11);

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).expect("read report"))
            .expect("report is json");
    assert_eq!(report["templates"], 12);
    assert_eq!(report["rebalance"], false);
}

#[test]
fn cli_rebalance_flag_rewrites_experience() {
    let exe = env!("CARGO_BIN_EXE_bestiary");
    let table_path = temp_path("rebalanced");
    let output = Command::new(exe)
        .args(["--input", SAMPLE, "--rebalance", "--report", "csv", "--output"])
        .arg(&table_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("depth,total_hp,total_dam,count"));

    let table: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&table_path).expect("read table"))
            .expect("table is json");
    for race in table["races"].as_array().expect("races") {
        if race["level"] == 0 {
            assert_eq!(race["experience"], 0);
        } else {
            assert!(race["experience"].as_i64().expect("experience") >= 1);
        }
    }
}

#[test]
fn cli_rejects_missing_input() {
    let exe = env!("CARGO_BIN_EXE_bestiary");
    let missing = temp_path("missing");
    let output = Command::new(exe)
        .arg("--input")
        .arg(&missing)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"));
}

#[test]
fn cli_rejects_invalid_config() {
    let exe = env!("CARGO_BIN_EXE_bestiary");
    let config_path = temp_path("config");
    std::fs::write(&config_path, r#"{ "speed_table": [10, 10, 10] }"#).expect("write config");
    let output = Command::new(exe)
        .args(["--input", SAMPLE, "--config"])
        .arg(&config_path)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("speed table"));
}
