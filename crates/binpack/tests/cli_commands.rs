#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "binpack-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn binpack(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_binpack"))
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .expect("binpack should run")
}

fn json_stdout(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("stdout should be json")
}

#[test]
fn pack_prints_hex() {
    let output = binpack(&[
        "--format",
        "json",
        "pack",
        "--tokens",
        "I,?,d,6s",
        "--values",
        r#"[4, true, 3.5, "Golang"]"#,
    ]);

    assert!(output.status.success());
    let payload = json_stdout(&output);
    assert!(payload["schema_id"]
        .as_str()
        .is_some_and(|id| id.ends_with("packed.schema.json")));
    assert_eq!(payload["size"], 19);

    let mut expected = vec![0u8, 0, 0, 4, 1];
    expected.extend_from_slice(&3.5f64.to_be_bytes());
    expected.extend_from_slice(b"Golang");
    assert_eq!(payload["hex"], hex::encode(expected));
}

#[test]
fn pack_raw_writes_bytes() {
    let output = binpack(&[
        "--format",
        "raw",
        "pack",
        "--tokens",
        "<H",
        "--values",
        "[4660]",
    ]);

    assert!(output.status.success());
    assert_eq!(output.stdout, vec![0x34, 0x12]);
}

#[test]
fn unpack_keeps_string_padding() {
    let output = binpack(&[
        "--format",
        "json",
        "unpack",
        "--tokens",
        "4s",
        "--hex",
        "68690000",
    ]);

    assert!(output.status.success());
    let payload = json_stdout(&output);
    assert_eq!(payload["fields"][0]["value"], "hi\u{0}\u{0}");
    assert_eq!(payload["fields"][0]["kind"], "string");
}

#[test]
fn unpack_short_buffer_exits_60() {
    let output = binpack(&["unpack", "--tokens", "I", "--hex", "000001"]);

    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("buffer too short"));
}

#[test]
fn unknown_token_exits_64() {
    let output = binpack(&["size", "--tokens", "I,Z"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn unknown_layout_token_exits_64() {
    let dir = unique_temp_dir("bad-token");
    std::fs::write(
        dir.join("bad.layout.json"),
        r#"{"name":"bad","fields":[{"name":"a","token":"Z"}]}"#,
    )
    .expect("layout should be writable");
    let dir_arg = dir.to_str().expect("temp dir should be utf-8");

    let output = binpack(&["layouts", dir_arg]);
    assert_eq!(output.status.code(), Some(64));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn oversized_string_exits_60() {
    let output = binpack(&["pack", "--tokens", "2s", "--values", r#"["Golang"]"#]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn size_reports_total() {
    let output = binpack(&["--format", "json", "size", "--tokens", "B,H,I,Q,f,d,4s"]);

    assert!(output.status.success());
    let payload = json_stdout(&output);
    assert_eq!(payload["size"], 31);
    assert_eq!(payload["tokens"], 7);
}

#[test]
fn layout_pack_unpack_and_listing() {
    let dir = unique_temp_dir("layouts");
    std::fs::write(
        dir.join("udp-header.layout.json"),
        r#"{
            "description": "RFC 768 header",
            "fields": [
                { "name": "src_port", "token": ">H" },
                { "name": "dst_port", "token": "H" },
                { "name": "length", "token": "H" },
                { "name": "checksum", "token": "H" }
            ]
        }"#,
    )
    .expect("layout should be writable");
    let dir_arg = dir.to_str().expect("temp dir should be utf-8");
    let out_file = dir.join("record.bin");

    let output = binpack(&[
        "pack",
        "--layout",
        "udp-header",
        "--layouts",
        dir_arg,
        "--values",
        r#"{"src_port": 80, "dst_port": 8080, "length": 8, "checksum": 0}"#,
        "--out",
        out_file.to_str().expect("path should be utf-8"),
    ]);
    assert!(output.status.success());
    assert_eq!(
        std::fs::read(&out_file).expect("record should exist"),
        vec![0, 80, 0x1f, 0x90, 0, 8, 0, 0]
    );

    let output = binpack(&[
        "--format",
        "json",
        "unpack",
        "--layout",
        "udp-header",
        "--layouts",
        dir_arg,
        "--file",
        out_file.to_str().expect("path should be utf-8"),
    ]);
    assert!(output.status.success());
    let payload = json_stdout(&output);
    assert_eq!(payload["fields"][1]["name"], "dst_port");
    assert_eq!(payload["fields"][1]["value"], 8080);

    let output = binpack(&["--format", "json", "layouts", dir_arg]);
    assert!(output.status.success());
    let payload = json_stdout(&output);
    assert_eq!(payload["layouts"][0]["name"], "udp-header");
    assert_eq!(payload["layouts"][0]["size"], 8);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn version_reports_package_version() {
    let output = binpack(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        format!("binpack {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn extended_version_reports_rustc() {
    let output = binpack(&["version", "--extended"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let rustc = stdout
        .lines()
        .find_map(|line| line.strip_prefix("rustc: "))
        .expect("rustc line should be printed");
    assert!(rustc.starts_with("rustc "), "{rustc}");
    assert!(stdout.lines().any(|line| line.starts_with("git_hash: ")));
}
