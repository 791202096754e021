use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

const ZTAB: &str = "\
- DEFAULTS swap 1G devices=2
0 swap0 - - pri=10
1 log1 zfslog 1G zpool=tank
";

fn ztab(tag: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("zhammer-cli-{tag}-{}", std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

fn zhammer(ztab: &PathBuf, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_zhammer"))
        .arg("--dry-run")
        .arg("-f")
        .arg(ztab)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn dry_run_batch_online_succeeds() {
    let path = ztab("batch", ZTAB);
    let output = zhammer(&path, &["--all", "online"]);
    assert_eq!(output.status.code(), Some(0));
    let _ = fs::remove_file(&path);
}

#[test]
fn zfslog_refusal_is_printed() {
    let path = ztab("zfslog", ZTAB);
    let output = zhammer(&path, &["online", "log1"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Cowardly refusing to online zfs log."));
    let _ = fs::remove_file(&path);
}

#[test]
fn unknown_device_exits_with_one() {
    let path = ztab("unknown", ZTAB);
    let output = zhammer(&path, &["online", "swap9"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no such entry: swap9"));
    let _ = fs::remove_file(&path);
}

#[test]
fn missing_target_exits_with_two() {
    let path = ztab("ambiguous", ZTAB);
    let output = zhammer(&path, &["offline"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("for help use --help"));
    let _ = fs::remove_file(&path);
}

#[test]
fn malformed_ztab_exits_with_two() {
    let path = ztab("malformed", "0 swap0 bogus 1G\n");
    let output = zhammer(&path, &["--all", "online"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid ztab entry line"));
    let _ = fs::remove_file(&path);
}

#[test]
fn unreadable_ztab_exits_with_two() {
    let output = zhammer(&PathBuf::from("/nonexistent/zhammer/ztab"), &["--all", "online"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn zero_padded_index_is_addressable_as_written() {
    let path = ztab("padded", "007 swap7 swap 1G\n");
    let output = zhammer(&path, &["online", "007"]);
    assert_eq!(output.status.code(), Some(0));
    let _ = fs::remove_file(&path);
}

#[test]
fn batch_prints_each_refusal() {
    let path = ztab("notices", "0 log0 zfslog 1G\n1 log1 zfslog 1G\n");
    let output = zhammer(&path, &["--all", "online"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("Cowardly refusing to online zfs log.").count(), 2);
    let _ = fs::remove_file(&path);
}
