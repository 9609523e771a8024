use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use pattern_store_core::{BucketStore, ops};
use pattern_store_sqlite::SqliteBucketStore;
use serde_json::{Value, json};
use tempfile::TempDir;

const FIRST_KEY: &str = "0x0000e0030000002a0000e0076669727374";

/// Creates a store with `pattern` and `state` buckets and returns its path.
fn seed_store(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("10.0.0.1_mysql.db");
    let mut store = SqliteBucketStore::create(&path).expect("failed to create store");
    store.create_bucket("pattern").expect("failed to create bucket");
    store.create_bucket("state").expect("failed to create bucket");
    path
}

/// Runs the binary and parses the envelope it prints.
fn run_cli(args: &[&str]) -> Value {
    let output = Command::new(env!("CARGO_BIN_EXE_patterncli"))
        .args(args)
        .output()
        .expect("failed to run patterncli");
    assert!(
        output.status.success(),
        "patterncli exited with {}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout is not UTF-8");
    assert_eq!(stdout.lines().count(), 1, "expected one envelope, got: {stdout}");
    serde_json::from_str(&stdout).expect("stdout is not a JSON envelope")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp path is not UTF-8")
}

#[test]
fn test_add_twice() {
    let dir = TempDir::new().unwrap();
    let db = seed_store(&dir);
    let args = [
        "-f",
        path_arg(&db),
        "-t",
        "add",
        "-b",
        "pattern",
        "-r",
        "select * from first;",
    ];

    let first = run_cli(&args);
    assert_eq!(
        first,
        json!({ "return_code": 0, "message": "success", "data": { "key": FIRST_KEY } })
    );

    let second = run_cli(&args);
    assert_eq!(second["return_code"], -1);
    assert_eq!(second["message"], format!("key already exists: {FIRST_KEY}"));
    assert!(second["data"].is_null());
}

#[test]
fn test_delete_malformed_key_leaves_store() {
    let dir = TempDir::new().unwrap();
    let db = seed_store(&dir);
    {
        let mut store = SqliteBucketStore::open(&db).unwrap();
        ops::add_value(&mut store, "pattern", "select * from first").unwrap();
    }

    let envelope = run_cli(&["-f", path_arg(&db), "-t", "delete", "-b", "pattern", "-k", "abc123"]);
    assert_eq!(envelope["return_code"], -1);

    let store = SqliteBucketStore::open(&db).unwrap();
    assert_eq!(store.entries("pattern").unwrap().len(), 1);
}

#[test]
fn test_list_buckets() {
    let dir = TempDir::new().unwrap();
    let db = seed_store(&dir);

    let envelope = run_cli(&["-f", path_arg(&db)]);
    assert_eq!(envelope["return_code"], 0);
    assert_eq!(envelope["message"], "success");
    assert_eq!(envelope["data"], json!(["pattern", "state"]));
}

#[test]
fn test_list_keys_pages_and_hides_session_entries() {
    let dir = TempDir::new().unwrap();
    let db = seed_store(&dir);
    {
        let mut store = SqliteBucketStore::open(&db).unwrap();
        for i in 0..4u8 {
            store.put("state", &[i], format!("v{i}").as_bytes()).unwrap();
        }
        store.put("state", b"10.0.0.9_client_", b"secret").unwrap();
    }

    let all = run_cli(&["-f", path_arg(&db), "-b", "state", "-l", "-1"]);
    assert_eq!(all["data"].as_array().unwrap().len(), 4);

    let page = run_cli(&["-f", path_arg(&db), "-b", "state", "-s", "1", "-l", "2"]);
    assert_eq!(
        page["data"],
        json!([
            { "key": "0x01", "value": "v1" },
            { "key": "0x02", "value": "v2" },
        ])
    );

    let hidden = run_cli(&[
        "-f",
        path_arg(&db),
        "-b",
        "state",
        "-k",
        "0x31302e302e302e395f636c69656e745f",
    ]);
    assert_eq!(hidden["return_code"], -1);
}

#[test]
fn test_get_and_set() {
    let dir = TempDir::new().unwrap();
    let db = seed_store(&dir);
    {
        let mut store = SqliteBucketStore::open(&db).unwrap();
        ops::add_value(&mut store, "pattern", "select * from first").unwrap();
    }

    let got = run_cli(&["-f", path_arg(&db), "-b", "pattern", "-k", FIRST_KEY]);
    assert_eq!(got["data"], "select * from first");

    let set = run_cli(&[
        "-f",
        path_arg(&db),
        "-t",
        "set",
        "-b",
        "pattern",
        "-k",
        FIRST_KEY,
        "-r",
        "select * from first where id = 1",
        "--keep-key",
    ]);
    assert_eq!(set, json!({ "return_code": 0, "message": "success", "data": null }));

    let got = run_cli(&["-f", path_arg(&db), "-b", "pattern", "-k", FIRST_KEY]);
    assert_eq!(got["data"], "select * from first where id = 1");
}

#[test]
fn test_missing_bucket_and_arguments() {
    let dir = TempDir::new().unwrap();
    let db = seed_store(&dir);

    let missing = run_cli(&["-f", path_arg(&db), "-b", "nope"]);
    assert_eq!(missing["return_code"], -1);
    assert_eq!(missing["message"], "bucket not exist: nope");

    let wrong = run_cli(&["-f", path_arg(&db), "-t", "add", "-b", "pattern"]);
    assert_eq!(wrong["return_code"], -1);
    assert!(wrong["message"].as_str().unwrap().starts_with("wrong arguments"));
}

#[test]
fn test_no_store_given() {
    let envelope = run_cli(&[]);
    assert_eq!(
        envelope,
        json!({ "return_code": -1, "message": "config file not found", "data": null })
    );
}

#[test]
fn test_missing_store_file() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("absent.db");

    let envelope = run_cli(&["-f", path_arg(&db)]);
    assert_eq!(envelope["message"], "db file not found");
    assert!(!db.exists());
}

#[test]
fn test_config_discovery() {
    let dir = TempDir::new().unwrap();
    seed_store(&dir);
    let config = dir.path().join("dbshield.yml");
    fs::write(
        &config,
        format!("targetIP: 10.0.0.1\ndbms: mysql\ndbDir: {}\n", dir.path().display()),
    )
    .unwrap();

    let envelope = run_cli(&["-c", path_arg(&config), "-f", "/ignored.db"]);
    assert_eq!(envelope["data"], json!(["pattern", "state"]));

    let unreadable = dir.path().join("broken.yml");
    fs::write(&unreadable, "targetIP: [oops\n").unwrap();
    let envelope = run_cli(&["-c", path_arg(&unreadable)]);
    assert_eq!(envelope["message"], "config file read error");

    let envelope = run_cli(&["-c", path_arg(&dir.path().join("absent.yml"))]);
    assert_eq!(envelope["message"], "config file not found");
}

#[test]
fn test_unopenable_store_is_fatal() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("garbage.db");
    fs::write(&db, b"definitely not a sqlite database file, only text").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_patterncli"))
        .args(["-f", path_arg(&db)])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("error: "));
}

#[test]
fn test_empty_file_is_fatal_and_untouched() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("empty.db");
    fs::write(&db, b"").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_patterncli"))
        .args(["-f", path_arg(&db), "-b", "pattern"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not a pattern store"));
    assert_eq!(fs::metadata(&db).unwrap().len(), 0);
}
