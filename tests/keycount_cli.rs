use std::collections::BTreeMap;
use std::io::Write;
use std::process::{Command, Output, Stdio};

// `exit(-1)` as the OS reports it.
const EXIT_ERROR: i32 = if cfg!(windows) { -1 } else { 255 };

fn keycount(args: &[&str], stdin: impl AsRef<[u8]>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_keycount"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn keycount");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_ref())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn counts(out: &Output) -> BTreeMap<String, u64> {
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .map(|l| {
            let (k, n) = l.split_once(' ').unwrap();
            (k.to_string(), n.parse().unwrap())
        })
        .collect()
}

#[test]
fn words_from_stdin() {
    let out = keycount(&["words"], "the quick the\nfox the\n");
    assert!(out.status.success());
    let c = counts(&out);
    assert_eq!(c.len(), 3);
    assert_eq!(c["the"], 3);
    assert_eq!(c["fox"], 1);
}

#[test]
fn words_need_not_be_utf8() {
    let out = keycount(&["words"], b"caf\xe9 the caf\xe9\n");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let mut lines: Vec<&[u8]> = out
        .stdout
        .split(|&b| b == b'\n')
        .filter(|l| !l.is_empty())
        .collect();
    lines.sort();
    assert_eq!(lines, vec![&b"caf\xe9 2"[..], &b"the 1"[..]]);
}

#[test]
fn failures_print_one_line() {
    let out = keycount(&["words", "/nonexistent/keycount/input"], "");
    assert_eq!(out.status.code(), Some(EXIT_ERROR));
    assert_eq!(String::from_utf8_lossy(&out.stderr).lines().count(), 1);
}

#[test]
fn new_keys_are_logged_at_debug() {
    let out = Command::new(env!("CARGO_BIN_EXE_keycount"))
        .args(["words", "/dev/null"])
        .env("RUST_LOG", "keyed_tables=debug")
        .output()
        .expect("spawn keycount");
    assert!(out.status.success());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("probing counter created"), "{err}");
    assert!(!err.contains("new key"), "{err}");

    let path = std::env::temp_dir().join(format!("keycount-log-{}.txt", std::process::id()));
    std::fs::write(&path, "a b a\n").unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_keycount"))
        .args(["words", path.to_str().unwrap()])
        .env("RUST_LOG", "keyed_tables=debug")
        .output()
        .expect("spawn keycount");
    std::fs::remove_file(&path).ok();
    assert!(out.status.success());
    let err = String::from_utf8_lossy(&out.stderr);
    assert_eq!(err.matches("new key").count(), 2, "{err}");
}

#[test]
fn numbers_from_file() {
    let path = std::env::temp_dir().join(format!("keycount-numbers-{}.txt", std::process::id()));
    std::fs::write(&path, "3 3 -1 7 3\n").unwrap();
    let out = keycount(&["numbers", path.to_str().unwrap()], "");
    std::fs::remove_file(&path).ok();
    assert!(out.status.success());
    let c = counts(&out);
    assert_eq!(c["3"], 3);
    assert_eq!(c["-1"], 1);
    assert_eq!(c["7"], 1);
}

#[test]
fn missing_file_exits_with_error_status() {
    let out = keycount(&["words", "/nonexistent/keycount/input"], "");
    assert_eq!(out.status.code(), Some(EXIT_ERROR));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Couldn't open input file"));
}

#[test]
fn estimate_requires_a_file() {
    let out = keycount(&["estimate"], "");
    assert_eq!(out.status.code(), Some(EXIT_ERROR));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Please enter input file"));
}

#[test]
fn estimate_takes_only_one_file() {
    let out = keycount(&["estimate", "a.txt", "a.txt"], "");
    assert_eq!(out.status.code(), Some(EXIT_ERROR));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Please enter only one input file"));
}

#[test]
fn estimate_prints_a_number() {
    let path = std::env::temp_dir().join(format!("keycount-hll-{}.txt", std::process::id()));
    let body: String = (0..1000).map(|i| format!("{}\n", i % 250)).collect();
    std::fs::write(&path, body).unwrap();
    let out = keycount(&["estimate", path.to_str().unwrap()], "");
    std::fs::remove_file(&path).ok();
    assert!(out.status.success());
    let est: f64 = String::from_utf8_lossy(&out.stdout).trim().parse().unwrap();
    assert!((est - 250.0).abs() < 25.0, "estimate {est}");
}

#[test]
fn too_small_capacity_is_reported() {
    let out = keycount(&["words", "--capacity", "2"], "a b c\n");
    assert_eq!(out.status.code(), Some(EXIT_ERROR));
    assert!(String::from_utf8_lossy(&out.stderr).contains("full"));
}

#[test]
fn impossible_capacity_is_fatal_by_default() {
    let out = keycount(&["words", "--capacity", &usize::MAX.to_string()], "a\n");
    assert_eq!(out.status.code(), Some(EXIT_ERROR));
    let err = String::from_utf8_lossy(&out.stderr);
    assert_eq!(err.trim_end(), "Error allocating memory");
}

#[test]
fn impossible_capacity_propagates_on_request() {
    let out = keycount(
        &["words", "--no-fatal-alloc", "--capacity", &usize::MAX.to_string()],
        "a\n",
    );
    assert_eq!(out.status.code(), Some(EXIT_ERROR));
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("error allocating memory for bucket array"), "{err}");
}

#[test]
fn non_integer_is_rejected() {
    let out = keycount(&["numbers"], "1 two 3\n");
    assert_eq!(out.status.code(), Some(EXIT_ERROR));
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid integer token 'two'"));
}
