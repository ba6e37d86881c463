// e2e/cli_integration.rs — black-box tests of the `lz4chain` binary.
//
// Covers the five subcommands, stdin/stdout piping, output naming,
// overwrite protection, exit codes and environment defaults.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_lz4chain"))
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .env_remove("LZ4_CLEVEL")
        .env_remove("LZ4_NBWORKERS")
        .output()
        .expect("failed to run lz4chain")
}

fn sample_input() -> (TempDir, PathBuf, Vec<u8>) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("input.txt");
    let content = "Hello, lz4chain! Some text that repeats.\n".repeat(2000).into_bytes();
    fs::write(&path, &content).unwrap();
    (dir, path, content)
}

fn s(p: &Path) -> &str {
    p.to_str().unwrap()
}

// ── compress / decompress ────────────────────────────────────────────────────

#[test]
fn compress_then_decompress_roundtrip() {
    let (dir, input, original) = sample_input();
    let packed = dir.path().join("out.lz4");
    let restored = dir.path().join("restored.txt");

    let out = run(dir.path(), &["compress", "-l", "9", s(&input), "-o", s(&packed)]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(fs::metadata(&packed).unwrap().len() < original.len() as u64 / 4);

    let out = run(dir.path(), &["decompress", s(&packed), "-o", s(&restored)]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read(&restored).unwrap(), original);
}

#[test]
fn output_name_derived_from_input() {
    let (dir, input, original) = sample_input();
    let out = run(dir.path(), &["compress", s(&input)]);
    assert!(out.status.success());
    let packed = dir.path().join("input.txt.lz4");
    assert!(packed.exists());

    fs::remove_file(&input).unwrap();
    let out = run(dir.path(), &["decompress", s(&packed)]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read(&input).unwrap(), original);
}

#[test]
fn existing_output_requires_force() {
    let (dir, input, _) = sample_input();
    let packed = dir.path().join("exists.lz4");
    fs::write(&packed, b"keep me").unwrap();

    let out = run(dir.path(), &["compress", s(&input), "-o", s(&packed)]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("--force"));
    assert_eq!(fs::read(&packed).unwrap(), b"keep me");

    let out = run(dir.path(), &["compress", "-f", s(&input), "-o", s(&packed)]);
    assert!(out.status.success());
    assert_ne!(fs::read(&packed).unwrap(), b"keep me");
}

#[test]
fn frame_options_reach_the_header() {
    let (dir, input, original) = sample_input();
    let packed = dir.path().join("opts.lz4");
    let out = run(
        dir.path(),
        &[
            "compress", "-B", "6", "--content-checksum", "--block-checksum", "--content-size",
            s(&input), "-o", s(&packed),
        ],
    );
    assert!(out.status.success());

    let out = run(dir.path(), &["info", s(&packed)]);
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("1024 KB"), "{text}");
    assert!(text.contains("block checksum   : true"), "{text}");
    assert!(text.contains("content checksum : true"), "{text}");
    assert!(text.contains(&format!("content size     : {}", original.len())), "{text}");
}

#[test]
fn stdin_to_stdout_pipeline() {
    let dir = TempDir::new().unwrap();
    let data = b"piped through standard streams ".repeat(500);

    let mut child = Command::new(bin())
        .args(["-q", "compress"])
        .current_dir(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&data).unwrap();
    let packed = child.wait_with_output().unwrap();
    assert!(packed.status.success());
    assert_eq!(&packed.stdout[..4], &[0x04, 0x22, 0x4D, 0x18]);

    let mut child = Command::new(bin())
        .args(["-q", "decompress"])
        .current_dir(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&packed.stdout).unwrap();
    let restored = child.wait_with_output().unwrap();
    assert!(restored.status.success());
    assert_eq!(restored.stdout, data);
}

// ── block / unblock ──────────────────────────────────────────────────────────

#[test]
fn block_then_unblock_roundtrip() {
    let (dir, input, original) = sample_input();
    let packed = dir.path().join("input.lz4b");
    let restored = dir.path().join("unblocked.txt");

    let out = run(
        dir.path(),
        &["block", "-T", "3", "--chunk-size", "16384", "-l", "4", s(&input), "-o", s(&packed)],
    );
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let max = original.len().to_string();
    let out = run(dir.path(), &["unblock", "--max-size", &max, s(&packed), "-o", s(&restored)]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read(&restored).unwrap(), original);
}

#[test]
fn block_output_independent_of_threads() {
    let (dir, input, _) = sample_input();
    let one = dir.path().join("one.lz4b");
    let many = dir.path().join("many.lz4b");
    for (threads, out_path) in [("1", &one), ("6", &many)] {
        let out = run(
            dir.path(),
            &["block", "-T", threads, "--chunk-size", "8192", s(&input), "-o", s(out_path)],
        );
        assert!(out.status.success());
    }
    assert_eq!(fs::read(&one).unwrap(), fs::read(&many).unwrap());
}

#[test]
fn unblock_with_small_limit_fails() {
    let (dir, input, _) = sample_input();
    let packed = dir.path().join("small.lz4b");
    assert!(run(dir.path(), &["block", s(&input), "-o", s(&packed)]).status.success());
    let out = run(dir.path(), &["unblock", "--max-size", "100", s(&packed), "-o", "x.txt"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("exceed"));
}

// ── errors and metadata ──────────────────────────────────────────────────────

#[test]
fn missing_input_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let out = run(dir.path(), &["compress", "does-not-exist.txt"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).starts_with("lz4chain:"));
}

#[test]
fn decompressing_plain_text_fails() {
    let (dir, input, _) = sample_input();
    let out = run(dir.path(), &["decompress", s(&input), "-o", "x.out"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn invalid_level_rejected_by_parser() {
    let (dir, input, _) = sample_input();
    let out = run(dir.path(), &["compress", "-l", "0", s(&input)]);
    assert!(!out.status.success());
}

#[test]
fn level_from_environment() {
    let (dir, input, _) = sample_input();
    let packed = dir.path().join("env.lz4");
    let out = Command::new(bin())
        .args(["compress", s(&input), "-o", s(&packed)])
        .env("LZ4_CLEVEL", "13")
        .output()
        .unwrap();
    assert!(!out.status.success(), "level 13 from the environment must be rejected");
}

#[test]
fn version_and_help() {
    let dir = TempDir::new().unwrap();
    let out = run(dir.path(), &["--version"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains(env!("CARGO_PKG_VERSION")));

    let out = run(dir.path(), &["--help"]);
    assert!(out.status.success());
    let help = String::from_utf8_lossy(&out.stdout).to_lowercase();
    for cmd in ["compress", "decompress", "info", "block", "unblock"] {
        assert!(help.contains(cmd), "help lacks {cmd}: {help}");
    }
}
