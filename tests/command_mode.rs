//! Integration tests for the command line (-c/--command, -e/--exec, snapshots)

use std::path::PathBuf;
use std::process::Command;

fn run_command(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_cellgrid"))
        // Tests must be deterministic and not depend on a user's ~/.config/cellgrid/config.toml.
        .arg("--no-config")
        .args(args)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

struct Cleanup(PathBuf);
impl Drop for Cleanup {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn temp_path(name: &str, ext: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "cellgrid_cli_{}_{}_{:?}.{}",
        name,
        std::process::id(),
        std::thread::current().id(),
        ext
    ))
}

#[test]
fn test_basic_arithmetic() {
    let (stdout, _, code) = run_command(&["-c", "5 + 3"]);
    assert_eq!(stdout.trim(), "8");
    assert_eq!(code, 0);
}

#[test]
fn test_precedence_and_parentheses() {
    let (stdout, _, code) = run_command(&["-c", "2 + 3 * (4 - 1) / 2"]);
    assert_eq!(stdout.trim(), "6.5");
    assert_eq!(code, 0);
}

#[test]
fn test_auto_prepend_equals() {
    let (stdout1, _, _) = run_command(&["-c", "10 + 5"]);
    let (stdout2, _, _) = run_command(&["-c", "=10 + 5"]);
    assert_eq!(stdout1, stdout2);
}

#[test]
fn test_error_exit_code() {
    let (stdout, _, code) = run_command(&["-c", "undefined_function()"]);
    assert_eq!(stdout.trim(), "ERROR");
    assert_eq!(code, 1);
}

#[test]
fn test_division_by_zero() {
    let (stdout, _, code) = run_command(&["-c", "1/0"]);
    assert_eq!(stdout.trim(), "ERROR");
    assert_eq!(code, 1);
}

#[test]
fn test_exec_then_command() {
    let (stdout, _, code) = run_command(&[
        "-e",
        "set A1 5",
        "-e",
        "set B1 =A1*2",
        "-e",
        "get B1",
        "-c",
        "A1 + B1",
    ]);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines, vec!["1 formulas recomputed", "10", "15"]);
    assert_eq!(code, 0);
}

#[test]
fn test_aggregate_of_empty_sheet() {
    let (stdout, _, code) = run_command(&["-e", "agg sum", "-e", "agg min"]);
    assert_eq!(stdout, "SUM: 0\nMIN: n/a\n");
    assert_eq!(code, 0);
}

#[test]
fn test_bad_exec_command_fails() {
    let (_, stderr, code) = run_command(&["-e", "explode A1"]);
    assert!(stderr.contains("explode"));
    assert_ne!(code, 0);
}

#[test]
fn test_save_and_reopen_grd() {
    let path = temp_path("roundtrip", "grd");
    let _cleanup = Cleanup(path.clone());
    let file = path.to_string_lossy().to_string();

    let (_, _, code) = run_command(&[&file, "-e", "set A1 4", "-e", "set A2 =A1*A1", "--save"]);
    assert_eq!(code, 0);
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("A2: =A1*A1"));

    let (stdout, _, code) = run_command(&[&file, "-e", "get A2"]);
    assert_eq!(stdout.trim(), "16");
    assert_eq!(code, 0);
}

#[test]
fn test_output_json_snapshot() {
    let path = temp_path("output", "json");
    let _cleanup = Cleanup(path.clone());
    let out = path.to_string_lossy().to_string();

    let (_, _, code) = run_command(&["-e", "set B3 hello", "-o", &out]);
    assert_eq!(code, 0);
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"2-1\": \"hello\""));
}

#[test]
fn test_rows_output_follows_dimensions_and_reopens() {
    let path = temp_path("rows", "json");
    let _cleanup = Cleanup(path.clone());
    let out = path.to_string_lossy().to_string();

    let (_, _, code) = run_command(&[
        "-e",
        "set B1 x",
        "-e",
        "set A25 far",
        "-e",
        "cols -",
        "--rows-output",
        &out,
    ]);
    assert_eq!(code, 0);
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with(r#"[["","x","#));
    assert!(!content.contains("far"));

    let (stdout, _, code) = run_command(&[&out, "-e", "get B1"]);
    assert_eq!(stdout.trim(), "x");
    assert_eq!(code, 0);
}

#[test]
fn test_save_without_file_fails() {
    let (_, stderr, code) = run_command(&["--save"]);
    assert!(stderr.contains("--save"));
    assert_ne!(code, 0);
}
