// CLI tests for undertalk
//
// These tests drive the binary through `cargo run` and only check console
// behavior, so they work without a sounds/ directory or an audio device.

use std::process::Command;

#[test]
fn test_cli_help() {
    let output = Command::new("cargo").args(["run", "--", "--help"]).output();

    match output {
        Ok(result) => {
            assert!(result.status.success(), "Help command should succeed");

            let stdout = String::from_utf8_lossy(&result.stdout);
            assert!(stdout.contains("undertalk"), "Should show program name");
            assert!(stdout.contains("TEXT"), "Should show the text argument");
            assert!(stdout.contains("--seed"), "Should show the seed option");
            assert!(stdout.contains("--play"), "Should show the play option");
        }
        Err(e) => {
            eprintln!("CLI help test failed to execute: {}", e);
        }
    }
}

#[test]
fn test_cli_version() {
    let output = Command::new("cargo").args(["run", "--", "--version"]).output();

    match output {
        Ok(result) => {
            assert!(result.status.success(), "Version command should succeed");
            let stdout = String::from_utf8_lossy(&result.stdout);
            assert!(stdout.contains("undertalk"), "Should show program name");
        }
        Err(e) => {
            eprintln!("CLI version test failed to execute: {}", e);
        }
    }
}

#[test]
fn test_cli_rejects_non_numeric_pitch() {
    let output = Command::new("cargo")
        .args(["run", "--", "hello", "out.wav", "not-a-number"])
        .output();

    match output {
        Ok(result) => {
            assert!(
                !result.status.success(),
                "A non-numeric pitch argument should fail to parse"
            );
        }
        Err(e) => {
            eprintln!("CLI pitch test failed to execute: {}", e);
        }
    }
}

#[test]
fn test_cli_rejects_non_numeric_speed() {
    let output = Command::new("cargo")
        .args(["run", "--", "hello", "out.wav", "2", "fast"])
        .output();

    match output {
        Ok(result) => {
            assert!(
                !result.status.success(),
                "A non-numeric speed argument should fail to parse"
            );
        }
        Err(e) => {
            eprintln!("CLI speed test failed to execute: {}", e);
        }
    }
}

#[test]
fn test_cli_rejects_nonpositive_speed() {
    let output = Command::new("cargo")
        .args(["run", "--", "hello", "out.wav", "0", "0"])
        .output();

    match output {
        Ok(result) => {
            assert!(!result.status.success(), "A zero speed should be rejected");
            let stderr = String::from_utf8_lossy(&result.stderr);
            assert!(
                stderr.contains("speed") || stderr.contains("error"),
                "Should explain the rejected speed, got: {}",
                stderr
            );
        }
        Err(e) => {
            eprintln!("CLI nonpositive speed test failed to execute: {}", e);
        }
    }
}

#[test]
fn test_cli_fails_fast_without_sound_library() {
    // Runs from the package root; generation only works if someone has put a
    // sounds/ directory there, so accept either a clean success or the
    // startup diagnostic.
    let output = Command::new("cargo")
        .args(["run", "--", "hi", "cli_smoke.wav", "0", "1.25"])
        .output();

    match output {
        Ok(result) => {
            if !result.status.success() {
                let stderr = String::from_utf8_lossy(&result.stderr);
                assert!(
                    stderr.contains("error:"),
                    "Failure should carry a diagnostic, got: {}",
                    stderr
                );
            }
        }
        Err(e) => {
            eprintln!("CLI smoke test failed to execute: {}", e);
        }
    }
}
