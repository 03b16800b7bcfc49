// Minimal integration test that drives the compiled binary through a PTY.
// This exercises the real event loop and crossterm input handling across
// the main boundaries without relying on internal modules.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Runs with --offline so no network access is needed.
// - Marked Unix-only and ignored by default to avoid CI/platform issues.
// - Run manually via: `cargo test --test pty_smoke -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn offline_session_starts_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    // Resolve path to compiled binary (debug build during tests)
    let bin = assert_cmd::cargo::cargo_bin("hotseat");
    let cmd = format!("{} --offline", bin.display());

    // Spawn the TUI inside a pseudo terminal
    let mut p = spawn(cmd)?;

    // Give the app a moment to initialize the terminal and serve the first
    // bundled question
    std::thread::sleep(Duration::from_millis(300));

    // Ask the audience, then pick an answer; whatever the outcome the game
    // keeps running (advance or reset both fetch the next question)
    p.send("l")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("a")?;
    std::thread::sleep(Duration::from_millis(200));

    // Send ESC to exit the app
    p.send("\x1b")?; // ESC

    // Wait for the program to terminate cleanly
    p.expect(Eof)?;
    Ok(())
}
