//! Output mode helpers. The global `--json` and `--quiet` flags are stored
//! in env vars by `main` so every command can check them without threading
//! them through each call.

pub fn is_json() -> bool {
    std::env::var("PINFILE_JSON").is_ok()
}

pub fn is_quiet() -> bool {
    std::env::var("PINFILE_QUIET").is_ok()
}

/// Print a JSON value to stdout.
pub fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("  Error: failed to serialize output: {e}"),
    }
}
