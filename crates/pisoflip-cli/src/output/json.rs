use serde_json::Value;

/// Pretty-print the analysis envelope as JSON, the default output mode
/// and the one the bindings mirror.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => eprintln!("failed to render JSON output: {e}"),
    }
}
