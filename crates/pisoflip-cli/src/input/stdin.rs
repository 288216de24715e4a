use std::io::{self, Read};

/// Read whatever is piped into stdin, trimmed. Returns None when stdin is
/// an interactive TTY or the pipe carries only whitespace; the typed JSON
/// parse happens at the command layer.
pub fn read_piped() -> Result<Option<String>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}
