use serde_json::Value;
use std::io::{self, Write};

/// Pretty JSON on stdout, newline-terminated.
pub fn print_json(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_json(&mut stdout.lock(), value) {
        eprintln!("JSON output error: {e}");
    }
}

fn write_json<W: Write>(out: &mut W, value: &Value) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pretty_and_newline_terminated() {
        let mut buf = Vec::new();
        write_json(&mut buf, &json!({ "approved": true, "fee": "770" })).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\n  \"approved\": true"));
    }
}
