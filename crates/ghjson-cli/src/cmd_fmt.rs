use crate::remote;
use anyhow::{Context, Result, anyhow};
use ghjson::EditBuffer;

pub fn run(input: &str, in_place: bool) -> Result<()> {
    let text = remote::read_input(input)?;
    let formatted = format_text(&text)?;

    if in_place && input != "-" {
        std::fs::write(input, format!("{}\n", formatted))
            .with_context(|| format!("Failed to write {:?}", input))?;
        eprintln!("Formatted JSON");
    } else {
        println!("{}", formatted);
    }
    Ok(())
}

fn format_text(text: &str) -> Result<String> {
    let mut buffer = EditBuffer::from_text(text);
    if buffer.format().is_err() {
        let message = buffer
            .status()
            .map(|s| s.message.clone())
            .unwrap_or_else(|| "Invalid JSON".to_string());
        return Err(anyhow!(message));
    }
    Ok(buffer.text().to_string())
}
