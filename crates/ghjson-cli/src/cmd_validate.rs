use crate::remote;
use anyhow::{Result, anyhow};
use ghjson::EditBuffer;

pub fn run(input: &str) -> Result<()> {
    let text = remote::read_input(input)?;
    println!("{}", validate_text(&text)?);
    Ok(())
}

fn validate_text(text: &str) -> Result<String> {
    let mut buffer = EditBuffer::from_text(text);
    let result = buffer.validate();
    let message = buffer
        .status()
        .map(|s| s.message.clone())
        .unwrap_or_default();
    match result {
        Ok(()) => Ok(message),
        Err(_) => Err(anyhow!(message)),
    }
}
