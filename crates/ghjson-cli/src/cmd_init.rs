use crate::remote::{Remote, Target};
use anyhow::{Context, Result};
use ghjson::{WorkflowConfig, default_document, ensure_default};

pub fn run(remote: &Remote, target: &Target) -> Result<()> {
    let client = remote.client()?;
    let handle = target.handle()?;
    let config = WorkflowConfig::default();

    let outcome = ensure_default(&client, &handle, &default_document(), &config.create_message)
        .with_context(|| format!("Failed to initialize {}", handle))?;

    let version = outcome.document.version.as_deref().unwrap_or("-");
    if outcome.existed {
        eprintln!("{} already exists", handle);
    } else {
        eprintln!("Default file created at {}", handle);
    }
    println!("{}", version);
    Ok(())
}
