use crate::cmd_put;
use crate::remote::{self, Remote, Target};
use anyhow::{Context, Result, bail};
use std::io::Write;
use std::process::Command;
use tracing::debug;

pub fn run(remote: &Remote, target: &Target) -> Result<()> {
    let client = remote.client()?;
    let mut workflow = target.workflow()?;
    remote::load(&mut workflow, &client)?;

    let original = workflow
        .buffer()
        .map(|b| b.text().to_string())
        .unwrap_or_default();

    let mut file = tempfile::Builder::new()
        .prefix("ghjson-")
        .suffix(".json")
        .tempfile()
        .context("Failed to create temporary file")?;
    writeln!(file, "{}", original)?;
    file.flush()?;

    let editor = editor_command(|key| std::env::var(key).ok());
    debug!(?editor, path = ?file.path(), "launching editor");
    let (program, args) = editor
        .split_first()
        .context("No editor configured")?;
    let status = Command::new(program)
        .args(args)
        .arg(file.path())
        .status()
        .with_context(|| format!("Failed to launch editor {:?}", program))?;
    if !status.success() {
        bail!("Editor exited with {}", status);
    }

    let edited = std::fs::read_to_string(file.path()).context("Failed to read edited file")?;
    if edited.trim_end() == original.trim_end() {
        eprintln!("No changes");
        return Ok(());
    }

    let version = cmd_put::apply_text(&client, &mut workflow, edited)?;
    println!("{}", version);
    Ok(())
}

/// `$VISUAL`, then `$EDITOR`, then `vi`, split into program and arguments.
fn editor_command<F>(lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|key| lookup(*key))
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "vi".to_string())
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
