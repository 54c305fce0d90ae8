use crate::remote::{self, Remote, Target};
use anyhow::{Context, Result};
use ghjson::{ContentsApi, Workflow};

pub fn run(remote: &Remote, target: &Target, input: &str) -> Result<()> {
    let text = remote::read_input(input)?;
    let client = remote.client()?;
    let mut workflow = target.workflow()?;
    remote::load(&mut workflow, &client)?;

    let version = apply_text(&client, &mut workflow, text)?;
    println!("{}", version);
    Ok(())
}

/// Replaces the buffer with `text` and saves it, returning the new version.
pub fn apply_text<A>(api: &A, workflow: &mut Workflow, text: String) -> Result<String>
where
    A: ContentsApi + ?Sized,
{
    workflow.edit(text)?;
    let result = workflow.apply(api);
    if let Some(status) = workflow.buffer().and_then(|b| b.status()) {
        eprintln!("{}", status);
    }
    remote::report(workflow);
    result.with_context(|| format!("Failed to save {}", workflow.handle()))?;

    Ok(workflow.version().unwrap_or_default().to_string())
}
