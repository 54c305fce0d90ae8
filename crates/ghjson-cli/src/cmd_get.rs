use crate::remote::{self, Remote, Target};
use anyhow::{Result, anyhow};

pub fn run(remote: &Remote, target: &Target) -> Result<()> {
    let client = remote.client()?;
    let mut workflow = target.workflow()?;
    remote::load(&mut workflow, &client)?;

    let buffer = workflow
        .buffer()
        .ok_or_else(|| anyhow!("No document loaded"))?;
    println!("{}", buffer.text());
    Ok(())
}
