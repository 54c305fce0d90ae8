use anyhow::{Context, Result, bail};
use clap::Args;
use ghjson::{
    ClientConfig, ContentsApi, FileHandle, GitHubClient, Phase, Workflow, WorkflowConfig,
    default_document,
};
use std::io::Read;

/// Connection options shared by every remote command.
#[derive(Args, Debug, Clone)]
pub struct Remote {
    /// GitHub token (defaults to $GHJSON_TOKEN, then $GITHUB_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// API base URL, for GitHub Enterprise (defaults to $GHJSON_API_BASE)
    #[arg(long, global = true)]
    pub api_base: Option<String>,
}

impl Remote {
    pub fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(token) = &self.token {
            config = config.with_token(token.as_str());
        }
        if let Some(base) = &self.api_base {
            config = config.with_api_base(base.as_str());
        }
        config
    }

    pub fn client(&self) -> Result<GitHubClient> {
        GitHubClient::new(self.config()).context("Failed to build HTTP client")
    }
}

/// The file a command operates on.
#[derive(Args, Debug, Clone)]
pub struct Target {
    /// Repository owner (user or organization)
    #[arg(short, long)]
    pub owner: String,

    /// Repository name
    #[arg(short, long)]
    pub repo: String,

    /// Path of the JSON file inside the repository
    #[arg(short, long, default_value = ghjson::DEFAULT_PATH)]
    pub path: String,
}

impl Target {
    pub fn handle(&self) -> Result<FileHandle> {
        Ok(FileHandle::new(&self.owner, &self.repo, &self.path)?)
    }

    pub fn workflow(&self) -> Result<Workflow> {
        Ok(Workflow::new(
            self.handle()?,
            WorkflowConfig::default(),
            default_document(),
        ))
    }
}

/// Loads the target and fails unless a document ended up in the buffer.
pub fn load<A>(workflow: &mut Workflow, api: &A) -> Result<()>
where
    A: ContentsApi + ?Sized,
{
    let result = workflow.load(api);
    report(workflow);
    result.with_context(|| format!("Failed to load {}", workflow.handle()))?;

    if workflow.phase() != Phase::Loaded {
        bail!("Nothing to edit in {}", workflow.handle());
    }
    Ok(())
}

/// Prints the workflow status to stderr.
pub fn report(workflow: &Workflow) {
    if let Some(status) = workflow.status() {
        eprintln!("{}", status);
    }
}

/// Reads a file, or stdin for `-`.
pub fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {:?}", input))
    }
}
