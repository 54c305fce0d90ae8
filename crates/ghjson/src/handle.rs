use crate::error::{Error, Result};
use std::fmt;

/// Identifies a JSON document in a remote repository: owner, repository, and
/// the path of the file inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle {
    owner: String,
    repo: String,
    path: String,
}

impl FileHandle {
    /// Builds a handle, trimming whitespace and surrounding `/` from the path.
    ///
    /// Owner, repository, and path must all be non-empty.
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        path: impl Into<String>,
    ) -> Result<Self> {
        let owner = owner.into().trim().to_string();
        let repo = repo.into().trim().to_string();
        let path = path.into().trim().trim_matches('/').to_string();

        if owner.is_empty() {
            return Err(Error::InvalidHandle("owner is empty".into()));
        }
        if repo.is_empty() {
            return Err(Error::InvalidHandle("repository is empty".into()));
        }
        if path.is_empty() {
            return Err(Error::InvalidHandle("path is empty".into()));
        }

        Ok(Self { owner, repo, path })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// URL of the contents endpoint for this file.
    ///
    /// Owner, repository, and each path segment are percent-encoded on their
    /// own so that `/` separators inside the path survive.
    pub fn contents_url(&self, api_base: &str) -> String {
        let path = self
            .path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        format!(
            "{}/repos/{}/{}/contents/{}",
            api_base.trim_end_matches('/'),
            urlencoding::encode(&self.owner),
            urlencoding::encode(&self.repo),
            path
        )
    }
}

impl fmt::Display for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.owner, self.repo, self.path)
    }
}
