use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::{fs, io::AsyncWriteExt};

pub const DEFAULT_SESSION_FILE: &str = ".sesame-session";

/// On-disk session token; its presence means "logged in".
#[derive(Clone, Debug)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.sesame-session`, or the working directory without `HOME`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        std::env::var_os("HOME").map_or_else(
            || PathBuf::from(DEFAULT_SESSION_FILE),
            |home| PathBuf::from(home).join(DEFAULT_SESSION_FILE),
        )
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store `token`, readable by the owner only.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, token: &str) -> std::io::Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&self.path).await?;
        file.write_all(token.as_bytes()).await?;
        file.flush().await
    }

    /// Read the stored token, `None` when logged out.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read.
    pub async fn load(&self) -> std::io::Result<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Remove the stored token. Missing files are fine.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub async fn clear(&self) -> std::io::Result<()> {
        match fs::remove_file(&self.path).await {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}
