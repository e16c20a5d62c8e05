//! CLI execution context.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context as _, Result};
use tabletop_auth::SessionToken;
use tabletop_shop::Storefront;

use crate::config::CliConfig;
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the config came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(resolve(&cwd, path)),
            None => CliConfig::discover(&cwd),
        };
        let config = match &config_path {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Directory relative paths in the config are resolved against.
    pub fn base_dir(&self) -> PathBuf {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone())
    }

    /// Open the storefront and restore a saved login.
    pub fn open_shop(&self) -> Result<Storefront> {
        let settings = self.config.shop_settings(&self.base_dir())?;
        let mut shop = Storefront::open(settings).context("Failed to open the shop database")?;

        if let Some(token) = self.saved_session()? {
            match shop.resume(&token) {
                Ok(user) => self.output.debug(&format!("Resumed session for {}", user.username)),
                Err(e) => {
                    self.output.debug(&format!("Saved session dropped: {}", e));
                    self.clear_session()?;
                }
            }
        }
        Ok(shop)
    }

    /// Open the storefront and load the catalog behind a spinner.
    pub async fn open_catalog(&self) -> Result<Storefront> {
        let mut shop = self.open_shop()?;
        let spinner = self.output.spinner("Loading catalog...");
        let loaded = shop.refresh().await;
        spinner.finish_and_clear();
        loaded.context("Failed to load the catalog")?;
        Ok(shop)
    }

    /// Where the session token is kept between runs.
    pub fn session_file(&self) -> Result<PathBuf> {
        let data_dir =
            dirs::data_local_dir().ok_or_else(|| anyhow!("Data directory not found"))?;
        Ok(data_dir.join("tabletop").join("session"))
    }

    fn saved_session(&self) -> Result<Option<SessionToken>> {
        let path = self.session_file()?;
        if !path.exists() {
            return Ok(None);
        }
        let token = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read session file: {}", path.display()))?;
        let token = token.trim();
        Ok((!token.is_empty()).then(|| SessionToken::new(token)))
    }

    /// Remember the storefront's current session, or forget it when logged out.
    pub fn save_session(&self, shop: &Storefront) -> Result<()> {
        let Some(token) = shop.session_token() else {
            return self.clear_session();
        };
        let path = self.session_file()?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        write_private(&path, token.as_str())
            .with_context(|| format!("Failed to write session file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "session saved");
        Ok(())
    }

    pub fn clear_session(&self) -> Result<()> {
        let path = self.session_file()?;
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove session file: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "session cleared");
        }
        Ok(())
    }
}

fn resolve(cwd: &Path, path: &str) -> PathBuf {
    if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        cwd.join(path)
    }
}

/// Write `contents` to a file only the current user can read.
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;

    // `mode` only applies on creation; tighten a file left by an older run.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_private_replaces_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session");
        write_private(&path, "first-token-longer").unwrap();
        write_private(&path, "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_private_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session");
        write_private(&path, "token").unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        write_private(&path, "token").unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
