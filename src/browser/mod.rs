use std::io::Write;

use anyhow::{Context, Result};

pub trait Browser {
    fn open(&self, url: &str) -> Result<()>;
}

/// Hands the URL to the platform's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        tracing::info!(%url, "opening browser");
        open::that(url).with_context(|| format!("failed to open browser: {url}"))
    }
}

/// `--dry-run`: prints the URL that would have been opened.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintBrowser;

impl Browser for PrintBrowser {
    fn open(&self, url: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        match writeln!(stdout, "dry-run: would open {url}") {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
