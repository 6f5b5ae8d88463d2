use anyhow::{anyhow, Result};
use clap::Args;
use std::path::PathBuf;

use crate::domain::value_objects::scm_url::ScmUrl;
use crate::infrastructure::scm::ScmError;
use crate::presentation::cli::context::CommandContext;

/// Checkout command arguments
#[derive(Debug, Clone, Args)]
pub struct CheckoutArgs {
    /// Repository URL
    pub url: String,

    /// Destination directory (defaults to the project name in the URL)
    pub dest: Option<PathBuf>,
}

/// Handler for the checkout command
pub struct CheckoutCommand {
    args: CheckoutArgs,
}

impl CheckoutCommand {
    pub fn new(args: CheckoutArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, context: &CommandContext) -> Result<()> {
        if !context.scm.is_valid_url(&self.args.url) {
            return Err(ScmError::InvalidUrl {
                url: self.args.url.clone(),
            }
            .into());
        }

        let url = ScmUrl::new(&self.args.url).map_err(ScmError::from)?;
        let dest = match &self.args.dest {
            Some(dest) => dest.clone(),
            None => default_destination(&url)
                .ok_or_else(|| anyhow!("Cannot derive a directory name from {}", url))?,
        };

        context.scm.checkout_url(url.as_str(), &dest).await?;

        context.display.success(&format!(
            "Checked out {} into {}",
            context.display.format_url(url.as_str()),
            context.display.format_path(&dest.display().to_string())
        ));
        Ok(())
    }
}

/// Project directory name: the path segment above trunk/branches/tags, or the
/// last segment when the URL has no such layout
pub fn default_destination(url: &ScmUrl) -> Option<PathBuf> {
    let base = match url.layout() {
        Ok(layout) => layout.root,
        Err(_) => url.as_str().to_string(),
    };

    let (_, path) = base.split_once("://")?;
    path.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && path.contains('/'))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination(url: &str) -> Option<PathBuf> {
        default_destination(&ScmUrl::new(url).unwrap())
    }

    #[test]
    fn test_default_destination() {
        assert_eq!(destination("svn://host/pkg/trunk"), Some(PathBuf::from("pkg")));
        assert_eq!(
            destination("https://host/repos/pkg/branches/1.x/"),
            Some(PathBuf::from("pkg"))
        );
        assert_eq!(
            destination("file:///var/svn/pkg/tags/1.0"),
            Some(PathBuf::from("pkg"))
        );
        assert_eq!(destination("svn://host/sandbox"), Some(PathBuf::from("sandbox")));
        assert_eq!(destination("svn://host"), None);
    }
}
