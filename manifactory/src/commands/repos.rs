use crate::context::AppContext;
use anyhow::Context as _;
use libmanifactory::Registry;
use std::io::Write;

/// Handle the repos command (list the registry catalog)
pub fn handle_repos(ctx: &AppContext, registry_url: &str) -> anyhow::Result<()> {
    let mut registry = ctx.registry(registry_url)?;
    let stdout = std::io::stdout();
    list_repositories(&mut registry, &mut stdout.lock())
}

/// Writes every catalog repository to `out`, one per line.
pub fn list_repositories<W: Write>(registry: &mut Registry, out: &mut W) -> anyhow::Result<()> {
    let repositories = registry
        .catalog()
        .with_context(|| format!("can not list catalog of {}", registry.client().registry_url()))?;
    tracing::debug!("catalog returned {} repositories", repositories.len());

    for repository in repositories {
        writeln!(out, "{}", repository)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "repos_tests.rs"]
mod tests;
