use crate::context::AppContext;
use anyhow::Context as _;
use libmanifactory::Registry;
use std::io::Write;

/// Handle the manifest command (print one image manifest as JSON)
pub fn handle_manifest(
    ctx: &AppContext,
    registry_url: &str,
    repository: &str,
    tag: &str,
) -> anyhow::Result<()> {
    let mut registry = ctx.registry(registry_url)?;
    let stdout = std::io::stdout();
    print_manifest(&mut registry, repository, tag, &mut stdout.lock())
}

/// Fetches `repository:tag` and writes the manifest as pretty JSON.
///
/// A manifest list is not an error: the registry client already logged it
/// and the zero manifest is printed.
pub fn print_manifest<W: Write>(
    registry: &mut Registry,
    repository: &str,
    tag: &str,
    out: &mut W,
) -> anyhow::Result<()> {
    let manifest = registry
        .manifest(repository, tag)
        .with_context(|| format!("can not fetch manifest for {}:{}", repository, tag))?
        .into_manifest();

    let json = serde_json::to_string_pretty(&manifest)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
