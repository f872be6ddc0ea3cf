use crate::context::AppContext;
use anyhow::Context as _;
use libmanifactory::Registry;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use url::Url;

/// Handle the tags command (list tags for every repository in the input)
pub fn handle_tags(
    ctx: &AppContext,
    registry_url: &str,
    repos_file: Option<&Path>,
    names: bool,
) -> anyhow::Result<()> {
    let mut registry = ctx.registry(registry_url)?;
    let host = image_host(registry_url)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match repos_file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("can not open repository list {}", path.display()))?;
            list_tags(&mut registry, &host, BufReader::new(file), &mut out, names)
        }
        None => {
            tracing::info!("reading from stdin");
            let stdin = std::io::stdin();
            list_tags(&mut registry, &host, stdin.lock(), &mut out, names)
        }
    }
}

/// Reads repository names line by line and writes one line per tag.
///
/// Blank lines are skipped. A repository whose tags can not be listed is
/// logged and skipped; a read failure on `input` aborts.
pub fn list_tags<R: BufRead, W: Write>(
    registry: &mut Registry,
    host: &str,
    input: R,
    out: &mut W,
    names: bool,
) -> anyhow::Result<()> {
    for line in input.lines() {
        let line = line.context("can not read repository list")?;
        let repository = line.trim();
        if repository.is_empty() {
            continue;
        }

        let tags = match registry.tags(repository) {
            Ok(tags) => tags,
            Err(e) => {
                tracing::error!("can not list tags for {}: {}", repository, e);
                continue;
            }
        };

        for tag in tags {
            if names {
                writeln!(out, "{}", image_name(host, repository, &tag))?;
            } else {
                writeln!(out, "{}/{}", repository, tag)?;
            }
        }
    }
    Ok(())
}

/// Returns `host[:port]` of a registry URL as it was typed.
///
/// A port written out is kept even when it is the scheme's default.
pub fn image_host(registry_url: &str) -> anyhow::Result<String> {
    let registry_url = registry_url.trim();
    let with_scheme = if registry_url.contains("://") {
        registry_url.to_string()
    } else {
        format!("https://{}", registry_url)
    };

    let url = Url::parse(&with_scheme)
        .with_context(|| format!("incorrect registry URL '{}'", registry_url))?;
    let host = url
        .host_str()
        .with_context(|| format!("registry URL '{}' has no host", registry_url))?;

    // Url drops default ports, so look at the authority as written.
    let authority = with_scheme
        .split_once("://")
        .map_or(with_scheme.as_str(), |(_, rest)| rest);
    let authority = authority
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let authority = authority.rsplit('@').next().unwrap_or_default();
    let after_host = authority.rsplit(']').next().unwrap_or_default();
    let explicit_port = after_host.contains(':');

    Ok(match url.port_or_known_default() {
        Some(port) if explicit_port => format!("{}:{}", host, port),
        _ => host.to_string(),
    })
}

/// Full image reference; digest tags are joined with `@`.
pub fn image_name(host: &str, repository: &str, tag: &str) -> String {
    let separator = if tag.starts_with("sha256:") { '@' } else { ':' };
    format!("{}/{}{}{}", host, repository, separator, tag)
}

#[cfg(test)]
#[path = "tags_tests.rs"]
mod tests;
