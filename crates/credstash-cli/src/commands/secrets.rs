//! Secret metadata commands.
//!
//! Provides `credstash list|versions|latest|delete`. None of these read key
//! or payload material: every query projects `name` and `version` only.

use std::collections::BTreeSet;
use std::io::Write;

use credstash_repository::{RepositoryError, SecretRecord, SecretRepository, SelectOptions};

/// Print every secret and version, sorted by name then version.
pub async fn list<R, W>(repo: &R, out: &mut W) -> anyhow::Result<()>
where
    R: SecretRepository + ?Sized,
    W: Write,
{
    let mut records = repo.list().await?;

    if records.is_empty() {
        writeln!(out, "No secrets stored.")?;
        return Ok(());
    }

    records.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.version.cmp(&b.version)));
    let secrets: BTreeSet<&str> = records.iter().map(|r| r.name.as_str()).collect();

    writeln!(out, "{:<40} VERSION", "NAME")?;
    writeln!(out, "{}", "-".repeat(60))?;
    for r in &records {
        writeln!(out, "{:<40} {}", r.name, r.version)?;
    }
    writeln!(
        out,
        "\n{} version(s) of {} secret(s).",
        records.len(),
        secrets.len()
    )?;
    Ok(())
}

/// Print the versions of `name`, newest first. A limit of zero prints nothing.
pub async fn versions<R, W>(
    repo: &R,
    name: &str,
    limit: Option<u32>,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: SecretRepository + ?Sized,
    W: Write,
{
    if limit == Some(0) {
        return Ok(());
    }

    let mut options = SelectOptions::identity_only();
    if let Some(limit) = limit {
        options = options.limit(limit);
    }

    let mut records = repo.select(name, &options).await?;
    if records.is_empty() {
        return Err(RepositoryError::NotFound(name.to_string()).into());
    }
    // Unlimited selects come back oldest first.
    if limit.is_none() {
        records.reverse();
    }

    for r in &records {
        writeln!(out, "{}", r.version)?;
    }
    Ok(())
}

/// Print the latest version token of `name`.
pub async fn latest<R, W>(repo: &R, name: &str, out: &mut W) -> anyhow::Result<()>
where
    R: SecretRepository + ?Sized,
    W: Write,
{
    match repo.latest_version(name).await? {
        Some(version) => {
            writeln!(out, "{}", version)?;
            Ok(())
        }
        None => Err(RepositoryError::NotFound(name.to_string()).into()),
    }
}

/// Delete one version of `name`, or all of them when `version` is `None`.
pub async fn delete<R, W>(
    repo: &R,
    name: &str,
    version: Option<&str>,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: SecretRepository + ?Sized,
    W: Write,
{
    match version {
        Some(version) => {
            repo.delete(&SecretRecord::identity(name, version)).await?;
            writeln!(out, "Deleted {} version {}.", name, version)?;
        }
        None => {
            let removed = repo.delete_all(name).await?;
            if removed == 0 {
                return Err(RepositoryError::NotFound(name.to_string()).into());
            }
            writeln!(out, "Deleted {} version(s) of {}.", removed, name)?;
        }
    }
    Ok(())
}
