//! Fixed-width version tokens.
//!
//! The backing table orders sort keys as raw strings, so version numbers are
//! zero-padded to a fixed width before they are stored. The repository never
//! calls these itself; writers use them to pick the next token.

use crate::error::{RepositoryError, Result};

/// Digits in a padded version token.
pub const PAD_WIDTH: usize = 19;

/// Largest version number that fits in [`PAD_WIDTH`] digits.
pub const MAX_VERSION: u64 = 9_999_999_999_999_999_999;

/// Zero-pad `n` to [`PAD_WIDTH`] digits.
///
/// Numbers above [`MAX_VERSION`] would need a wider token and sort before
/// smaller ones, so they are rejected.
pub fn pad(n: u64) -> Result<String> {
    if n > MAX_VERSION {
        return Err(RepositoryError::InvalidVersion(n.to_string()));
    }
    Ok(format!("{n:0width$}", width = PAD_WIDTH))
}

/// Token for the first version of a secret.
pub fn initial() -> String {
    format!("{:0width$}", 1, width = PAD_WIDTH)
}

/// Token following `latest`, or [`initial`] when there is none.
pub fn next(latest: Option<&str>) -> Result<String> {
    let Some(latest) = latest else {
        return Ok(initial());
    };
    let n: u64 = latest
        .trim()
        .parse()
        .map_err(|_| RepositoryError::InvalidVersion(latest.to_string()))?;
    match n.checked_add(1) {
        Some(n) if n <= MAX_VERSION => pad(n),
        _ => Err(RepositoryError::InvalidVersion(latest.to_string())),
    }
}
