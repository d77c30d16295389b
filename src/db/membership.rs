//! Set-valued text columns.
//!
//! Product brands are stored bracketed (`[3,7]`), occasions comma-joined
//! (`party,casual`). Both are matched with `LIKE` patterns anchored on the
//! delimiters, so the stored form must stay normalized: no whitespace, no
//! duplicates, brand ids ascending.

use crate::errors::ServiceError;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MembershipError {
    #[error("expected a bracketed id list like [1,2], got '{0}'")]
    Unbracketed(String),

    #[error("'{0}' is not an integer id")]
    InvalidId(String),

    #[error("occasion tag '{0}' contains characters outside letters, digits, spaces and '-'")]
    InvalidTag(String),
}

impl From<MembershipError> for ServiceError {
    fn from(err: MembershipError) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}

/// Encodes ids as `[a,b,c]`: deduplicated, ascending, no whitespace.
pub fn encode_ids<I>(ids: I) -> String
where
    I: IntoIterator<Item = i32>,
{
    let ids: BTreeSet<i32> = ids.into_iter().collect();
    let joined = ids
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("[{joined}]")
}

/// Decodes a bracketed id list. Whitespace around members is tolerated and
/// `[]` decodes to an empty list.
pub fn decode_ids(raw: &str) -> Result<Vec<i32>, MembershipError> {
    let inner = raw
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| MembershipError::Unbracketed(raw.to_string()))?;

    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    inner
        .split(',')
        .map(|member| {
            let member = member.trim();
            member
                .parse::<i32>()
                .map_err(|_| MembershipError::InvalidId(member.to_string()))
        })
        .collect()
}

/// The four `LIKE` patterns that locate `id` inside an encoded id list:
/// solo, first, last and middle position.
pub fn id_patterns(id: i32) -> [String; 4] {
    [
        format!("[{id}]"),
        format!("[{id},%"),
        format!("%,{id}]"),
        format!("%,{id},%"),
    ]
}

/// Normalizes occasion tags: trims, lowercases, drops empties, removes
/// duplicates while keeping first-seen order. Tags are restricted so they can
/// be embedded in a `LIKE` pattern without escaping. Lowercasing keeps the
/// equality and `LIKE` comparisons agreeing on every backend.
pub fn normalize_tags<I, S>(tags: I) -> Result<Vec<String>, MembershipError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim().to_lowercase();
        if tag.is_empty() {
            continue;
        }
        if !tag
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == ' ')
        {
            return Err(MembershipError::InvalidTag(tag));
        }
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    Ok(out)
}

/// Comma-joins normalized tags.
pub fn encode_tags<I, S>(tags: I) -> Result<String, MembershipError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Ok(normalize_tags(tags)?.join(","))
}

pub fn decode_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// `LIKE` patterns locating `tag` as the first, last or a middle member of a
/// comma-joined list. The solo case is an exact equality match.
pub fn tag_patterns(tag: &str) -> [String; 3] {
    [
        format!("{tag},%"),
        format!("%,{tag}"),
        format!("%,{tag},%"),
    ]
}
