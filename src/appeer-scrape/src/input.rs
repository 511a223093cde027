//! URL-list ingestion: a provided in-memory list, a plaintext file (one
//! URL/DOI per line), or a JSON file (`article_url` key per element).
//!
//! A plaintext file is tried first, falling back to JSON if that fails to
//! parse as a plain line-per-entry file; this is the trial order used
//! when a path (rather than an in-memory list) is given.

use crate::Error;
use serde::Deserialize;
use std::{fs, path::Path};

/// Where a batch of scrape inputs came from — echoed onto the job's `mode`
/// column for operator visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceType {
    List,
    Plaintext,
    Json,
}

impl DataSourceType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Plaintext => "plaintext",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonEntry {
    article_url: String,
}

/// Normalize an in-memory list of URLs/DOIs: each bare DOI is rewritten to
/// its resolvable `https://doi.org/...` form.
#[must_use]
pub fn from_list(urls: &[String]) -> (DataSourceType, Vec<String>) {
    (
        DataSourceType::List,
        urls.iter().map(|u| appeer_core::check_doi_format(u)).collect(),
    )
}

/// Read a plaintext file, one URL/DOI per line. A line with more than one
/// whitespace-separated token is a hard error (`BadInput`).
///
/// # Errors
///
/// Returns [`Error::BadInput`] if the file cannot be read, or a line
/// contains more than one token.
pub fn from_plaintext(path: &Path) -> Result<Vec<String>, Error> {
    let contents = fs::read_to_string(path)
        .map_err(|err| Error::BadInput(format!("cannot read `{}`: {err}", path.display())))?;

    let mut urls = Vec::new();
    for (n, line) in contents.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.split_whitespace().count() > 1 {
            return Err(Error::BadInput(format!(
                "line {} of `{}` has more than one token",
                n + 1,
                path.display()
            )));
        }
        urls.push(appeer_core::check_doi_format(trimmed));
    }
    Ok(urls)
}

/// Read a JSON file: a list of objects each carrying an `article_url` key.
/// Other keys are ignored.
///
/// # Errors
///
/// Returns [`Error::BadInput`] if the file cannot be read or does not
/// parse as the expected shape.
pub fn from_json(path: &Path) -> Result<Vec<String>, Error> {
    let contents = fs::read_to_string(path)
        .map_err(|err| Error::BadInput(format!("cannot read `{}`: {err}", path.display())))?;
    let entries: Vec<JsonEntry> = serde_json::from_str(&contents)
        .map_err(|err| Error::BadInput(format!("invalid JSON in `{}`: {err}", path.display())))?;
    Ok(entries
        .into_iter()
        .map(|e| appeer_core::check_doi_format(&e.article_url))
        .collect())
}

/// Try plaintext, then JSON, against `path` — whichever succeeds first
/// determines the [`DataSourceType`].
///
/// # Errors
///
/// Returns [`Error::BadInput`] if neither format can be parsed.
pub fn from_path(path: &Path) -> Result<(DataSourceType, Vec<String>), Error> {
    match from_plaintext(path) {
        Ok(urls) => Ok((DataSourceType::Plaintext, urls)),
        Err(plaintext_err) => match from_json(path) {
            Ok(urls) => Ok((DataSourceType::Json, urls)),
            Err(_) => Err(plaintext_err),
        },
    }
}

/// A line with a non-URL, non-DOI token is coerced to this sentinel rather
/// than dropped, so the planner can still produce an (invalid) action for
/// it and the job's accounting stays consistent with `no_of_publications`.
pub const NO_URL_SENTINEL: &str = "no_url";

/// Resolve an input token to either itself (if it looks usable) or the
/// `no_url` sentinel. The planner is responsible for recognizing both
/// `no_url` and any other non-`https://` token as `invalid_url`/`skip`.
#[must_use]
pub fn coerce(token: &str) -> String {
    if appeer_core::looks_like_url(token) {
        token.to_string()
    } else {
        NO_URL_SENTINEL.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn plaintext_rejects_multi_token_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "https://example.org/a extra").unwrap();
        let err = from_plaintext(file.path()).unwrap_err();
        assert!(matches!(err, Error::BadInput(_)));
    }

    #[test]
    fn plaintext_rewrites_bare_dois() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "10.1039/D3OB00424D").unwrap();
        let urls = from_plaintext(file.path()).unwrap();
        assert_eq!(urls, vec!["https://doi.org/10.1039/D3OB00424D"]);
    }

    #[test]
    fn json_reads_article_url_key() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"article_url": "https://example.org/a", "ignored": 1}}]"#).unwrap();
        let urls = from_json(file.path()).unwrap();
        assert_eq!(urls, vec!["https://example.org/a"]);
    }

    #[test]
    fn coerce_sentinels_unrecognized_tokens() {
        assert_eq!(coerce("not_a_url"), NO_URL_SENTINEL);
        assert_eq!(coerce("https://example.org"), "https://example.org");
    }
}
