/// `true` if `token` already looks like a fully qualified URL. Only
/// `https://` counts — the scrape planner rejects anything else as an
/// invalid URL, so treating `http://` as "already fine" here would let it
/// slip past normalization only to be skipped downstream.
#[must_use]
pub fn looks_like_url(token: &str) -> bool {
    token.starts_with("https://")
}

/// Normalize a single line of a plaintext input file into something the
/// scrape planner can work with.
///
/// A bare DOI (e.g. `10.1039/d0cp01234a`) is rewritten into its resolvable
/// form (`https://doi.org/10.1039/d0cp01234a`). A token that already looks
/// like a URL is returned unchanged. Anything else is returned unchanged
/// too — the planner downstream is responsible for recognizing it as an
/// unsupported/invalid entry rather than this helper guessing.
#[must_use]
pub fn check_doi_format(token: &str) -> String {
    let token = token.trim();

    if looks_like_url(token) {
        return token.to_string();
    }

    if token.starts_with("10.") && token.contains('/') {
        return format!("https://doi.org/{token}");
    }

    token.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_bare_doi() {
        assert_eq!(
            check_doi_format("10.1039/d0cp01234a"),
            "https://doi.org/10.1039/d0cp01234a"
        );
    }

    #[test]
    fn leaves_urls_untouched() {
        let url = "https://pubs.rsc.org/en/content/articlelanding/2020/cp/d0cp01234a";
        assert_eq!(check_doi_format(url), url);
    }

    #[test]
    fn leaves_unrecognized_tokens_untouched() {
        assert_eq!(check_doi_format("not-a-doi"), "not-a-doi");
    }
}
