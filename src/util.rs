pub(crate) fn urljoin(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

pub(crate) fn non_empty(value: &str) -> Option<&str> {
    let v = value.trim();
    if v.is_empty() { None } else { Some(v) }
}

/// Masks all but the last four characters of a credential for log output.
pub(crate) fn redact(secret: &str) -> String {
    let n = secret.chars().count();
    if n <= 4 {
        return "*".repeat(n);
    }
    let tail: String = secret.chars().skip(n - 4).collect();
    format!("{}{}", "*".repeat(n - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://api.cosm.com", "/v2/feeds/1" ; "no trailing slash")]
    #[test_case("https://api.cosm.com/", "/v2/feeds/1" ; "trailing slash")]
    #[test_case("https://api.cosm.com//", "v2/feeds/1" ; "relative path")]
    fn urljoin_normalizes_slashes(base: &str, path: &str) {
        assert_eq!(urljoin(base, path), "https://api.cosm.com/v2/feeds/1");
    }

    #[test]
    fn non_empty_trims() {
        assert_eq!(non_empty("  59484 "), Some("59484"));
        assert_eq!(non_empty(" \t"), None);
    }

    #[test]
    fn redact_keeps_tail() {
        assert_eq!(redact("abcdefgh"), "****efgh");
        assert_eq!(redact("abc"), "***");
    }
}
