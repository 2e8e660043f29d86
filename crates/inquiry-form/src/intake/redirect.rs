/// Add `key=value` to the query string of `url`, replacing any existing `key`.
/// A trailing `#fragment` is kept after the query.
pub fn add_query_arg(url: &str, key: &str, value: &str) -> String {
    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    };
    let (path, query) = base.split_once('?').unwrap_or((base, ""));

    let mut pairs: Vec<&str> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some(key))
        .collect();
    let added = format!("{key}={value}");
    pairs.push(&added);

    let mut target = format!("{path}?{}", pairs.join("&"));
    if let Some(fragment) = fragment {
        target.push('#');
        target.push_str(fragment);
    }
    target
}

/// Whether `url` stays on this site: a path rooted at `/`, or an absolute
/// http(s) URL whose authority is exactly `host`.
pub fn is_local_redirect(url: &str, host: Option<&str>) -> bool {
    let url = url.trim();
    if url.starts_with('/') {
        return !url.starts_with("//") && !url.starts_with("/\\");
    }
    let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    else {
        return false;
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    match host.map(str::trim) {
        Some(host) if !host.is_empty() => {
            !authority.contains('@') && authority.eq_ignore_ascii_case(host)
        }
        _ => false,
    }
}
