/// Form of a document URL that is safe to log or echo back. Presigned URLs
/// carry their signature in the query string, so query and fragment are
/// replaced and any `user:password@` part is removed.
pub fn redacted_url(url: &str) -> String {
    let (base, had_suffix) = match url.find(['?', '#']) {
        Some(index) => (&url[..index], true),
        None => (url, false),
    };

    let base = strip_userinfo(base);
    if had_suffix {
        format!("{base}?[REDACTED]")
    } else {
        base
    }
}

fn strip_userinfo(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let authority_start = scheme_end + 3;
    let authority_end = url[authority_start..]
        .find('/')
        .map_or(url.len(), |i| authority_start + i);

    match url[authority_start..authority_end].rfind('@') {
        Some(at) => format!(
            "{}{}",
            &url[..authority_start],
            &url[authority_start + at + 1..]
        ),
        None => url.to_string(),
    }
}
