//! Decides whether the current address is the exit destination.

use url::Url;

/// Whether `current` points at `exit`.
///
/// Fails closed: anything that is not an absolute URI never matches.
/// Scheme and host compare case-insensitively, the path compares with one
/// trailing `/` removed, and query and fragment are ignored.
pub fn matches(current: &str, exit: &str) -> bool {
    let (Ok(current), Ok(exit)) = (Url::parse(current.trim()), Url::parse(exit.trim())) else {
        return false;
    };
    key(&current) == key(&exit)
}

fn key(url: &Url) -> (String, Option<String>, &str) {
    let path = url.path();
    let path = path.strip_suffix('/').unwrap_or(path);
    (
        url.scheme().to_ascii_lowercase(),
        url.host_str().map(str::to_ascii_lowercase),
        path,
    )
}
