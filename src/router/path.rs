//! Request path normalization.

/// Normalize a request path before it is matched against routes.
///
/// Surrounding whitespace is trimmed, a leading `/` is ensured, and `.`,
/// `..` and repeated separators are resolved lexically. `..` never climbs
/// above the root. A trailing `/` on the input survives cleaning, so
/// `/blog/` and `/blog` stay distinguishable to patterns such as `/blog/$`.
///
/// # Examples
///
/// ```
/// use remux::router::normalize;
///
/// assert_eq!(normalize(""), "/");
/// assert_eq!(normalize("foo/bar"), "/foo/bar");
/// assert_eq!(normalize("/a/./b/../c//d"), "/a/c/d");
/// assert_eq!(normalize("/a/b/"), "/a/b/");
/// assert_eq!(normalize("/../.."), "/");
/// ```
pub fn normalize(path: &str) -> String {
    let path = path.trim();
    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut cleaned = String::with_capacity(path.len() + 1);
    for segment in &segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }

    if cleaned.is_empty() || path.ends_with('/') {
        cleaned.push('/');
    }
    cleaned
}
