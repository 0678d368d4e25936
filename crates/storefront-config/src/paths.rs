//! Backend load-path resolution.

/// Resolves a relative load path against an origin.
///
/// Returns `None` for an empty path. Absolute `http(s)://` paths and paths
/// without an origin are returned unchanged. Otherwise one leading `/` and
/// then one leading `./` are stripped and the remainder is joined onto the
/// origin.
pub fn resolve_load_path(path: &str, origin: Option<&str>) -> Option<String> {
    if path.is_empty() {
        return None;
    }

    match origin {
        Some(origin) if !origin.is_empty() && !is_remote(path) => {
            let relative = path.strip_prefix('/').unwrap_or(path);
            let relative = relative.strip_prefix("./").unwrap_or(relative);
            Some(format!("{origin}/{relative}"))
        }
        _ => Some(path.to_string()),
    }
}

/// Whether the path is an `http://` or `https://` URL.
pub fn is_remote(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_path_resolves_to_none() {
        assert_eq!(resolve_load_path("", Some("/srv/app")), None);
        assert_eq!(resolve_load_path("", None), None);
    }

    #[test]
    fn test_path_without_origin_is_unchanged() {
        assert_eq!(
            resolve_load_path("/locales/{{lng}}/{{ns}}.ftl", None).as_deref(),
            Some("/locales/{{lng}}/{{ns}}.ftl")
        );
        assert_eq!(
            resolve_load_path("./locales/{{lng}}/{{ns}}.ftl", Some("")).as_deref(),
            Some("./locales/{{lng}}/{{ns}}.ftl")
        );
    }

    #[test]
    fn test_leading_slash_is_stripped() {
        assert_eq!(
            resolve_load_path("/locales/{{lng}}/{{ns}}.ftl", Some("/srv/app")).as_deref(),
            Some("/srv/app/locales/{{lng}}/{{ns}}.ftl")
        );
    }

    #[test]
    fn test_leading_dot_slash_is_stripped() {
        assert_eq!(
            resolve_load_path("./locales/{{lng}}/{{ns}}.ftl", Some("/srv/app")).as_deref(),
            Some("/srv/app/locales/{{lng}}/{{ns}}.ftl")
        );
    }

    #[test]
    fn test_plain_relative_path_is_joined() {
        assert_eq!(
            resolve_load_path("locales/{{lng}}/{{ns}}.ftl", Some("/srv/app")).as_deref(),
            Some("/srv/app/locales/{{lng}}/{{ns}}.ftl")
        );
    }

    #[test]
    fn test_remote_path_is_unchanged() {
        let url = "https://cdn.example.com/{{lng}}/{{ns}}.ftl";
        assert_eq!(resolve_load_path(url, Some("/srv/app")).as_deref(), Some(url));
        assert!(is_remote("http://localhost/x"));
        assert!(!is_remote("/srv/http/x"));
    }
}
