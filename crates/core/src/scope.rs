//! In-scope filtering of project-relative paths.

/// Which project areas count as graph targets and roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Any of the listed path prefixes, e.g. `src/components/`.
    Prefixes(Vec<String>),
    /// Everything under the source root.
    SourceRoot(String),
}

impl Scope {
    /// Prefix mode when any prefix is configured, blanket mode otherwise.
    ///
    /// The source root always ends in `/`, so `src` does not match `srcgen/`.
    pub fn from_config(prefixes: &[String], source_root: &str) -> Self {
        if prefixes.is_empty() {
            let mut root = source_root.to_string();
            if !root.is_empty() && !root.ends_with('/') {
                root.push('/');
            }
            Scope::SourceRoot(root)
        } else {
            Scope::Prefixes(prefixes.to_vec())
        }
    }

    pub fn in_scope(&self, relative: &str) -> bool {
        match self {
            Scope::Prefixes(prefixes) => prefixes.iter().any(|p| relative.starts_with(p.as_str())),
            Scope::SourceRoot(root) => relative.starts_with(root.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component_centric() -> Scope {
        Scope::from_config(
            &[
                "src/components/".to_string(),
                "src/pages/".to_string(),
                "src/app/".to_string(),
                "app/".to_string(),
            ],
            "src/",
        )
    }

    #[test]
    fn test_prefix_mode() {
        let scope = component_centric();
        assert!(scope.in_scope("src/components/Card/Card.tsx"));
        assert!(scope.in_scope("src/pages/about.tsx"));
        assert!(scope.in_scope("app/blogs/page.tsx"));
        assert!(!scope.in_scope("src/lib/api.ts"));
        assert!(!scope.in_scope("src/main.tsx"));
    }

    #[test]
    fn test_blanket_source_root_mode() {
        let scope = Scope::from_config(&[], "src/");
        assert_eq!(scope, Scope::SourceRoot("src/".to_string()));
        assert!(scope.in_scope("src/lib/api.ts"));
        assert!(!scope.in_scope("scripts/build.ts"));
    }

    #[test]
    fn test_source_root_without_slash_stops_at_directory() {
        let scope = Scope::from_config(&[], "src");
        assert_eq!(scope, Scope::SourceRoot("src/".to_string()));
        assert!(scope.in_scope("src/main.ts"));
        assert!(!scope.in_scope("srcgen/x.ts"));
    }
}
