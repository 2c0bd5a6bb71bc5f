//! Filesystem module resolution for TypeScript/JavaScript projects.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use super::{ModuleResolver, Resolution};
use crate::module::ModuleId;
use crate::path_policy::VENDOR_MARKER;

/// Extensions tried, in order, when a specifier omits one.
pub const EXTENSIONS: &[&str] = &["ts", "tsx", "d.ts", "js", "jsx", "mjs", "json"];

/// Source extensions a compiled-extension specifier may stand for, so
/// `./b.js` finds `b.ts`.
const SOURCE_FOR_OUTPUT: &[(&str, &[&str])] = &[
    ("js", &["ts", "tsx"]),
    ("jsx", &["tsx"]),
    ("mjs", &["mts"]),
    ("cjs", &["cts"]),
];

/// Resolves relative, root-absolute, aliased and package specifiers
/// against the project on disk.
#[derive(Debug, Clone)]
pub struct FsResolver {
    root: PathBuf,
    /// `(prefix, replacement)`, longest prefix first
    aliases: Vec<(String, String)>,
    /// Directory bare specifiers are tried against before `node_modules`
    base_url: Option<PathBuf>,
}

impl FsResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into().clean(),
            aliases: Vec::new(),
            base_url: None,
        }
    }

    /// Add path aliases such as `"@/" -> "src/"`, resolved against the root.
    pub fn with_aliases<I, K, V>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.aliases
            .extend(aliases.into_iter().map(|(k, v)| (k.into(), v.into())));
        self.aliases.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        self
    }

    /// Resolve bare specifiers under `base_url` (relative to the root) too.
    pub fn with_base_url(mut self, base_url: impl AsRef<Path>) -> Self {
        self.base_url = Some(self.root.join(base_url).clean());
        self
    }

    /// Paths to try for `specifier`, in order.
    fn candidates(&self, from: &Path, specifier: &str) -> Vec<PathBuf> {
        let is_relative = specifier == "."
            || specifier == ".."
            || specifier.starts_with("./")
            || specifier.starts_with("../");

        if is_relative {
            return vec![from.parent().unwrap_or(Path::new("")).join(specifier).clean()];
        }
        if let Some(rest) = specifier.strip_prefix('/') {
            return vec![self.root.join(rest).clean()];
        }
        if let Some((prefix, replacement)) = self
            .aliases
            .iter()
            .find(|(prefix, _)| specifier.starts_with(prefix.as_str()))
        {
            let rewritten = format!("{}{}", replacement, &specifier[prefix.len()..]);
            return vec![self.root.join(rewritten).clean()];
        }

        let mut candidates = Vec::with_capacity(2);
        if let Some(base_url) = &self.base_url {
            candidates.push(base_url.join(specifier).clean());
        }
        candidates.push(self.root.join(VENDOR_MARKER).join(specifier).clean());
        candidates
    }
}

impl ModuleResolver for FsResolver {
    fn resolve(&self, from: &ModuleId, specifier: &str) -> Resolution {
        match self
            .candidates(from.as_path(), specifier)
            .iter()
            .find_map(|candidate| resolve_with_extensions(candidate))
        {
            Some(path) => Resolution::Resolved(ModuleId::new(path)),
            None => Resolution::Unresolved,
        }
    }
}

/// Try the path as-is, then its source counterpart for a compiled
/// extension, then with each extension appended, then as a directory
/// holding an `index.*` file.
pub fn resolve_with_extensions(candidate: &Path) -> Option<PathBuf> {
    try_extensions(candidate).or_else(|| try_index_files(candidate))
}

fn try_extensions(base: &Path) -> Option<PathBuf> {
    if base.is_file() {
        return Some(base.to_path_buf());
    }
    if let Some(source) = try_source_extension(base) {
        return Some(source);
    }

    // Appended rather than swapped so `api.service` becomes `api.service.ts`.
    EXTENSIONS.iter().find_map(|ext| {
        let mut name = OsString::from(base.as_os_str());
        name.push(".");
        name.push(ext);
        let with_ext = PathBuf::from(name);
        with_ext.is_file().then_some(with_ext)
    })
}

/// `./b.js` written in ESM TypeScript refers to `b.ts` on disk.
fn try_source_extension(base: &Path) -> Option<PathBuf> {
    let ext = base.extension()?.to_str()?;
    let (_, sources) = SOURCE_FOR_OUTPUT.iter().find(|(output, _)| *output == ext)?;
    sources.iter().find_map(|source| {
        let swapped = base.with_extension(source);
        swapped.is_file().then_some(swapped)
    })
}

fn try_index_files(dir: &Path) -> Option<PathBuf> {
    if !dir.is_dir() {
        return None;
    }
    EXTENSIONS.iter().find_map(|ext| {
        let index = dir.join(format!("index.{ext}"));
        index.is_file().then_some(index)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn project() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();

        fs::create_dir_all(root.join("src/components/Button")).unwrap();
        fs::create_dir_all(root.join("src/lib")).unwrap();
        fs::create_dir_all(root.join("node_modules/left-pad")).unwrap();
        File::create(root.join("src/main.tsx")).unwrap();
        File::create(root.join("src/components/Button/index.tsx")).unwrap();
        File::create(root.join("src/components/Card.tsx")).unwrap();
        File::create(root.join("src/lib/api.service.ts")).unwrap();
        File::create(root.join("node_modules/left-pad/index.js")).unwrap();

        (temp_dir, root)
    }

    #[test]
    fn test_relative_extension_lookup() {
        let (_guard, root) = project();
        let resolver = FsResolver::new(&root);
        let from = ModuleId::new(root.join("src/main.tsx"));

        assert_eq!(
            resolver.resolve(&from, "./components/Card"),
            Resolution::Resolved(ModuleId::new(root.join("src/components/Card.tsx")))
        );
    }

    #[test]
    fn test_directory_index() {
        let (_guard, root) = project();
        let resolver = FsResolver::new(&root);
        let from = ModuleId::new(root.join("src/components/Card.tsx"));

        assert_eq!(
            resolver.resolve(&from, "./Button"),
            Resolution::Resolved(ModuleId::new(root.join("src/components/Button/index.tsx")))
        );
    }

    #[test]
    fn test_dotted_stem_gets_extension_appended() {
        let (_guard, root) = project();
        let resolver = FsResolver::new(&root);
        let from = ModuleId::new(root.join("src/main.tsx"));

        assert_eq!(
            resolver.resolve(&from, "./lib/api.service"),
            Resolution::Resolved(ModuleId::new(root.join("src/lib/api.service.ts")))
        );
    }

    #[test]
    fn test_alias() {
        let (_guard, root) = project();
        let resolver = FsResolver::new(&root).with_aliases([("@/", "src/")]);
        let from = ModuleId::new(root.join("src/main.tsx"));

        assert_eq!(
            resolver.resolve(&from, "@/components/Button"),
            Resolution::Resolved(ModuleId::new(root.join("src/components/Button/index.tsx")))
        );
    }

    #[test]
    fn test_root_absolute() {
        let (_guard, root) = project();
        let resolver = FsResolver::new(&root);
        let from = ModuleId::new(root.join("src/components/Card.tsx"));

        assert_eq!(
            resolver.resolve(&from, "/src/main"),
            Resolution::Resolved(ModuleId::new(root.join("src/main.tsx")))
        );
    }

    #[test]
    fn test_package_lands_in_vendor_tree() {
        let (_guard, root) = project();
        let resolver = FsResolver::new(&root);
        let from = ModuleId::new(root.join("src/main.tsx"));

        assert_eq!(
            resolver.resolve(&from, "left-pad"),
            Resolution::Resolved(ModuleId::new(root.join("node_modules/left-pad/index.js")))
        );
    }

    #[test]
    fn test_compiled_extension_maps_to_source() {
        let (_guard, root) = project();
        fs::write(root.join("src/lib/date.ts"), "").unwrap();
        fs::write(root.join("src/lib/view.tsx"), "").unwrap();
        let resolver = FsResolver::new(&root);
        let from = ModuleId::new(root.join("src/main.tsx"));

        assert_eq!(
            resolver.resolve(&from, "./lib/date.js"),
            Resolution::Resolved(ModuleId::new(root.join("src/lib/date.ts")))
        );
        assert_eq!(
            resolver.resolve(&from, "./lib/view.jsx"),
            Resolution::Resolved(ModuleId::new(root.join("src/lib/view.tsx")))
        );
        assert_eq!(resolver.resolve(&from, "./lib/gone.js"), Resolution::Unresolved);
    }

    #[test]
    fn test_real_js_file_wins_over_source_swap() {
        let (_guard, root) = project();
        fs::write(root.join("src/lib/legacy.js"), "").unwrap();
        fs::write(root.join("src/lib/legacy.ts"), "").unwrap();
        let resolver = FsResolver::new(&root);
        let from = ModuleId::new(root.join("src/main.tsx"));

        assert_eq!(
            resolver.resolve(&from, "./lib/legacy.js"),
            Resolution::Resolved(ModuleId::new(root.join("src/lib/legacy.js")))
        );
    }

    #[test]
    fn test_base_url_before_vendor_tree() {
        let (_guard, root) = project();
        let resolver = FsResolver::new(&root).with_base_url("src");
        let from = ModuleId::new(root.join("src/main.tsx"));

        assert_eq!(
            resolver.resolve(&from, "components/Card"),
            Resolution::Resolved(ModuleId::new(root.join("src/components/Card.tsx")))
        );
        assert_eq!(
            resolver.resolve(&from, "left-pad"),
            Resolution::Resolved(ModuleId::new(root.join("node_modules/left-pad/index.js")))
        );
    }

    #[test]
    fn test_missing_targets_are_unresolved() {
        let (_guard, root) = project();
        let resolver = FsResolver::new(&root);
        let from = ModuleId::new(root.join("src/main.tsx"));

        assert_eq!(resolver.resolve(&from, "./nope"), Resolution::Unresolved);
        assert_eq!(resolver.resolve(&from, "react"), Resolution::Unresolved);
    }
}
