//! Path mapping read from a project's `tsconfig.json`.
//!
//! Only `compilerOptions.baseUrl` and wildcard `compilerOptions.paths`
//! entries are used. `extends` chains are not followed.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

pub const TSCONFIG_FILE: &str = "tsconfig.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsConfig {
    #[serde(default)]
    pub compiler_options: CompilerOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    pub base_url: Option<String>,
    #[serde(default)]
    pub paths: BTreeMap<String, Vec<String>>,
}

impl TsConfig {
    /// Load `<root>/tsconfig.json`. A missing file is `Ok(None)`.
    pub fn load(root: &Path) -> Result<Option<Self>, ConfigError> {
        let path = root.join(TSCONFIG_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&text)
            .map(Some)
            .map_err(|source| ConfigError::Json { path, source })
    }

    /// Parse tsconfig text, which may carry comments and trailing commas.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(&strip_jsonc(text))
    }

    /// Wildcard `paths` entries as `(prefix, replacement)` aliases relative
    /// to the project root. Only the first target of each entry is used.
    pub fn aliases(&self) -> BTreeMap<String, String> {
        let base = self.compiler_options.base_url.as_deref().unwrap_or(".");
        let base = base.trim_end_matches('/');

        let mut aliases = BTreeMap::new();
        for (pattern, targets) in &self.compiler_options.paths {
            let (Some(prefix), Some(target)) = (
                pattern.strip_suffix('*'),
                targets.first().and_then(|t| t.strip_suffix('*')),
            ) else {
                debug!(%pattern, "skipping non-wildcard tsconfig path");
                continue;
            };
            aliases.insert(prefix.to_string(), format!("{base}/{target}"));
        }
        aliases
    }

    pub fn base_url(&self) -> Option<&str> {
        self.compiler_options.base_url.as_deref()
    }
}

/// Drop `//` and `/* */` comments plus trailing commas, leaving strings
/// untouched.
fn strip_jsonc(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            (']' | '}', _) => {
                let trimmed = out.trim_end().len();
                if out[..trimmed].ends_with(',') {
                    out.truncate(trimmed - 1);
                }
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
