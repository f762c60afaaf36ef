use std::collections::HashMap;
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::{IoResultExt, Result, ThemeError};
use crate::model::ColorReplacement;

/// Extensions of text assets that carry color tokens. Anything else is left alone.
pub const TEMPLATE_EXTENSIONS: [&str; 3] = ["css", "scss", "svg"];

pub fn is_template_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            TEMPLATE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Single-pass substitution of many tokens at once.
///
/// Every token is matched against the original text only, so a replacement that
/// happens to contain another token is never substituted again.
#[derive(Debug, Clone)]
pub struct TokenReplacer {
    matcher: Option<Regex>,
    values: HashMap<String, String>,
}

impl TokenReplacer {
    pub fn new(replacements: &[ColorReplacement]) -> Result<Self> {
        let mut values = HashMap::with_capacity(replacements.len());
        for replacement in replacements {
            if replacement.token.is_empty() {
                return Err(ThemeError::validation("Replacement token cannot be empty"));
            }
            // First pair for a token wins.
            values
                .entry(replacement.token.clone())
                .or_insert_with(|| replacement.value.clone());
        }

        if values.is_empty() {
            return Ok(Self {
                matcher: None,
                values,
            });
        }

        let mut tokens: Vec<&str> = values.keys().map(String::as_str).collect();
        // Longest first so a token that prefixes another never shadows it.
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let pattern = tokens
            .iter()
            .map(|token| regex::escape(token))
            .collect::<Vec<_>>()
            .join("|");
        let matcher = Regex::new(&pattern)
            .map_err(|err| ThemeError::validation(format!("Invalid token set: {err}")))?;

        Ok(Self {
            matcher: Some(matcher),
            values,
        })
    }

    pub fn replace(&self, content: &str) -> String {
        match &self.matcher {
            Some(matcher) => matcher
                .replace_all(content, |caps: &regex::Captures<'_>| {
                    self.values
                        .get(&caps[0])
                        .cloned()
                        .unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned(),
            None => content.to_string(),
        }
    }
}

/// Rewrite every template file directly inside `directory`.
///
/// Not transactional: if a file fails midway, files handled before it stay rewritten.
pub fn apply(replacements: &[ColorReplacement], directory: &Path) -> Result<()> {
    let replacer = TokenReplacer::new(replacements)?;

    let mut paths = Vec::new();
    for entry in fs::read_dir(directory).at_path(directory)? {
        let entry = entry.at_path(directory)?;
        let path = entry.path();
        if path.is_file() && is_template_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    for path in paths {
        rewrite_file(&replacer, &path)?;
    }
    Ok(())
}

/// Substitute tokens in one file. Non-template files are skipped.
pub fn replace_keywords(path: &Path, replacements: &[ColorReplacement]) -> Result<()> {
    if !is_template_file(path) {
        return Ok(());
    }
    let replacer = TokenReplacer::new(replacements)?;
    rewrite_file(&replacer, path)
}

fn rewrite_file(replacer: &TokenReplacer, path: &Path) -> Result<()> {
    let content = fs::read_to_string(path).at_path(path)?;
    fs::write(path, replacer.replace(&content)).at_path(path)?;
    tracing::debug!(file = %path.display(), "applied color tokens");
    Ok(())
}
