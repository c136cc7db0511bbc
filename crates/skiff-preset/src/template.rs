//! Placeholder templates for output paths.
//!
//! Preset output paths are written as templates holding `{{ token }}`
//! placeholders (e.g. `{{ buildDir }}/dev`). The token vocabulary is fixed:
//! a template naming anything outside [`KNOWN_TOKENS`] is a configuration
//! error, and a known token missing from the resolve context fails resolution
//! instead of passing through.

use std::collections::BTreeMap;

/// Placeholder tokens a preset template may use.
///
/// - `buildDir`: absolute root for all build output
/// - `rootDir`: project root the build was invoked from
/// - `preset`: name of the preset being resolved
pub const KNOWN_TOKENS: &[&str] = &["buildDir", "rootDir", "preset"];

/// Comma-separated token list for error messages.
pub(crate) fn known_tokens_list() -> String {
    KNOWN_TOKENS.join(", ")
}

/// Values substituted for placeholder tokens at resolution time.
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    values: BTreeMap<String, String>,
}

impl ResolveContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a token value, builder style.
    ///
    /// # Example
    ///
    /// ```
    /// use skiff_preset::ResolveContext;
    ///
    /// let ctx = ResolveContext::new().with("buildDir", "/out");
    /// assert_eq!(ctx.get("buildDir"), Some("/out"));
    /// ```
    pub fn with(mut self, token: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(token.into(), value.into());
        self
    }

    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) {
        self.values.insert(token.into(), value.into());
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }
}

/// Why a template failed to resolve.
///
/// Carries only the template-local detail; the merger wraps it with the
/// preset name and output key for the final error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateIssue {
    /// Token is outside the [`KNOWN_TOKENS`] vocabulary.
    UnknownToken(String),
    /// Token is known but the context has no value for it.
    MissingValue(String),
    /// `{{` with no closing `}}`.
    Unterminated,
}

/// Substitute every `{{ token }}` placeholder in `template`.
///
/// Whitespace inside the braces is ignored (`{{buildDir}}` and
/// `{{ buildDir }}` are equivalent). Text outside placeholders is copied
/// through untouched.
pub fn resolve_template(template: &str, ctx: &ResolveContext) -> Result<String, TemplateIssue> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            return Err(TemplateIssue::Unterminated);
        };

        let token = after[..end].trim();
        if !KNOWN_TOKENS.contains(&token) {
            return Err(TemplateIssue::UnknownToken(token.to_string()));
        }
        match ctx.get(token) {
            Some(value) => out.push_str(value),
            None => return Err(TemplateIssue::MissingValue(token.to_string())),
        }

        rest = &after[end + 2..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Check whether a string still contains placeholder syntax.
pub fn has_placeholders(path: &str) -> bool {
    path.contains("{{")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ResolveContext {
        ResolveContext::new()
            .with("buildDir", "/out")
            .with("preset", "dev")
    }

    #[test]
    fn resolves_single_token() {
        let resolved = resolve_template("{{ buildDir }}/dev", &ctx()).unwrap();
        assert_eq!(resolved, "/out/dev");
    }

    #[test]
    fn resolves_multiple_tokens() {
        let resolved = resolve_template("{{ buildDir }}/{{ preset }}/server", &ctx()).unwrap();
        assert_eq!(resolved, "/out/dev/server");
    }

    #[test]
    fn whitespace_inside_braces_is_ignored() {
        let resolved = resolve_template("{{buildDir}}/dev", &ctx()).unwrap();
        assert_eq!(resolved, "/out/dev");
    }

    #[test]
    fn plain_paths_pass_through() {
        let resolved = resolve_template("/var/www/out", &ctx()).unwrap();
        assert_eq!(resolved, "/var/www/out");
    }

    #[test]
    fn missing_value_is_an_error() {
        let ctx = ResolveContext::new().with("preset", "dev");
        let err = resolve_template("{{ buildDir }}/dev", &ctx).unwrap_err();
        assert_eq!(err, TemplateIssue::MissingValue("buildDir".to_string()));
    }

    #[test]
    fn unknown_token_is_an_error_even_with_a_value() {
        // A context value for an unknown token must not legitimize it.
        let ctx = ctx().with("sneaky", "/tmp");
        let err = resolve_template("{{ sneaky }}/dev", &ctx).unwrap_err();
        assert_eq!(err, TemplateIssue::UnknownToken("sneaky".to_string()));
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        let err = resolve_template("{{ buildDir /dev", &ctx()).unwrap_err();
        assert_eq!(err, TemplateIssue::Unterminated);
    }

    #[test]
    fn complete_context_leaves_no_placeholders() {
        let resolved =
            resolve_template("{{ buildDir }}/{{ preset }}/{{ rootDir }}", &ctx().with("rootDir", "r"))
                .unwrap();
        assert!(!has_placeholders(&resolved));
    }
}
