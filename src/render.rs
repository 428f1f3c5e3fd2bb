//! Fill named placeholders in a text template

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

// Placeholder tokens look like {{SLURM_HEAD}}: double braces, upper snake case.
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([A-Z][A-Z0-9_]*)\}\}").expect("constant regex pattern is valid")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unresolved template placeholder {{{{{0}}}}}")]
    Unresolved(String),
}

/// Replace every `{{NAME}}` token with the value supplied under the
/// lower-case key `name`.
///
/// Substitution is a single pass over the template: replacement text is
/// inserted literally and never re-scanned, so a value that contains a
/// `{{...}}` token of its own is not expanded again. A template token
/// with no supplied value is an error.
pub fn render(template: &str, values: &[(&str, &str)]) -> Result<String, TemplateError> {
    let values: HashMap<String, &str> = values
        .iter()
        .map(|(key, value)| (key.to_ascii_uppercase(), *value))
        .collect();

    let mut missing: Option<String> = None;
    let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures| {
        let name = &caps[1];
        match values.get(name) {
            Some(value) => (*value).to_string(),
            None => {
                missing.get_or_insert_with(|| name.to_string());
                caps[0].to_string()
            }
        }
    });

    match missing {
        Some(name) => Err(TemplateError::Unresolved(name)),
        None => Ok(rendered.into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_supplied_placeholders() {
        let rendered = render("a {{X}} b {{Y}}", &[("x", "1"), ("y", "2")]);
        assert_eq!(rendered.unwrap(), "a 1 b 2");
    }

    #[test]
    fn keys_are_matched_against_uppercased_tokens() {
        let rendered = render("{{SLURM_HEAD}}", &[("slurm_head", "#SBATCH --ntasks=1")]);
        assert_eq!(rendered.unwrap(), "#SBATCH --ntasks=1");
    }

    #[test]
    fn unresolved_placeholder_is_an_error() {
        let rendered = render("{{COMMAND}}", &[]);
        assert_eq!(rendered, Err(TemplateError::Unresolved("COMMAND".to_string())));
    }

    #[test]
    fn values_are_not_reexpanded() {
        let rendered = render("{{CMD}}", &[("cmd", "echo {{CMD}}")]);
        assert_eq!(rendered.unwrap(), "echo {{CMD}}");
    }

    #[test]
    fn text_without_placeholders_passes_through() {
        let rendered = render("#!/bin/bash\nmodule load cuda\n", &[]);
        assert_eq!(rendered.unwrap(), "#!/bin/bash\nmodule load cuda\n");
    }

    #[test]
    fn lowercase_braced_text_is_not_a_placeholder() {
        let rendered = render("{{not_a_token}}", &[]);
        assert_eq!(rendered.unwrap(), "{{not_a_token}}");
    }
}
