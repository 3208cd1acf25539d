//! `%(key)` placeholder substitution for titles and description lines.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("invalid key '{key}' in '{template}'")]
    UnknownKey { key: String, template: String },

    #[error("unclosed placeholder in '{template}'")]
    Unclosed { template: String },
}

/// Substitute `%(key)` placeholders in `template` with values from `vars`.
///
/// A `%` not followed by `(` passes through literally, as does any other
/// character. An unknown key is a hard error echoing both the key and the
/// full template.
pub fn substitute(template: &str, vars: &[(&str, &str)]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find("%(") {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];
        let end = after.find(')').ok_or_else(|| TemplateError::Unclosed {
            template: template.to_string(),
        })?;
        let key = &after[..end];
        let value = vars
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .ok_or_else(|| TemplateError::UnknownKey {
                key: key.to_string(),
                template: template.to_string(),
            })?;
        out.push_str(value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_keys() {
        let cases = [
            ("%(abc) - %(d)", "ABC - D"),
            ("%%(abc)%%(d)%", "%ABC%D%"),
            ("%(ab)c)", "ABc)"),
            ("plain text", "plain text"),
            ("", ""),
        ];
        let vars = [("abc", "ABC"), ("d", "D"), ("ab", "AB")];
        for (template, expected) in cases {
            assert_eq!(substitute(template, &vars).unwrap(), expected);
        }
    }

    #[test]
    fn empty_key_resolves() {
        assert_eq!(substitute("%()", &[("", "A")]).unwrap(), "A");
    }

    #[test]
    fn unknown_key_is_a_hard_error() {
        let err = substitute("x %(missing) y", &[("k", "v")]).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnknownKey {
                key: "missing".to_string(),
                template: "x %(missing) y".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "invalid key 'missing' in 'x %(missing) y'"
        );
    }

    #[test]
    fn unclosed_placeholder_is_a_hard_error() {
        let err = substitute("%(abc", &[("abc", "A")]).unwrap_err();
        assert_eq!(
            err,
            TemplateError::Unclosed {
                template: "%(abc".to_string(),
            }
        );
    }

    #[test]
    fn lone_percent_passes_through() {
        assert_eq!(substitute("100% done", &[]).unwrap(), "100% done");
    }
}
