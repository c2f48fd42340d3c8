//! Rewrite template handling.
//!
//! Templates are literal paths with `{name}` placeholders, e.g.
//! `/new/{tenant}/more/{rest}`. Before substitution they are turned into the
//! replacement syntax of the `regex` crate, where `${name}` refers to the
//! named capture group `name`.

use std::sync::LazyLock;

use regex::Regex;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)\}").expect("placeholder pattern is valid"));

/// Convert `{name}` placeholders into `${name}` group references.
///
/// Literal `$` characters are escaped first so they survive substitution.
pub fn expand_placeholders(template: &str) -> String {
    let escaped = template.replace('$', "$$");
    // `$$` is a literal dollar, `${1}` the captured placeholder name.
    PLACEHOLDER.replace_all(&escaped, "$${${1}}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_named_placeholders() {
        assert_eq!(
            expand_placeholders("/new/{test_var}/more/{another}"),
            "/new/${test_var}/more/${another}"
        );
        assert_eq!(expand_placeholders("/zoo/{asd}"), "/zoo/${asd}");
    }

    #[test]
    fn test_literal_template_untouched() {
        assert_eq!(expand_placeholders("/static/path"), "/static/path");
        assert_eq!(expand_placeholders("/open{brace"), "/open{brace");
    }

    #[test]
    fn test_dollar_is_escaped() {
        assert_eq!(expand_placeholders("/price/$5/{id}"), "/price/$$5/${id}");

        let re = Regex::new(r"/item/(?P<id>\d+)").unwrap();
        let out = re.replace("/item/42", expand_placeholders("/price/$5/{id}").as_str());
        assert_eq!(out, "/price/$5/42");
    }
}
