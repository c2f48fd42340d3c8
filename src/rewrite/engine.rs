//! Weighted first-match rewrite selection.

use regex::Regex;

use crate::decision::model::RewriteRule;
use crate::rewrite::path::decode_path;
use crate::rewrite::template::expand_placeholders;
use crate::rewrite::RewriteError;

/// Apply the highest-weighted rule whose pattern matches `path`.
///
/// Rules are tried in descending weight order; rules with equal weight keep
/// their relative order from `rules`. Returns the rewritten, percent-decoded
/// path and `true`, or the original path and `false` when nothing applied.
pub fn select_and_rewrite(path: &str, rules: &[RewriteRule]) -> (String, bool) {
    let mut ordered: Vec<&RewriteRule> = rules.iter().collect();
    // sort_by is stable, which makes ties deterministic.
    ordered.sort_by(|a, b| b.weight.cmp(&a.weight));

    for rule in ordered {
        match try_rule(rule, path) {
            Ok(Some(rewritten)) => {
                tracing::debug!(
                    pattern = %rule.pattern,
                    weight = rule.weight,
                    from = %path,
                    to = %rewritten,
                    "Rewrite rule applied"
                );
                return (rewritten, true);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(rule_id = rule.id, weight = rule.weight, error = %e, "Skipping rewrite rule");
            }
        }
    }

    (path.to_string(), false)
}

/// Evaluate a single rule. `Ok(None)` means the pattern did not match.
fn try_rule(rule: &RewriteRule, path: &str) -> Result<Option<String>, RewriteError> {
    let pattern = Regex::new(&rule.pattern).map_err(|source| RewriteError::Pattern {
        pattern: rule.pattern.clone(),
        source,
    })?;

    if !pattern.is_match(path) {
        return Ok(None);
    }

    // Every non-overlapping match is replaced, not only the first.
    let template = expand_placeholders(&rule.template);
    let replaced = pattern.replace_all(path, template.as_str());
    decode_path(&replaced).map(Some)
}
