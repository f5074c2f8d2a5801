use super::writer::{Rule, StyleSheet};
use crate::resolver::ResolvedTokenSet;

/// One custom property per resolved token under `selector`, ordered by
/// token reference.
pub fn generate_theme_css(selector: &str, resolved: &ResolvedTokenSet) -> String {
    let mut rule = Rule::new(selector);
    for (reference, value) in &resolved.values {
        rule.push(reference.css_variable(), value.to_css());
    }
    let mut sheet = StyleSheet::new();
    sheet.rule(&rule);
    sheet.finish()
}
