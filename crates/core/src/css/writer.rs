//! Minimal CSS text builder with fixed formatting: two-space indentation,
//! one declaration per line, a blank line between top-level blocks.

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Rule {
    pub selector: String,
    pub declarations: Vec<(String, String)>,
}

impl Rule {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            declarations: Vec::new(),
        }
    }

    pub fn push(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.declarations.push((property.into(), value.into()));
    }

    pub fn push_opt(&mut self, property: impl Into<String>, value: Option<String>) {
        if let Some(value) = value {
            self.push(property, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    fn write(&self, out: &mut String, indent: &str) {
        out.push_str(&format!("{indent}{} {{\n", self.selector));
        for (property, value) in &self.declarations {
            out.push_str(&format!("{indent}  {property}: {value};\n"));
        }
        out.push_str(&format!("{indent}}}\n"));
    }
}

#[derive(Debug, Default)]
pub(crate) struct StyleSheet {
    out: String,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    fn separate(&mut self) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
    }

    /// Writes a top-level rule. Empty rules are skipped.
    pub fn rule(&mut self, rule: &Rule) {
        if rule.is_empty() {
            return;
        }
        self.separate();
        rule.write(&mut self.out, "");
    }

    /// Writes an at-rule block such as `@media (...)` around `rules`.
    /// Nothing is written when every rule is empty.
    pub fn at_rule(&mut self, prelude: &str, rules: &[Rule]) {
        if rules.iter().all(Rule::is_empty) {
            return;
        }
        self.separate();
        self.out.push_str(&format!("{prelude} {{\n"));
        for rule in rules.iter().filter(|r| !r.is_empty()) {
            rule.write(&mut self.out, "  ");
        }
        self.out.push_str("}\n");
    }

    /// Writes `outer` around one inner at-rule per block, such as media
    /// queries inside an `@supports` block. Empty blocks are skipped.
    pub fn nested_at_rule(&mut self, outer: &str, blocks: &[(String, Rule)]) {
        let mut blocks = blocks.iter().filter(|(_, rule)| !rule.is_empty()).peekable();
        if blocks.peek().is_none() {
            return;
        }
        self.separate();
        self.out.push_str(&format!("{outer} {{\n"));
        for (prelude, rule) in blocks {
            self.out.push_str(&format!("  {prelude} {{\n"));
            rule.write(&mut self.out, "    ");
            self.out.push_str("  }\n");
        }
        self.out.push_str("}\n");
    }

    /// Appends a finished stylesheet as further top-level blocks.
    pub fn append(&mut self, css: &str) {
        if css.is_empty() {
            return;
        }
        self.separate();
        self.out.push_str(css);
    }

    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_rules_and_blocks() {
        let mut rule = Rule::new(".a");
        rule.push("display", "grid");
        rule.push_opt("gap", Some("1rem".into()));
        rule.push_opt("padding", None);

        let mut inner = Rule::new(".a");
        inner.push("gap", "0.5rem");

        let mut sheet = StyleSheet::new();
        sheet.rule(&rule);
        sheet.rule(&Rule::new(".empty"));
        sheet.at_rule("@media (max-width: 640px)", &[inner]);
        sheet.at_rule("@media (max-width: 1024px)", &[Rule::new(".a")]);

        assert_eq!(
            sheet.finish(),
            ".a {\n  display: grid;\n  gap: 1rem;\n}\n\n@media (max-width: 640px) {\n  .a {\n    gap: 0.5rem;\n  }\n}\n"
        );
    }

    #[test]
    fn nests_blocks_inside_an_outer_rule() {
        let mut inner = Rule::new(".a");
        inner.push("gap", "0.5rem");

        let mut sheet = StyleSheet::new();
        sheet.nested_at_rule(
            "@supports not (container-type: inline-size)",
            &[
                ("@media (max-width: 640px)".to_string(), inner),
                ("@media (max-width: 320px)".to_string(), Rule::new(".a")),
            ],
        );
        sheet.nested_at_rule("@supports (display: grid)", &[]);

        assert_eq!(
            sheet.finish(),
            "@supports not (container-type: inline-size) {\n  @media (max-width: 640px) {\n    .a {\n      gap: 0.5rem;\n    }\n  }\n}\n"
        );
    }
}
