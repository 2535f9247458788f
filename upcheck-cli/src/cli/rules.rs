//! Rules command - print the rule catalog

use anyhow::Result;
use console::style;
use upcheck::rules::{default_rules, Rule};

/// One line per rule, in evaluation order
fn render(rules: &[std::sync::Arc<dyn Rule>]) -> String {
    let mut out = String::new();
    for (i, rule) in rules.iter().enumerate() {
        let info = rule.info();
        out.push_str(&format!(
            "{:>2}. {:<24} {:<8} {}\n    {}\n",
            i + 1,
            info.id,
            info.severity.to_string(),
            info.title,
            info.doc_url
        ));
    }
    out
}

/// Run the rules command
pub fn run() -> Result<()> {
    let rules = default_rules();
    println!(
        "\n{} ({} rules, evaluated top to bottom)\n",
        style("Rule catalog").bold(),
        rules.len()
    );
    print!("{}", render(&rules));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_every_rule_in_order() {
        let rules = default_rules();
        let out = render(&rules);
        assert_eq!(out.lines().count(), rules.len() * 2);
        assert!(out.starts_with(" 1. node-roles"));
        let roles = out.find("node-roles").unwrap();
        let unknown = out.find("unknown-settings").unwrap();
        assert!(roles < unknown);
    }
}
