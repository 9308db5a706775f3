use anyhow::Result;

use crate::models::Category;

/// Human-readable listing for `--list-categories`, grouped by page section.
pub fn render_listing(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found. Check the URL.\n".to_string();
    }

    let mut out = String::new();
    let mut current_group: Option<Option<&str>> = None;

    for c in categories {
        let group = c.group.as_deref();
        if current_group != Some(group) {
            current_group = Some(group);
            out.push_str(&format!("\n  {}\n", group.unwrap_or("Uncategorized")));
            out.push_str(&format!("  {}\n", "─".repeat(50)));
        }

        let marker = if c.is_active() { '+' } else { '-' };
        let line = match &c.parent {
            Some(parent) => format!("        [{}] {} / {}\n", marker, parent, c.title),
            None => format!("    [{}] {}\n", marker, c.title),
        };
        out.push_str(&line);
    }

    let active = categories.iter().filter(|c| c.is_active()).count();
    out.push_str(&format!(
        "\n  Total: {} categories ({} active, {} inactive)\n",
        categories.len(),
        active,
        categories.len() - active
    ));
    out
}

pub fn render_json(categories: &[Category]) -> Result<String> {
    Ok(serde_json::to_string_pretty(categories)?)
}
