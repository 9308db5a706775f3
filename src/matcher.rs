use crate::models::Category;

pub const MAX_SUGGESTIONS: usize = 5;

/// Looks up categories by name, `parent / name`, `group / name` or `group / parent / name`.
///
/// Every segment is an exact, case-insensitive comparison. With two segments the
/// `parent / name` reading wins whenever it finds anything; `group / name` is only
/// tried when it finds nothing.
pub fn find<'a>(categories: &'a [Category], query: &str) -> Vec<&'a Category> {
    let parts: Vec<String> = query.split('/').map(|p| p.trim().to_lowercase()).collect();

    match parts.as_slice() {
        [group, parent, child] => categories
            .iter()
            .filter(|c| {
                field_eq(c.group.as_deref(), group)
                    && field_eq(c.parent.as_deref(), parent)
                    && name_matches(c, child)
            })
            .collect(),
        [first, second] => {
            let parent_child: Vec<_> = categories
                .iter()
                .filter(|c| field_eq(c.parent.as_deref(), first) && name_matches(c, second))
                .collect();
            if !parent_child.is_empty() {
                return parent_child;
            }
            categories
                .iter()
                .filter(|c| field_eq(c.group.as_deref(), first) && name_matches(c, second))
                .collect()
        }
        _ => {
            let wanted = query.trim().to_lowercase();
            categories.iter().filter(|c| name_matches(c, &wanted)).collect()
        }
    }
}

/// Labels of categories whose name or title contains `query`, first hits in page order.
pub fn suggest(categories: &[Category], query: &str) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    let mut suggestions: Vec<String> = Vec::new();

    for c in categories {
        if !(c.title.to_lowercase().contains(&needle) || c.name.to_lowercase().contains(&needle)) {
            continue;
        }
        let label = c.label();
        if !suggestions.contains(&label) {
            suggestions.push(label);
        }
        if suggestions.len() >= MAX_SUGGESTIONS {
            break;
        }
    }
    suggestions
}

fn name_matches(c: &Category, wanted: &str) -> bool {
    c.title.to_lowercase() == wanted || c.name.to_lowercase() == wanted
}

fn field_eq(field: Option<&str>, wanted: &str) -> bool {
    field.is_some_and(|f| f.to_lowercase() == wanted)
}
