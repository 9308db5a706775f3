use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    /// Parts are orderable, the link is clickable.
    Active,
    /// Parts unavailable, the link is rendered disabled.
    Inactive,
}

impl CategoryStatus {
    pub fn is_active(self) -> bool {
        self == CategoryStatus::Active
    }
}

/// One category link scraped from the listing page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub title: String,
    pub href: String,
    pub status: CategoryStatus,
    pub group: Option<String>,
    /// Title of the dropdown toggle this item sits under.
    pub parent: Option<String>,
}

impl Category {
    /// `"{parent} / {title}"` (or just the title), followed by `"  ({group})"` when grouped.
    pub fn label(&self) -> String {
        let mut label = match &self.parent {
            Some(parent) => format!("{} / {}", parent, self.title),
            None => self.title.clone(),
        };
        if let Some(group) = &self.group {
            label.push_str(&format!("  ({})", group));
        }
        label
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
