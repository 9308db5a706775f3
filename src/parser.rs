use std::sync::LazyLock;

use log::debug;
use scraper::{ElementRef, Html, Selector};

use crate::models::{Category, CategoryStatus};

/// Groups whose heading contains this are skipped, their items are repeated elsewhere on the page.
const POPULAR_GROUP_KEYWORD: &str = "suosittuja";
/// Title of the "all" shortcut inside every dropdown menu.
const SELECT_ALL_TITLE: &str = "Kaikki";
const DISABLED_CLASS: &str = "disabled-link";
const GROUP_BLOCK_CLASS: &str = "col-12";

static CONTAINER: LazyLock<Selector> = LazyLock::new(|| selector("div[ngbdropdown].col-lg-4"));
static SIMPLE_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"a[queryparamshandling="preserve"]:not([ngbdropdownitem])"#));
static TOGGLE: LazyLock<Selector> = LazyLock::new(|| selector("a[ngbdropdowntoggle]"));
static DROPDOWN_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("a[ngbdropdownitem]"));
static HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h4"));
static LABEL: LazyLock<Selector> = LazyLock::new(|| selector("span"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid CSS")
}

/// Extracts every category from a listing page, in document order.
///
/// Unknown or broken markup never fails; it just contributes no categories.
pub fn extract(html: &str) -> Vec<Category> {
    let doc = Html::parse_document(html);
    let mut categories = Vec::new();

    for container in doc.select(&CONTAINER) {
        let group = group_heading(container);

        if group
            .as_deref()
            .is_some_and(|g| g.to_lowercase().contains(POPULAR_GROUP_KEYWORD))
        {
            continue;
        }

        if let Some(link) = container.select(&SIMPLE_LINK).next() {
            if link.value().attr("ngbdropdowntoggle").is_none() {
                categories.extend(parse_link(link, group.as_deref(), None));
                continue;
            }
        }

        let Some(toggle) = container.select(&TOGGLE).next() else {
            continue;
        };

        let parent = parse_link(toggle, group.as_deref(), None);
        let parent_title = parent.as_ref().map(|p| p.title.clone());
        categories.extend(parent);

        for item in container.select(&DROPDOWN_ITEM) {
            if item.value().attr("title").map(str::trim) == Some(SELECT_ALL_TITLE) {
                continue;
            }
            categories.extend(parse_link(item, group.as_deref(), parent_title.as_deref()));
        }
    }

    let active = categories.iter().filter(|c| c.is_active()).count();
    debug!(
        "Parsed {} categories ({} active, {} inactive)",
        categories.len(),
        active,
        categories.len() - active
    );
    categories
}

fn parse_link(link: ElementRef, group: Option<&str>, parent: Option<&str>) -> Option<Category> {
    let name = link
        .select(&LABEL)
        .next()
        .map(element_text)
        .unwrap_or_default();

    if name.is_empty() {
        debug!(
            "Skipping link without label text (href={:?})",
            link.value().attr("href").unwrap_or_default()
        );
        return None;
    }

    let title = link
        .value()
        .attr("title")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .unwrap_or_else(|| name.clone());

    Some(Category {
        name,
        title,
        href: link.value().attr("href").unwrap_or_default().to_string(),
        status: link_status(link),
        group: group.map(String::from),
        parent: parent.map(String::from),
    })
}

/// Only the marker class counts; `disabled`, `tabindex` and the text are not reliable.
fn link_status(link: ElementRef) -> CategoryStatus {
    if link.value().classes().any(|c| c == DISABLED_CLASS) {
        CategoryStatus::Inactive
    } else {
        CategoryStatus::Active
    }
}

fn group_heading(container: ElementRef) -> Option<String> {
    let block = container
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "div" && el.value().classes().any(|c| c == GROUP_BLOCK_CLASS))?;

    block
        .select(&HEADING)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Text content with runs of whitespace collapsed and the ends trimmed.
///
/// Text nodes are joined as-is first, so a word split by inline markup stays one word.
fn element_text(el: ElementRef) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
