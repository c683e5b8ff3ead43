//! Built-in app catalog and the drawer view over it.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::model::{AppCategory, AppItem, AppKind, UserSettings};

/// The mock apps shown in the drawer.
pub fn builtin_apps() -> Vec<AppItem> {
    [
        ("1", "Messages", AppKind::Social),
        ("2", "Calendar", AppKind::Work),
        ("3", "Camera", AppKind::Utility),
        ("4", "Notes", AppKind::Work),
        ("5", "Settings", AppKind::Utility),
        ("6", "Browser", AppKind::Utility),
        ("7", "Maps", AppKind::Utility),
        ("8", "Music", AppKind::Entertainment),
        ("9", "Email", AppKind::Work),
        ("10", "Photos", AppKind::Utility),
        ("11", "Slack", AppKind::Work),
        ("12", "Twitter", AppKind::Social),
        ("13", "Instagram", AppKind::Social),
        ("14", "LinkedIn", AppKind::Work),
        ("15", "Calculator", AppKind::Utility),
    ]
    .into_iter()
    .map(|(id, name, kind)| AppItem::new(id, name, kind))
    .collect()
}

pub fn find_by_id<'a>(apps: &'a [AppItem], id: &str) -> Option<&'a AppItem> {
    apps.iter().find(|a| a.id == id)
}

/// Case-insensitive exact name match.
pub fn find_by_name<'a>(apps: &'a [AppItem], name: &str) -> Option<&'a AppItem> {
    apps.iter().find(|a| a.name.eq_ignore_ascii_case(name.trim()))
}

/// Apps the drawer shows: filtered by `query` (case-insensitive substring),
/// restricted to Essential apps in intentional mode, sorted by name.
pub fn visible_apps<'a>(
    apps: &'a [AppItem],
    settings: &UserSettings,
    categories: &BTreeMap<String, AppCategory>,
    query: &str,
) -> Vec<&'a AppItem> {
    let needle = query.trim().to_lowercase();
    let mut visible: Vec<&AppItem> = apps
        .iter()
        .filter(|a| a.name.to_lowercase().contains(&needle))
        .filter(|a| {
            !settings.intentional_mode
                || categories.get(&a.id).copied().unwrap_or_default() == AppCategory::Essential
        })
        .collect();
    visible.sort_by(|a, b| compare_names(&a.name, &b.name));
    visible
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
