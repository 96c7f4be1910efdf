//! Inventory view model.
//!
//! Turns the fetched collection plus the current sort/filter choice into the
//! rows to display. `project` is a pure function of those two inputs.

use std::str::FromStr;

use serde::Serialize;

use crate::model::InventoryItem;

/// Rows rendered before the summary row takes over
pub const DISPLAY_CAP: usize = 100;

/// Sortable column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Ean,
    Author,
    Title,
    ReleaseDate,
    Exists,
}

impl SortKey {
    pub fn all() -> &'static [SortKey] {
        &[
            SortKey::Ean,
            SortKey::Author,
            SortKey::Title,
            SortKey::ReleaseDate,
            SortKey::Exists,
        ]
    }

    /// Column header
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Ean => "EAN",
            SortKey::Author => "Author",
            SortKey::Title => "Title",
            SortKey::ReleaseDate => "Date",
            SortKey::Exists => "Status",
        }
    }

    /// Field name as the backend spells it
    pub fn field(&self) -> &'static str {
        match self {
            SortKey::Ean => "ean",
            SortKey::Author => "author",
            SortKey::Title => "title",
            SortKey::ReleaseDate => "release_date",
            SortKey::Exists => "exists",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        SortKey::all()
            .iter()
            .copied()
            .find(|key| key.field() == s || key.label().to_lowercase() == s)
            .ok_or_else(|| {
                let names: Vec<_> = SortKey::all().iter().map(|k| k.field()).collect();
                format!("unknown sort key '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

/// Current sort and filter choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub sort_key: SortKey,
    pub direction: SortDirection,
    pub filter: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            sort_key: SortKey::Author,
            direction: SortDirection::Asc,
            filter: String::new(),
        }
    }
}

impl ViewState {
    /// Header click: same key flips direction, a new key starts ascending
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.direction = self.direction.flipped();
        } else {
            self.sort_key = key;
            self.direction = SortDirection::Asc;
        }
    }
}

/// Normalized sort value: booleans become numbers, text is lower-cased,
/// missing text is empty
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Number(u8),
    Text(String),
}

fn sort_value(item: &InventoryItem, key: SortKey) -> SortValue {
    let text = |value: Option<&str>| SortValue::Text(value.unwrap_or_default().to_lowercase());
    match key {
        SortKey::Ean => text(Some(item.ean.as_str())),
        SortKey::Author => text(item.author.as_deref()),
        SortKey::Title => text(item.title.as_deref()),
        SortKey::ReleaseDate => text(item.release_date.as_deref()),
        SortKey::Exists => SortValue::Number(u8::from(item.exists)),
    }
}

/// Case-insensitive match of `filter` against title, author or EAN
pub fn matches_filter(item: &InventoryItem, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    let needle = filter.to_lowercase();
    let contains = |value: Option<&str>| {
        value.is_some_and(|v| v.to_lowercase().contains(&needle))
    };
    contains(item.title.as_deref()) || contains(item.author.as_deref()) || contains(Some(item.ean.as_str()))
}

/// Filter then stably sort, without the display cap
pub fn sorted_filtered<'a>(items: &'a [InventoryItem], view: &ViewState) -> Vec<&'a InventoryItem> {
    let mut keyed: Vec<(SortValue, &InventoryItem)> = items
        .iter()
        .filter(|item| matches_filter(item, &view.filter))
        .map(|item| (sort_value(item, view.sort_key), item))
        .collect();

    // slice::sort_by is stable; reversing the comparison keeps ties in input order
    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = a.cmp(b);
        match view.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    keyed.into_iter().map(|(_, item)| item).collect()
}

/// Rows to display for one render
#[derive(Debug, Clone, PartialEq)]
pub struct Projection<'a> {
    /// At most `DISPLAY_CAP` rows, in display order
    pub rows: Vec<&'a InventoryItem>,
    /// Items that passed the filter
    pub filtered_count: usize,
    /// Items in the fetched collection
    pub total_count: usize,
}

impl Projection<'_> {
    /// Filtered items not rendered because of the cap
    pub fn overflow(&self) -> usize {
        self.filtered_count - self.rows.len()
    }

    /// Text of the summary row, present only when rows were held back
    pub fn summary(&self) -> Option<String> {
        let remaining = self.overflow();
        (remaining > 0).then(|| {
            format!(
                "Showing first {} of {} results ({} more). Use the search filter to find specific items.",
                self.rows.len(),
                self.filtered_count,
                remaining
            )
        })
    }
}

/// Project the collection for display
pub fn project<'a>(items: &'a [InventoryItem], view: &ViewState) -> Projection<'a> {
    let mut rows = sorted_filtered(items, view);
    let filtered_count = rows.len();
    rows.truncate(DISPLAY_CAP);
    Projection {
        rows,
        filtered_count,
        total_count: items.len(),
    }
}

/// Fetch state of the inventory for the current view activation
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InventoryLoad {
    #[default]
    Loading,
    Loaded(Vec<InventoryItem>),
    Failed(String),
}

impl InventoryLoad {
    pub fn is_loading(&self) -> bool {
        matches!(self, InventoryLoad::Loading)
    }

    /// The collection, empty while loading or after a failed fetch
    pub fn items(&self) -> &[InventoryItem] {
        match self {
            InventoryLoad::Loaded(items) => items,
            _ => &[],
        }
    }

    /// Placeholder text when there is nothing to show
    pub fn empty_message(&self, view: &ViewState) -> Option<String> {
        match self {
            InventoryLoad::Loading => Some("Loading inventory...".to_string()),
            InventoryLoad::Failed(e) => Some(format!("Could not load inventory: {}", e)),
            InventoryLoad::Loaded(items) if items.is_empty() => {
                Some("The inventory is empty.".to_string())
            }
            InventoryLoad::Loaded(items) => {
                let any = items.iter().any(|item| matches_filter(item, &view.filter));
                (!any).then(|| format!("No items match \"{}\".", view.filter))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(ean: &str, author: Option<&str>, title: Option<&str>, exists: bool) -> InventoryItem {
        InventoryItem {
            ean: ean.to_string(),
            title: title.map(str::to_string),
            author: author.map(str::to_string),
            release_date: None,
            exists,
            has_cover: false,
            cover_path: None,
        }
    }

    fn eans(rows: &[&InventoryItem]) -> Vec<String> {
        rows.iter().map(|i| i.ean.clone()).collect()
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let items = vec![
            item("A", Some("Same"), None, true),
            item("B", Some("same"), None, true),
        ];
        let view = ViewState::default();
        assert_eq!(eans(&project(&items, &view).rows), vec!["A", "B"]);

        let view = ViewState {
            direction: SortDirection::Desc,
            ..ViewState::default()
        };
        assert_eq!(eans(&project(&items, &view).rows), vec!["A", "B"]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let items = vec![
            item("3", Some("Cole"), None, false),
            item("1", Some("adams"), None, true),
            item("2", Some("Cole"), None, true),
            item("4", None, None, true),
        ];
        let view = ViewState::default();
        let once: Vec<InventoryItem> = sorted_filtered(&items, &view).into_iter().cloned().collect();
        let twice: Vec<InventoryItem> = sorted_filtered(&once, &view).into_iter().cloned().collect();
        assert_eq!(once, twice);
        // Missing author sorts as empty text, ahead of everything
        assert_eq!(once.iter().map(|i| i.ean.as_str()).collect::<Vec<_>>(), vec!["4", "1", "3", "2"]);
    }

    #[test]
    fn test_boolean_sort() {
        let items = vec![
            item("in", None, None, true),
            item("out", None, None, false),
        ];
        let mut view = ViewState::default();
        view.toggle_sort(SortKey::Exists);
        assert_eq!(eans(&project(&items, &view).rows), vec!["out", "in"]);
        view.toggle_sort(SortKey::Exists);
        assert_eq!(eans(&project(&items, &view).rows), vec!["in", "out"]);
    }

    #[test]
    fn test_toggle_sort() {
        let mut view = ViewState::default();
        assert_eq!(view.sort_key, SortKey::Author);

        view.toggle_sort(SortKey::Author);
        assert_eq!(view.direction, SortDirection::Desc);
        view.toggle_sort(SortKey::Author);
        assert_eq!(view.direction, SortDirection::Asc);

        view.toggle_sort(SortKey::Author);
        view.toggle_sort(SortKey::Title);
        assert_eq!(view.sort_key, SortKey::Title);
        assert_eq!(view.direction, SortDirection::Asc);
    }

    #[test]
    fn test_filter_matches_author_case_insensitively() {
        let items = vec![
            item("111", Some("John Smith"), Some("Dune"), true),
            item("222", Some("Jane Doe"), Some("Emma"), true),
        ];
        let view = ViewState {
            filter: "smith".to_string(),
            ..ViewState::default()
        };
        let projection = project(&items, &view);
        assert_eq!(eans(&projection.rows), vec!["111"]);
        assert_eq!(projection.filtered_count, 1);
        assert_eq!(projection.total_count, 2);
    }

    #[test]
    fn test_filter_matches_title_and_ean() {
        let items = vec![
            item("978300", None, Some("Der Process"), true),
            item("123", None, None, true),
        ];
        assert!(matches_filter(&items[0], "PROCESS"));
        assert!(matches_filter(&items[0], "9783"));
        assert!(!matches_filter(&items[1], "process"));
        assert!(matches_filter(&items[1], ""));
    }

    #[test]
    fn test_filter_without_matches_is_empty() {
        let items = vec![item("1", Some("Smith"), Some("Dune"), true)];
        let view = ViewState {
            filter: "zz".to_string(),
            ..ViewState::default()
        };
        let projection = project(&items, &view);
        assert!(projection.rows.is_empty());
        assert_eq!(projection.filtered_count, 0);
        assert_eq!(projection.summary(), None);

        let load = InventoryLoad::Loaded(items.clone());
        assert_eq!(load.empty_message(&view).unwrap(), "No items match \"zz\".");
    }

    #[test]
    fn test_cap_reports_remaining() {
        let items: Vec<_> = (0..150)
            .map(|i| item(&format!("{:03}", i), Some("Author"), None, true))
            .collect();
        let projection = project(&items, &ViewState::default());
        assert_eq!(projection.rows.len(), DISPLAY_CAP);
        assert_eq!(projection.filtered_count, 150);
        assert_eq!(projection.overflow(), 50);

        let summary = projection.summary().unwrap();
        assert!(summary.contains("of 150 results"));
        assert!(summary.contains("50 more"));
        // Equal authors keep fetch order across the cap
        assert_eq!(projection.rows[99].ean, "099");
    }

    #[test]
    fn test_loading_and_empty_are_distinct() {
        let view = ViewState::default();
        assert!(InventoryLoad::Loading.is_loading());
        assert_eq!(
            InventoryLoad::Loading.empty_message(&view).unwrap(),
            "Loading inventory..."
        );
        assert_eq!(
            InventoryLoad::Loaded(Vec::new()).empty_message(&view).unwrap(),
            "The inventory is empty."
        );
        assert!(
            InventoryLoad::Loaded(vec![item("1", None, None, true)])
                .empty_message(&view)
                .is_none()
        );
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("release_date".parse::<SortKey>(), Ok(SortKey::ReleaseDate));
        assert_eq!("Status".parse::<SortKey>(), Ok(SortKey::Exists));
        assert!("pages".parse::<SortKey>().is_err());
    }
}
