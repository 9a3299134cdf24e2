use crate::highlight::HighlightMode;
use crate::records::{Collection, CollectionId};

/// One button of the expanded collection list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionEntry {
    pub collection: Option<CollectionId>,
    pub label: String,
}

/// Toggle plus list for picking which saved artworks light up the map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionControls {
    expanded: bool,
}

impl SelectionControls {
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn button_label(&self) -> &'static str {
        if self.expanded {
            "Show All Galleries"
        } else {
            "Map by Collection"
        }
    }

    /// "All Saved Artworks" first, then the user's collections in order.
    /// Whether they are shown depends on [`Self::is_expanded`].
    pub fn entries(&self, collections: &[Collection]) -> Vec<SelectionEntry> {
        std::iter::once(SelectionEntry {
            collection: None,
            label: "All Saved Artworks".to_string(),
        })
        .chain(collections.iter().map(|c| SelectionEntry {
            collection: Some(c.id),
            label: c.name.clone(),
        }))
        .collect()
    }

    pub fn choose(&self, collection: Option<CollectionId>) -> HighlightMode {
        match collection {
            None => HighlightMode::All,
            Some(id) => HighlightMode::Collection(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_collapsed() {
        let sc = SelectionControls::default();
        assert!(!sc.is_expanded());
        assert_eq!(sc.button_label(), "Map by Collection");
    }

    #[test]
    fn expanded_controls_list_all_then_collections() {
        let mut sc = SelectionControls::default();
        sc.toggle();
        assert_eq!(sc.button_label(), "Show All Galleries");
        let entries = sc.entries(&[
            Collection { id: 4, name: "Armor".into() },
            Collection { id: 9, name: "Egypt".into() },
        ]);
        let labels: Vec<_> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["All Saved Artworks", "Armor", "Egypt"]);
        assert_eq!(sc.choose(entries[2].collection), HighlightMode::Collection(9));
        assert_eq!(sc.choose(entries[0].collection), HighlightMode::All);
        sc.toggle();
        assert!(!sc.is_expanded());
    }
}
