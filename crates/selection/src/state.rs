use std::collections::BTreeMap;

use symbology::Category;

use crate::category_set::CategorySet;

/// Full view-state snapshot: enabled ownership categories plus per-layer
/// visibility, keyed by thematic layer name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    categories: CategorySet,
    layers: BTreeMap<String, bool>,
}

impl Selection {
    /// Everything enabled and visible.
    pub fn new<I, S>(layer_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: CategorySet::all(),
            layers: layer_names.into_iter().map(|n| (n.into(), true)).collect(),
        }
    }

    pub fn categories(&self) -> CategorySet {
        self.categories
    }

    pub fn is_category_enabled(&self, category: Category) -> bool {
        self.categories.contains(category)
    }

    pub fn is_all_categories_enabled(&self) -> bool {
        self.categories.len() == Category::COUNT
    }

    /// Layers never toggled read as visible.
    pub fn is_layer_visible(&self, name: &str) -> bool {
        self.layers.get(name).copied().unwrap_or(true)
    }

    pub fn layers(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.layers.iter().map(|(name, visible)| (name.as_str(), *visible))
    }
}

pub type Observer = Box<dyn FnMut(&Selection)>;

/// Owner of the legend's selection.
///
/// Mutated only through the toggle operations. Each call that changes the
/// selection hands the complete new snapshot to every observer; calls that
/// leave it unchanged notify nobody.
pub struct SelectionState {
    snapshot: Selection,
    observers: Vec<Observer>,
}

impl SelectionState {
    pub fn new<I, S>(layer_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            snapshot: Selection::new(layer_names),
            observers: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> &Selection {
        &self.snapshot
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&Selection) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn is_all_categories_enabled(&self) -> bool {
        self.snapshot.is_all_categories_enabled()
    }

    /// Returns `true` if the selection changed.
    pub fn toggle_category(&mut self, category: Category, enabled: bool) -> bool {
        let changed = self.snapshot.categories.set(category, enabled);
        if changed {
            self.notify();
        }
        changed
    }

    /// Returns `true` if the selection changed.
    pub fn toggle_layer_visibility(&mut self, name: &str, visible: bool) -> bool {
        if self.snapshot.is_layer_visible(name) == visible {
            return false;
        }
        self.snapshot.layers.insert(name.to_string(), visible);
        self.notify();
        true
    }

    fn notify(&mut self) {
        for observer in self.observers.iter_mut() {
            observer(&self.snapshot);
        }
    }
}

impl std::fmt::Debug for SelectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionState")
            .field("snapshot", &self.snapshot)
            .field("observers", &self.observers.len())
            .finish()
    }
}
