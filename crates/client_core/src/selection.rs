use shared::domain::{ElementCatalog, ElementId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<ElementId>,
}

impl SelectionState {
    pub fn selected(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, element: &ElementId) -> bool {
        self.selected.as_ref() == Some(element)
    }

    pub fn toggle(&mut self, element: ElementId) {
        if self.is_selected(&element) {
            self.selected = None;
        } else {
            self.selected = Some(element);
        }
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Clears a selection the catalog no longer advertises. Returns whether
    /// anything was cleared.
    pub fn retain_in(&mut self, catalog: &ElementCatalog) -> bool {
        match &self.selected {
            Some(element) if !catalog.contains(element) => {
                self.selected = None;
                true
            }
            _ => false,
        }
    }
}
