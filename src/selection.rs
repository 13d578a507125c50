//! Selection store
//!
//! Holds the contacts the user has picked as message recipients. Entries are
//! keyed strictly by [`ContactId`]; the stored copy of a contact is whatever
//! value was toggled in, and survives later searches that no longer return it.

use crate::contact::{Contact, ContactId};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Default, Clone)]
pub struct SelectionStore {
    selected: BTreeMap<ContactId, Contact>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the contact if its id is selected, otherwise add it.
    /// Returns the new membership state.
    pub fn toggle(&mut self, contact: &Contact) -> bool {
        let selected = if self.selected.remove(&contact.id).is_some() {
            false
        } else {
            self.selected.insert(contact.id, contact.clone());
            true
        };
        debug!(target: "selection", "Toggled {} -> {} ({} selected)", contact.id, selected, self.count());
        selected
    }

    pub fn is_selected(&self, id: ContactId) -> bool {
        self.selected.contains_key(&id)
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected contacts ordered by id
    pub fn contacts(&self) -> Vec<Contact> {
        self.selected.values().cloned().collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = ContactId> + '_ {
        self.selected.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_parity() {
        let contact = Contact::new(1, "Ana");
        for toggles in 1..=7 {
            let mut store = SelectionStore::new();
            for _ in 0..toggles {
                store.toggle(&contact);
            }
            assert_eq!(store.is_selected(contact.id), toggles % 2 == 1);
            assert_eq!(store.count(), toggles % 2);
        }
    }

    #[test]
    fn test_identity_not_value_equality() {
        let mut store = SelectionStore::new();
        let original = Contact::new(5, "Pedro").with_phone("111");
        let refreshed = Contact::new(5, "Pedro Ruiz").with_phone("222");

        assert!(store.toggle(&original));
        assert!(store.is_selected(refreshed.id));
        // Same id with different fields deselects
        assert!(!store.toggle(&refreshed));
        assert!(store.is_empty());
    }

    #[test]
    fn test_no_duplicates() {
        let mut store = SelectionStore::new();
        store.toggle(&Contact::new(1, "A"));
        store.toggle(&Contact::new(2, "B"));
        store.toggle(&Contact::new(3, "C"));
        store.toggle(&Contact::new(2, "B"));
        store.toggle(&Contact::new(2, "B again"));

        let ids: Vec<_> = store.ids().collect();
        assert_eq!(ids, vec![ContactId(1), ContactId(2), ContactId(3)]);
        assert_eq!(store.contacts()[1].name, "B again");
    }

    #[test]
    fn test_membership_sum_matches_count() {
        let results: Vec<Contact> = (1..=10).map(|i| Contact::new(i, format!("C{i}"))).collect();
        let mut store = SelectionStore::new();
        for contact in results.iter().filter(|c| c.id.0 % 3 == 0) {
            store.toggle(contact);
        }
        let members = results.iter().filter(|c| store.is_selected(c.id)).count();
        assert_eq!(members, store.count());
    }
}
