use std::collections::BTreeSet;

use crate::catalog::{Catalog, ClubRecord, Field};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("combination not found")]
    NotFound,
    #[error("no {} selected", .0.label())]
    Incomplete(Field),
}

/// Field values chosen so far in one session, kept in the order they were applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    applied: Vec<(Field, String)>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `field`, replacing any earlier value for it.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self.applied.iter_mut().find(|(f, _)| *f == field) {
            slot.1 = value;
        } else {
            self.applied.push((field, value));
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.applied
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    /// Drops every field that comes after `field` in the cascade.
    pub fn truncate_after(&mut self, field: Field) {
        self.applied.retain(|(f, _)| *f <= field);
    }

    pub fn clear(&mut self) {
        self.applied.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.applied.iter().map(|(f, v)| (*f, v.as_str()))
    }

    pub fn matches(&self, row: &ClubRecord) -> bool {
        self.applied
            .iter()
            .all(|(field, value)| row.value(*field) == Some(value.as_str()))
    }

    /// The next cascade field without a value, if any.
    pub fn next_field(&self) -> Option<Field> {
        Field::ORDER.into_iter().find(|f| self.get(*f).is_none())
    }
}

/// Sorted, distinct, non-missing values of `target` among rows matching `selection`.
pub fn options(catalog: &Catalog, target: Field, selection: &Selection) -> Vec<String> {
    catalog
        .rows()
        .iter()
        .filter(|row| selection.matches(row))
        .filter_map(|row| row.value(target))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// First catalog row whose four cascade fields equal the selection.
pub fn lookup<'a>(
    catalog: &'a Catalog,
    selection: &Selection,
) -> Result<&'a ClubRecord, LookupError> {
    if let Some(missing) = selection.next_field() {
        return Err(LookupError::Incomplete(missing));
    }
    catalog
        .rows()
        .iter()
        .find(|row| selection.matches(row))
        .ok_or(LookupError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_existing_value() {
        let mut sel = Selection::new();
        sel.set(Field::Category, "Cadet A");
        sel.set(Field::Division, "Lliga Nacional");
        sel.set(Field::Category, "Juvenil A");
        assert_eq!(sel.get(Field::Category), Some("Juvenil A"));
        assert_eq!(sel.iter().count(), 2);
    }

    #[test]
    fn truncate_after_keeps_upstream() {
        let mut sel = Selection::new();
        for (field, value) in Field::ORDER.into_iter().zip(["a", "b", "c", "d"]) {
            sel.set(field, value);
        }
        sel.truncate_after(Field::Division);
        assert_eq!(sel.next_field(), Some(Field::Zone));
        assert_eq!(sel.get(Field::Division), Some("b"));
        assert_eq!(sel.get(Field::Club), None);
    }
}
