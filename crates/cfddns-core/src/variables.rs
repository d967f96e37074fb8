//! Variable table
//!
//! Holds the `key?` bindings made so far in a run. Keys are unique: a second
//! declaration of the same key is refused and the first binding stays.

use crate::bounded::BoundedString;

/// A key bound to the value fetched from its URL this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub key: BoundedString,
    pub value: BoundedString,
    /// Whether `value` differs from the value written by the previous run
    pub changed: bool,
}

impl Variable {
    /// Bind `value` to `key`, comparing against the last known value
    ///
    /// A missing last value always counts as changed.
    pub fn new(key: &str, value: BoundedString, last_value: Option<&str>) -> Self {
        let changed = last_value.is_none_or(|last| value != last);
        Self {
            key: BoundedString::from(key),
            value,
            changed,
        }
    }
}

/// Insertion-ordered table of variables with unique keys
#[derive(Debug, Default)]
pub struct VariableTable {
    vars: Vec<Variable>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a variable by key, most recently bound first
    pub fn get(&self, key: &str) -> Option<&Variable> {
        self.vars.iter().rev().find(|v| v.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Bind a variable
    ///
    /// Returns `false`, leaving the table untouched, if the key is taken.
    pub fn bind(&mut self, var: Variable) -> bool {
        if self.contains(var.key.as_str()) {
            return false;
        }
        self.vars.push(var);
        true
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.vars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(key: &str, value: &str, last: Option<&str>) -> Variable {
        Variable::new(key, BoundedString::from(value), last)
    }

    #[test]
    fn changed_flag_follows_last_value() {
        assert!(var("ip", "1.2.3.4", None).changed);
        assert!(var("ip", "1.2.3.4", Some("1.2.3.5")).changed);
        assert!(!var("ip", "1.2.3.4", Some("1.2.3.4")).changed);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut table = VariableTable::new();
        assert!(table.bind(var("A", "a", None)));
        assert!(!table.bind(var("A", "b", None)));

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("A").unwrap().value, "a");
    }

    #[test]
    fn lookup_misses_unknown_keys() {
        let mut table = VariableTable::new();
        table.bind(var("v4", "1.2.3.4", None));
        table.bind(var("v6", "::1", None));

        assert!(table.get("v5").is_none());
        assert_eq!(table.get("v6").unwrap().value, "::1");
        assert_eq!(table.iter().count(), 2);
    }
}
