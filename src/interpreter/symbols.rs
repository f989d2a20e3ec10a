use std::collections::BTreeMap;

use super::RuntimeError;

/// Variable name to integer value. Entries appear on first assignment and
/// reading a name that was never assigned is an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    values: BTreeMap<String, i64>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: i64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Result<i64, RuntimeError> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_creates_then_overwrites() {
        let mut symbols = SymbolTable::new();
        assert!(symbols.is_empty());
        symbols.set("x", 1);
        symbols.set("x", -7);
        assert_eq!(symbols.get("x").expect("x is set"), -7);
        assert_eq!(symbols.len(), 1);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let symbols = SymbolTable::new();
        let error = symbols.get("missing").expect_err("missing is unset");
        assert!(matches!(error, RuntimeError::UndefinedVariable { ref name } if name == "missing"));
        assert!(symbols.is_empty());
    }

    #[test]
    fn iterates_in_name_order() {
        let mut symbols = SymbolTable::new();
        symbols.set("zeta", 3);
        symbols.set("alpha", 1);
        symbols.set("mid", 2);
        let entries = symbols.iter().collect::<Vec<_>>();
        assert_eq!(entries, [("alpha", 1), ("mid", 2), ("zeta", 3)]);
    }
}
