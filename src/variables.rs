//! Simple (scalar) variable storage.

use std::collections::HashMap;

use crate::value::{BasicString, Value, ValueType};

/// Normalized variable identity: up to two uppercase characters plus the
/// value type selected by the sigil. `A` and `A$` are distinct variables;
/// the `%` sigil is accepted and folded into the numeric type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarName {
    /// Normalized name (1-2 chars, uppercase)
    pub name: String,
    /// Value type selected by the trailing sigil
    pub ty: ValueType,
}

impl VarName {
    /// Normalize a raw identifier: alphanumeric characters are folded to
    /// uppercase with everything past the second dropped, then an
    /// optional `$` or `%` sigil selects the type.
    pub fn normalize(raw: &str) -> Self {
        let mut name = String::new();
        let mut ty = ValueType::Number;

        for c in raw.chars() {
            if c.is_ascii_alphanumeric() {
                if name.len() < 2 {
                    name.push(c.to_ascii_uppercase());
                }
            } else {
                if c == '$' {
                    ty = ValueType::Str;
                }
                break;
            }
        }

        Self { name, ty }
    }

    /// Build a name from already-normalized parts
    pub fn new(name: String, ty: ValueType) -> Self {
        Self { name, ty }
    }
}

impl std::fmt::Display for VarName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.ty {
            ValueType::Number => write!(f, "{}", self.name),
            ValueType::Str => write!(f, "{}$", self.name),
        }
    }
}

/// The simple-variable table. Reads of absent variables yield zero or
/// the empty string; writes create the variable.
#[derive(Debug, Default)]
pub struct Variables {
    map: HashMap<VarName, Value>,
}

impl Variables {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a numeric variable (0 when absent)
    pub fn get_number(&self, name: &VarName) -> f64 {
        match self.map.get(name) {
            Some(Value::Number(n)) => *n,
            _ => 0.0,
        }
    }

    /// Write a numeric variable, creating it if needed
    pub fn set_number(&mut self, name: VarName, value: f64) {
        if name.ty == ValueType::Number {
            self.map.insert(name, Value::Number(value));
        }
    }

    /// Read a string variable (empty when absent)
    pub fn get_string(&self, name: &VarName) -> BasicString {
        match self.map.get(name) {
            Some(Value::Str(s)) => s.clone(),
            _ => BasicString::new(),
        }
    }

    /// Write a string variable, creating it if needed
    pub fn set_string(&mut self, name: VarName, value: BasicString) {
        if name.ty == ValueType::Str {
            self.map.insert(name, Value::Str(value));
        }
    }

    /// Look up a variable without creating it
    pub fn get(&self, name: &VarName) -> Option<&Value> {
        self.map.get(name)
    }

    /// Remove every variable
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let n = VarName::normalize("ab");
        assert_eq!(n.name, "AB");
        assert_eq!(n.ty, ValueType::Number);

        let n = VarName::normalize("A1$");
        assert_eq!(n.name, "A1");
        assert_eq!(n.ty, ValueType::Str);
    }

    #[test]
    fn test_normalize_drops_extra_chars() {
        let n = VarName::normalize("COUNT");
        assert_eq!(n.name, "CO");
        assert_eq!(n.ty, ValueType::Number);
    }

    #[test]
    fn test_percent_folds_to_number() {
        let n = VarName::normalize("A%");
        assert_eq!(n.ty, ValueType::Number);
        assert_eq!(n, VarName::normalize("A"));
    }

    #[test]
    fn test_numeric_and_string_coexist() {
        let mut vars = Variables::new();
        vars.set_number(VarName::normalize("A"), 42.0);
        vars.set_string(VarName::normalize("A$"), BasicString::from_text("HI"));

        assert_eq!(vars.get_number(&VarName::normalize("A")), 42.0);
        assert_eq!(vars.get_string(&VarName::normalize("A$")).to_string(), "HI");
    }

    #[test]
    fn test_absent_reads() {
        let vars = Variables::new();
        assert_eq!(vars.get_number(&VarName::normalize("Q")), 0.0);
        assert!(vars.get_string(&VarName::normalize("Q$")).is_empty());
        assert!(vars.get(&VarName::normalize("Q")).is_none());
    }

    #[test]
    fn test_clear() {
        let mut vars = Variables::new();
        vars.set_number(VarName::normalize("X"), 1.0);
        vars.clear();
        assert!(vars.get(&VarName::normalize("X")).is_none());
    }
}
