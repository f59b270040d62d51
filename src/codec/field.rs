/// Values of one named field array.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldArray {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl FieldArray {
    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    /// Returns `true` if the array has no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Named arrays attached to a surface, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldData {
    arrays: Vec<(String, FieldArray)>,
}

impl FieldData {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of arrays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    /// Returns `true` if no array is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Iterates over `(name, array)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldArray)> {
        self.arrays.iter().map(|(n, a)| (n.as_str(), a))
    }

    /// Returns the array called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldArray> {
        self.arrays.iter().find(|(n, _)| n == name).map(|(_, a)| a)
    }

    /// Returns the named array if it holds numbers.
    #[must_use]
    pub fn numeric(&self, name: &str) -> Option<&[f64]> {
        match self.get(name)? {
            FieldArray::Numeric(v) => Some(v),
            FieldArray::Text(_) => None,
        }
    }

    /// Returns the named array if it holds strings.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&[String]> {
        match self.get(name)? {
            FieldArray::Text(v) => Some(v),
            FieldArray::Numeric(_) => None,
        }
    }

    /// Adds an array, replacing any array of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, array: FieldArray) {
        let name = name.into();
        if let Some(slot) = self.arrays.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = array;
        } else {
            self.arrays.push((name, array));
        }
    }

    /// Removes and returns the named array.
    pub fn remove(&mut self, name: &str) -> Option<FieldArray> {
        let pos = self.arrays.iter().position(|(n, _)| n == name)?;
        Some(self.arrays.remove(pos).1)
    }
}
