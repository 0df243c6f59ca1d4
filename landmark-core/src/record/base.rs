//! Key-value records.
use crate::error::LandmarkError;
use std::collections::{hash_map::Iter, HashMap};

/// Represents possible types of values in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, typically a metric.
    Scalar(f32),

    /// A 1-dimensional array, e.g. Q-values of a step.
    Array1(Vec<f32>),
}

/// A container for storing key-value pairs of [`RecordValue`]s.
#[derive(Debug, Default, Clone)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Gets a scalar value from the record.
    pub fn get_scalar(&self, k: &str) -> Result<f32, LandmarkError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(LandmarkError::RecordValueTypeError("Scalar".to_string())),
            None => Err(LandmarkError::RecordKeyError(k.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_scalar_reports_errors() {
        let mut r = Record::from_slice(&[("q", RecordValue::Array1(vec![0.5, 1.5]))]);
        r.insert("opt_steps", RecordValue::Scalar(10.0));

        assert_eq!(r.get_scalar("opt_steps").unwrap(), 10.0);
        assert_eq!(r.get("q"), Some(&RecordValue::Array1(vec![0.5, 1.5])));
        assert!(matches!(
            r.get_scalar("q"),
            Err(LandmarkError::RecordValueTypeError(_))
        ));
        assert!(matches!(
            r.get_scalar("missing"),
            Err(LandmarkError::RecordKeyError(_))
        ));
    }
}
