use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{CatalogError, Result};

/// Plain field-name to value mapping produced by [`Record::to_dict`].
pub type FieldMap = Map<String, Value>;

/// Serialization of a record into a plain mapping.
///
/// `to_map` produces every field of the record. Record variants that need
/// computed fields override `to_map` (usually by calling
/// [`serialize_fields`] and inserting extra keys); `to_dict` then applies
/// the caller's exclusions and inclusions on top of it.
pub trait Record: Serialize {
    fn to_map(&self) -> Result<FieldMap> {
        serialize_fields(self)
    }

    /// Full mapping with every key of `exclude` removed, then every pair of
    /// `include` inserted (overwriting existing keys).
    ///
    /// Fails with [`CatalogError::MissingField`] when an excluded key is not
    /// part of the mapping.
    fn to_dict(&self, exclude: &[&str], include: FieldMap) -> Result<FieldMap> {
        let mut fields = self.to_map()?;
        for key in exclude {
            if fields.remove(*key).is_none() {
                return Err(CatalogError::MissingField(key.to_string()));
            }
        }
        fields.extend(include);
        Ok(fields)
    }
}

/// Serialize any struct into a field mapping.
pub fn serialize_fields<T: Serialize + ?Sized>(record: &T) -> Result<FieldMap> {
    match serde_json::to_value(record)? {
        Value::Object(fields) => Ok(fields),
        other => Err(CatalogError::InvalidArgument(format!(
            "record serialized to a non-object value: {}",
            other
        ))),
    }
}
