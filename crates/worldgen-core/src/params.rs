use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use sprawl_core::Value;

use crate::ValidationError;

/// The parameters of a generator, keyed by name.
pub type Params = BTreeMap<String, Value>;

/// Merges `from` into `into`. Keys present in both maps take the value from `from`.
pub fn merge_params(into: &mut Params, from: &Params) {
    into.extend(from.iter().map(|(k, v)| (k.clone(), v.clone())));
}

/// Reads typed values out of a [`Params`] map.
///
/// Every getter falls back to a default when the key is missing and fails with a
/// [`ValidationError`] when the value has the wrong type or is out of range.
#[derive(Debug, Clone, Copy)]
pub struct ParamReader<'a> {
    params: &'a Params,
}

impl<'a> ParamReader<'a> {
    /// Creates a new [`ParamReader`] over the provided map.
    #[inline]
    pub fn new(params: &'a Params) -> Self {
        Self { params }
    }

    /// Fails if `params` contains a key not listed in `known`.
    pub fn only(&self, known: &[&str]) -> Result<(), ValidationError> {
        match self.params.keys().find(|k| !known.contains(&k.as_str())) {
            Some(key) => Err(ValidationError::new(
                key.as_str(),
                format!("unknown parameter (expected one of: {})", known.join(", ")),
            )),
            None => Ok(()),
        }
    }

    fn type_error(key: &str, expected: &str, found: &Value) -> ValidationError {
        ValidationError::new(
            key,
            format!("expected {expected}, found {}", found.type_name()),
        )
    }

    /// Reads a float within `range`.
    pub fn float(
        &self,
        key: &str,
        default: f32,
        range: RangeInclusive<f32>,
    ) -> Result<f32, ValidationError> {
        let value = match self.params.get(key) {
            None => default,
            Some(v) => v
                .as_f64()
                .ok_or_else(|| Self::type_error(key, "a number", v))? as f32,
        };

        if !value.is_finite() || !range.contains(&value) {
            return Err(ValidationError::new(
                key,
                format!(
                    "{value} is outside of [{}, {}]",
                    range.start(),
                    range.end()
                ),
            ));
        }

        Ok(value)
    }

    /// Reads an integer within `range`.
    pub fn int(
        &self,
        key: &str,
        default: i64,
        range: RangeInclusive<i64>,
    ) -> Result<i64, ValidationError> {
        let value = match self.params.get(key) {
            None => default,
            Some(v) => v
                .as_i64()
                .ok_or_else(|| Self::type_error(key, "an integer", v))?,
        };

        if !range.contains(&value) {
            return Err(ValidationError::new(
                key,
                format!(
                    "{value} is outside of [{}, {}]",
                    range.start(),
                    range.end()
                ),
            ));
        }

        Ok(value)
    }

    /// Reads an unsigned integer within `range`.
    pub fn uint(
        &self,
        key: &str,
        default: u32,
        range: RangeInclusive<u32>,
    ) -> Result<u32, ValidationError> {
        let wide = *range.start() as i64..=*range.end() as i64;
        // The value fits because it lies in a range of `u32`s.
        self.int(key, default as i64, wide).map(|v| v as u32)
    }

    /// Reads a probability, in `[0, 1]`.
    #[inline]
    pub fn probability(&self, key: &str, default: f32) -> Result<f32, ValidationError> {
        self.float(key, default, 0.0..=1.0)
    }

    /// Reads a boolean.
    pub fn bool(&self, key: &str, default: bool) -> Result<bool, ValidationError> {
        match self.params.get(key) {
            None => Ok(default),
            Some(v) => v
                .as_bool()
                .ok_or_else(|| Self::type_error(key, "a boolean", v)),
        }
    }

    /// Reads a non-empty list of strings.
    pub fn strings(&self, key: &str, default: &[&str]) -> Result<Vec<String>, ValidationError> {
        let Some(v) = self.params.get(key) else {
            return Ok(default.iter().map(|&s| s.to_owned()).collect());
        };

        let list = v
            .as_list()
            .ok_or_else(|| Self::type_error(key, "a list", v))?;
        if list.is_empty() {
            return Err(ValidationError::new(key, "the list must not be empty"));
        }

        list.iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| Self::type_error(key, "a list of strings", item))
            })
            .collect()
    }
}
