// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Value shapes for packed storage
//!
//! Dense stores keep every entity's data as a fixed run of numeric scalars.
//! This module describes that run ([`Layout`]), the dynamic values callers can
//! hand to a store ([`Record`], [`FieldValue`]) and the [`Packed`] trait that
//! converts between the two.

use crate::error::{EcsError, EcsResult};

/// Shape of the per-entity scalar run in a dense store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// One scalar per named field, in declaration order
    Fields(Vec<String>),
    /// A run of unnamed cells, e.g. a flattened `width * height` grid
    Cells(usize),
}

impl Layout {
    /// Layout with the given ordered field names
    ///
    /// An empty field list describes a single unnamed scalar.
    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            Layout::Cells(1)
        } else {
            Layout::Fields(names)
        }
    }

    /// Layout of `count` unnamed cells
    pub fn cells(count: usize) -> Self {
        Layout::Cells(count)
    }

    /// Layout of a flattened grid, cell `(x, y)` at `x + y * width`
    pub fn grid(width: usize, height: usize) -> Self {
        Layout::Cells(width * height)
    }

    /// Single unnamed scalar
    pub fn scalar() -> Self {
        Layout::Cells(1)
    }

    /// Number of scalars per entity
    pub fn dimensionality(&self) -> usize {
        match self {
            Layout::Fields(names) => names.len(),
            Layout::Cells(count) => *count,
        }
    }

    /// Name of the scalar at `index`, if the layout names its fields
    pub fn field_name(&self, index: usize) -> Option<&str> {
        match self {
            Layout::Fields(names) => names.get(index).map(String::as_str),
            Layout::Cells(_) => None,
        }
    }
}

/// A single field of a dynamic [`Record`]
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Numeric scalar
    Number(f64),
    /// Boolean, stored as 0 or 1
    Bool(bool),
    /// Single character, stored as its code point
    Char(char),
    /// Nested record (cannot be packed)
    Record(Record),
    /// Nested list (cannot be packed inside a record)
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Coerce a scalar to a number; `None` for nested values
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            FieldValue::Char(c) => Some(*c as u32 as f64),
            FieldValue::Record(_) | FieldValue::List(_) => None,
        }
    }

    fn scalar(&self, field: &str) -> EcsResult<f64> {
        self.as_number().ok_or_else(|| EcsError::UnsupportedShape {
            field: field.to_string(),
        })
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<u16> for FieldValue {
    fn from(value: u16) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<char> for FieldValue {
    fn from(value: char) -> Self {
        FieldValue::Char(value)
    }
}

impl From<Record> for FieldValue {
    fn from(value: Record) -> Self {
        FieldValue::Record(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(value: Vec<FieldValue>) -> Self {
        FieldValue::List(value)
    }
}

/// Ordered set of named fields with caller-defined shape
///
/// # Example
///
/// ```
/// use tile_ecs::ecs::Record;
///
/// let record = Record::new().with("x", 10.0).with("y", 0.0);
/// assert_eq!(record.number("x"), Some(10.0));
/// assert_eq!(record.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Record { fields: Vec::new() }
    }

    /// Builder form of [`Record::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a field, keeping the original position on replace
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Look up a field and coerce it to a number
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_number)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }
}

/// Conversion between a value and a dense store's scalar run
///
/// `pack` appends scalars to `out` and must not assume `out` is empty.
/// Length validation against the store dimensionality happens in the store,
/// so implementations only reject values they cannot flatten at all.
pub trait Packed: Sized {
    /// Flatten `self` into scalars following `layout` where possible
    fn pack(&self, layout: &Layout, out: &mut Vec<f64>) -> EcsResult<()>;

    /// Rebuild a value from a slot of `layout.dimensionality()` scalars
    fn unpack(layout: &Layout, values: &[f64]) -> Self;
}

impl Packed for Record {
    fn pack(&self, layout: &Layout, out: &mut Vec<f64>) -> EcsResult<()> {
        match layout {
            // Same field count: match by name so insertion order does not matter
            Layout::Fields(names) if names.len() == self.fields.len() => {
                for name in names {
                    let value = self.get(name).ok_or_else(|| EcsError::MissingField {
                        field: name.clone(),
                    })?;
                    out.push(value.scalar(name)?);
                }
            }
            _ => {
                for (name, value) in &self.fields {
                    out.push(value.scalar(name)?);
                }
            }
        }
        Ok(())
    }

    fn unpack(layout: &Layout, values: &[f64]) -> Self {
        let mut record = Record::new();
        for (index, value) in values.iter().enumerate() {
            match layout.field_name(index) {
                Some(name) => record.insert(name, *value),
                None => record.insert(index.to_string(), *value),
            }
        }
        record
    }
}

impl Packed for Vec<FieldValue> {
    fn pack(&self, _layout: &Layout, out: &mut Vec<f64>) -> EcsResult<()> {
        for (index, value) in self.iter().enumerate() {
            out.push(value.scalar(&index.to_string())?);
        }
        Ok(())
    }

    fn unpack(_layout: &Layout, values: &[f64]) -> Self {
        values.iter().map(|v| FieldValue::Number(*v)).collect()
    }
}

impl Packed for Vec<f64> {
    fn pack(&self, _layout: &Layout, out: &mut Vec<f64>) -> EcsResult<()> {
        out.extend_from_slice(self);
        Ok(())
    }

    fn unpack(_layout: &Layout, values: &[f64]) -> Self {
        values.to_vec()
    }
}

impl<const N: usize> Packed for [f64; N] {
    fn pack(&self, _layout: &Layout, out: &mut Vec<f64>) -> EcsResult<()> {
        out.extend_from_slice(self);
        Ok(())
    }

    fn unpack(_layout: &Layout, values: &[f64]) -> Self {
        let mut array = [0.0; N];
        for (slot, value) in array.iter_mut().zip(values) {
            *slot = *value;
        }
        array
    }
}

impl Packed for f64 {
    fn pack(&self, _layout: &Layout, out: &mut Vec<f64>) -> EcsResult<()> {
        out.push(*self);
        Ok(())
    }

    fn unpack(_layout: &Layout, values: &[f64]) -> Self {
        values.first().copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy() -> Layout {
        Layout::fields(["x", "y"])
    }

    #[test]
    fn test_layout_dimensionality() {
        assert_eq!(xy().dimensionality(), 2);
        assert_eq!(Layout::grid(4, 3).dimensionality(), 12);
        assert_eq!(Layout::fields(Vec::<String>::new()), Layout::scalar());
        assert_eq!(xy().field_name(1), Some("y"));
        assert_eq!(Layout::cells(3).field_name(0), None);
    }

    #[test]
    fn test_record_packs_by_layout_name() {
        let record = Record::new().with("y", 2.0).with("x", 1.0);
        let mut out = Vec::new();
        record.pack(&xy(), &mut out).unwrap();
        assert_eq!(out, vec![1.0, 2.0]);
    }

    #[test]
    fn test_record_coerces_scalars() {
        let record = Record::new().with("alive", true).with("glyph", 'A');
        let mut out = Vec::new();
        record.pack(&Layout::cells(2), &mut out).unwrap();
        assert_eq!(out, vec![1.0, 65.0]);
    }

    #[test]
    fn test_record_rejects_nested() {
        let inner = Record::new().with("a", 1.0);
        let record = Record::new().with("x", 1.0).with("y", inner);
        let mut out = Vec::new();
        let err = record.pack(&xy(), &mut out).unwrap_err();
        assert_eq!(err, EcsError::UnsupportedShape { field: "y".to_string() });
    }

    #[test]
    fn test_record_missing_field() {
        let record = Record::new().with("x", 1.0).with("z", 2.0);
        let mut out = Vec::new();
        let err = record.pack(&xy(), &mut out).unwrap_err();
        assert_eq!(err, EcsError::MissingField { field: "y".to_string() });
    }

    #[test]
    fn test_record_insert_replaces_in_place() {
        let mut record = Record::new().with("x", 1.0).with("y", 2.0);
        record.insert("x", 5.0);
        let names: Vec<&str> = record.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(record.number("x"), Some(5.0));
    }

    #[test]
    fn test_record_unpack_uses_layout_names() {
        let record = Record::unpack(&xy(), &[3.0, 4.0]);
        assert_eq!(record, Record::new().with("x", 3.0).with("y", 4.0));

        let cells = Record::unpack(&Layout::cells(2), &[1.0, 2.0]);
        assert_eq!(cells.number("1"), Some(2.0));
    }

    #[test]
    fn test_list_rejects_nested_list() {
        let list = vec![FieldValue::Number(1.0), FieldValue::List(vec![])];
        let mut out = Vec::new();
        let err = list.pack(&Layout::cells(2), &mut out).unwrap_err();
        assert_eq!(err, EcsError::UnsupportedShape { field: "1".to_string() });
    }

    #[test]
    fn test_array_unpack_pads() {
        let arr: [f64; 3] = Packed::unpack(&Layout::cells(2), &[1.0, 2.0]);
        assert_eq!(arr, [1.0, 2.0, 0.0]);
    }
}
