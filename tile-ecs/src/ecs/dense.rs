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
//! Dense (sparse-set) component storage
//!
//! A dense store packs every entity's scalars into one contiguous numeric
//! buffer. Two mappings tie the buffer to entities:
//!
//! ```text
//! sparse_to_dense: Entity -> slot          (hashed)
//! dense_to_sparse: [e_0, e_1, ..., e_n-1]  (slot order)
//! buffer:          [e_0 scalars | e_1 scalars | ... ]
//! ```
//!
//! The occupied prefix `[0, len)` never has gaps. Additions append at `len`;
//! removals move the last slot into the hole, so iteration is O(len) and
//! removal is O(dimensionality).
//!
//! The untyped core lives in [`DenseSet`], which systems can reach through
//! the erased store contract without knowing the value type. [`DenseStore`]
//! layers typed `add`/`get` on top via [`Packed`].

use crate::ecs::component::{AnyStorage, Component, ComponentStorage};
use crate::ecs::value::{Layout, Packed};
use crate::ecs::Entity;
use crate::error::{EcsError, EcsResult};
use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;

/// Numeric element type backing a dense buffer
///
/// Integer kinds quantize on write: values are rounded and saturated to the
/// representable range (NaN becomes 0). A 16-bit store therefore resolves
/// normalized quantities to 1/65536.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Unsigned 8-bit
    U8,
    /// Unsigned 16-bit
    U16,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
}

impl ElementKind {
    /// Select the element kind for a byte width of 1, 2, 4 or 8
    pub fn from_bytes(bytes_per_element: usize) -> EcsResult<Self> {
        match bytes_per_element {
            1 => Ok(ElementKind::U8),
            2 => Ok(ElementKind::U16),
            4 => Ok(ElementKind::F32),
            8 => Ok(ElementKind::F64),
            other => Err(EcsError::InvalidElementWidth(other)),
        }
    }

    /// Width of one element in bytes
    pub fn bytes(&self) -> usize {
        match self {
            ElementKind::U8 => 1,
            ElementKind::U16 => 2,
            ElementKind::F32 => 4,
            ElementKind::F64 => 8,
        }
    }

    /// Whether writes are rounded to integers
    pub fn is_integer(&self) -> bool {
        matches!(self, ElementKind::U8 | ElementKind::U16)
    }

    /// Value actually stored when `value` is written
    pub fn quantize(&self, value: f64) -> f64 {
        match self {
            ElementKind::U8 => <u8 as Element>::from_f64(value).to_f64(),
            ElementKind::U16 => <u16 as Element>::from_f64(value).to_f64(),
            ElementKind::F32 => <f32 as Element>::from_f64(value).to_f64(),
            ElementKind::F64 => value,
        }
    }
}

trait Element: Copy + Default {
    fn from_f64(value: f64) -> Self;
    fn to_f64(self) -> f64;
}

impl Element for u8 {
    fn from_f64(value: f64) -> Self {
        // `as` saturates and maps NaN to 0
        value.round() as u8
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Element for u16 {
    fn from_f64(value: f64) -> Self {
        value.round() as u16
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Element for f32 {
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Element for f64 {
    fn from_f64(value: f64) -> Self {
        value
    }

    fn to_f64(self) -> f64 {
        self
    }
}

fn store_quantized<E: Element>(slot: &mut E, value: f64) {
    *slot = E::from_f64(value);
}

fn extend_quantized<E: Element>(buffer: &mut Vec<E>, values: &[f64]) {
    buffer.extend(values.iter().map(|value| E::from_f64(*value)));
}

/// Contiguous numeric buffer of one [`ElementKind`]
#[derive(Debug, Clone, PartialEq)]
pub enum NumericBuffer {
    /// 1-byte elements
    U8(Vec<u8>),
    /// 2-byte elements
    U16(Vec<u16>),
    /// 4-byte elements
    F32(Vec<f32>),
    /// 8-byte elements
    F64(Vec<f64>),
}

macro_rules! each_buffer {
    ($buffer:expr, $v:ident => $body:expr) => {
        match $buffer {
            NumericBuffer::U8($v) => $body,
            NumericBuffer::U16($v) => $body,
            NumericBuffer::F32($v) => $body,
            NumericBuffer::F64($v) => $body,
        }
    };
}

impl NumericBuffer {
    /// Create an empty buffer with room for `capacity` elements
    pub fn with_capacity(kind: ElementKind, capacity: usize) -> Self {
        match kind {
            ElementKind::U8 => NumericBuffer::U8(Vec::with_capacity(capacity)),
            ElementKind::U16 => NumericBuffer::U16(Vec::with_capacity(capacity)),
            ElementKind::F32 => NumericBuffer::F32(Vec::with_capacity(capacity)),
            ElementKind::F64 => NumericBuffer::F64(Vec::with_capacity(capacity)),
        }
    }

    /// Element kind of this buffer
    pub fn kind(&self) -> ElementKind {
        match self {
            NumericBuffer::U8(_) => ElementKind::U8,
            NumericBuffer::U16(_) => ElementKind::U16,
            NumericBuffer::F32(_) => ElementKind::F32,
            NumericBuffer::F64(_) => ElementKind::F64,
        }
    }

    /// Number of elements stored
    pub fn len(&self) -> usize {
        each_buffer!(self, v => v.len())
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocated capacity in elements
    pub fn capacity(&self) -> usize {
        each_buffer!(self, v => v.capacity())
    }

    /// Read one element
    pub fn get(&self, index: usize) -> f64 {
        each_buffer!(self, v => v[index].to_f64())
    }

    /// Write one element, quantizing to the buffer's kind
    pub fn set(&mut self, index: usize, value: f64) {
        each_buffer!(self, v => store_quantized(&mut v[index], value))
    }

    /// Copy `len` elements starting at `start` into `out`
    pub fn read_into(&self, start: usize, len: usize, out: &mut Vec<f64>) {
        each_buffer!(self, v => out.extend(v[start..start + len].iter().map(|e| e.to_f64())))
    }

    /// Overwrite the elements starting at `start` with `values`
    pub fn write(&mut self, start: usize, values: &[f64]) {
        each_buffer!(self, v => {
            for (slot, value) in v[start..start + values.len()].iter_mut().zip(values) {
                store_quantized(slot, *value);
            }
        })
    }

    /// Append `values`, quantizing each
    pub fn extend(&mut self, values: &[f64]) {
        each_buffer!(self, v => extend_quantized(v, values))
    }

    /// Copy `len` elements from `src` to `dst` within the buffer
    pub fn copy_within(&mut self, src: usize, dst: usize, len: usize) {
        each_buffer!(self, v => v.copy_within(src..src + len, dst))
    }

    /// Shorten the buffer to `len` elements
    pub fn truncate(&mut self, len: usize) {
        each_buffer!(self, v => v.truncate(len))
    }

    /// Remove every element
    pub fn clear(&mut self) {
        each_buffer!(self, v => v.clear())
    }
}

/// Construction template for dense and partitioned stores
///
/// # Example
///
/// ```
/// use tile_ecs::ecs::{Layout, StoreConfig};
///
/// let config = StoreConfig::new(Layout::fields(["x", "y"]))
///     .with_capacity(255)
///     .with_bytes_per_element(4);
/// assert_eq!(config.layout.dimensionality(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Number of entities to reserve room for
    pub initial_capacity: usize,
    /// Element width in bytes: 1, 2, 4 or 8
    pub bytes_per_element: usize,
    /// Per-entity scalar layout
    pub layout: Layout,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            initial_capacity: 1024,
            bytes_per_element: 8,
            layout: Layout::scalar(),
        }
    }
}

impl StoreConfig {
    /// Default capacity and width with the given layout
    pub fn new(layout: Layout) -> Self {
        StoreConfig {
            layout,
            ..StoreConfig::default()
        }
    }

    /// Set the initial entity capacity
    pub fn with_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Set the element width in bytes
    pub fn with_bytes_per_element(mut self, bytes_per_element: usize) -> Self {
        self.bytes_per_element = bytes_per_element;
        self
    }
}

/// Untyped sparse-set core of a dense store
#[derive(Debug, Clone)]
pub struct DenseSet {
    buffer: NumericBuffer,
    sparse_to_dense: HashMap<Entity, usize>,
    dense_to_sparse: Vec<Entity>,
    layout: Layout,
    dimensionality: usize,
}

impl DenseSet {
    /// Create an empty set from a store template
    pub fn new(config: &StoreConfig) -> EcsResult<Self> {
        if config.initial_capacity == 0 {
            return Err(EcsError::InvalidCapacity);
        }
        let kind = ElementKind::from_bytes(config.bytes_per_element)?;
        let dimensionality = config.layout.dimensionality();
        if dimensionality == 0 {
            return Err(EcsError::ShapeMismatch { expected: 1, actual: 0 });
        }

        Ok(DenseSet {
            buffer: NumericBuffer::with_capacity(kind, config.initial_capacity * dimensionality),
            sparse_to_dense: HashMap::with_capacity(config.initial_capacity),
            dense_to_sparse: Vec::with_capacity(config.initial_capacity),
            layout: config.layout.clone(),
            dimensionality,
        })
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.dense_to_sparse.len()
    }

    /// Check if no slot is occupied
    pub fn is_empty(&self) -> bool {
        self.dense_to_sparse.is_empty()
    }

    /// Scalars per entity
    pub fn dimensionality(&self) -> usize {
        self.dimensionality
    }

    /// Per-entity layout
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Element kind of the backing buffer
    pub fn element_kind(&self) -> ElementKind {
        self.buffer.kind()
    }

    /// Read-only view of the packed buffer
    pub fn buffer(&self) -> &NumericBuffer {
        &self.buffer
    }

    /// Check if `entity` occupies a slot
    pub fn contains(&self, entity: Entity) -> bool {
        self.sparse_to_dense.contains_key(&entity)
    }

    /// Slot index of `entity`
    pub fn slot_of(&self, entity: Entity) -> Option<usize> {
        self.sparse_to_dense.get(&entity).copied()
    }

    /// Entity stored at `slot`
    pub fn entity_at(&self, slot: usize) -> Option<Entity> {
        self.dense_to_sparse.get(slot).copied()
    }

    /// Entities in slot order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.dense_to_sparse.iter().copied()
    }

    /// Copy of the scalars at `slot`
    pub fn slot_values(&self, slot: usize) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.dimensionality);
        self.buffer
            .read_into(slot * self.dimensionality, self.dimensionality, &mut out);
        out
    }

    /// Copy of `entity`'s scalars, `None` if absent
    pub fn read(&self, entity: Entity) -> Option<Vec<f64>> {
        self.slot_of(entity).map(|slot| self.slot_values(slot))
    }

    fn check_shape(&self, actual: usize) -> EcsResult<()> {
        if actual != self.dimensionality {
            log::debug!(
                "Rejecting value of {} scalars for dimensionality {}",
                actual,
                self.dimensionality
            );
            return Err(EcsError::ShapeMismatch {
                expected: self.dimensionality,
                actual,
            });
        }
        Ok(())
    }

    /// Append `entity` with `values` at the next free slot
    ///
    /// Returns the slot index. Fails without side effects on a duplicate or
    /// a shape mismatch.
    pub fn insert(&mut self, entity: Entity, values: &[f64]) -> EcsResult<usize> {
        if self.contains(entity) {
            return Err(EcsError::DuplicateEntity(entity));
        }
        self.check_shape(values.len())?;

        let slot = self.dense_to_sparse.len();
        self.buffer.extend(values);
        self.dense_to_sparse.push(entity);
        self.sparse_to_dense.insert(entity, slot);

        debug_assert_eq!(self.sparse_to_dense.len(), self.dense_to_sparse.len());
        debug_assert_eq!(self.buffer.len(), self.dense_to_sparse.len() * self.dimensionality);
        Ok(slot)
    }

    /// Overwrite the scalars of an existing entity in place
    pub fn write(&mut self, entity: Entity, values: &[f64]) -> EcsResult<()> {
        let slot = self.slot_of(entity).ok_or(EcsError::UnknownEntity(entity))?;
        self.check_shape(values.len())?;
        self.buffer.write(slot * self.dimensionality, values);
        Ok(())
    }

    /// Remove `entity`, moving the last slot into its place
    pub fn remove(&mut self, entity: Entity) -> EcsResult<()> {
        let slot = self.slot_of(entity).ok_or(EcsError::UnknownEntity(entity))?;
        let last = self.dense_to_sparse.len() - 1;

        if slot != last {
            let dim = self.dimensionality;
            self.buffer.copy_within(last * dim, slot * dim, dim);
            let moved = self.dense_to_sparse[last];
            self.dense_to_sparse[slot] = moved;
            self.sparse_to_dense.insert(moved, slot);
        }

        self.dense_to_sparse.pop();
        self.sparse_to_dense.remove(&entity);
        self.buffer.truncate(self.dense_to_sparse.len() * self.dimensionality);

        debug_assert_eq!(self.sparse_to_dense.len(), self.dense_to_sparse.len());
        debug_assert_eq!(self.buffer.len(), self.dense_to_sparse.len() * self.dimensionality);
        Ok(())
    }

    /// Remove every entity
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.sparse_to_dense.clear();
        self.dense_to_sparse.clear();
    }
}

/// Typed dense store
///
/// `get` on a dense store returns `None` for absent entities, unlike
/// [`SparseStore::get`](crate::ecs::SparseStore::get), which fails.
///
/// # Example
///
/// ```
/// use tile_ecs::ecs::{ComponentStorage, DenseStore, Entity, Layout, Record};
///
/// let mut store = DenseStore::<Record>::new(255, 4, Layout::fields(["x", "y"])).unwrap();
/// let entity = Entity::new(0);
///
/// store.add(entity, Record::new().with("x", 10.0).with("y", 0.0)).unwrap();
/// assert_eq!(store.get(entity).unwrap().number("x"), Some(10.0));
/// ```
#[derive(Debug, Clone)]
pub struct DenseStore<T> {
    dense: DenseSet,
    scratch: Vec<f64>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Packed> DenseStore<T> {
    /// Create a store
    ///
    /// Fails with `InvalidCapacity` for a zero capacity and with
    /// `InvalidElementWidth` for widths other than 1, 2, 4 or 8 bytes.
    pub fn new(
        initial_capacity: usize,
        bytes_per_element: usize,
        layout: Layout,
    ) -> EcsResult<Self> {
        Self::with_config(&StoreConfig {
            initial_capacity,
            bytes_per_element,
            layout,
        })
    }

    /// Create a store from a template
    pub fn with_config(config: &StoreConfig) -> EcsResult<Self> {
        Ok(DenseStore {
            dense: DenseSet::new(config)?,
            scratch: Vec::new(),
            _marker: PhantomData,
        })
    }

    /// Untyped view of the store
    pub fn raw(&self) -> &DenseSet {
        &self.dense
    }

    /// Mutable untyped view of the store
    pub fn raw_mut(&mut self) -> &mut DenseSet {
        &mut self.dense
    }

    /// Scalars per entity
    pub fn dimensionality(&self) -> usize {
        self.dense.dimensionality()
    }

    /// Per-entity layout
    pub fn layout(&self) -> &Layout {
        self.dense.layout()
    }

    fn flatten(&mut self, value: &T) -> EcsResult<()> {
        self.scratch.clear();
        value.pack(self.dense.layout(), &mut self.scratch)
    }

    /// Rebuild `entity`'s value, `None` if absent
    pub fn get(&self, entity: Entity) -> Option<T> {
        self.dense
            .read(entity)
            .map(|values| T::unpack(self.dense.layout(), &values))
    }

    /// Visit occupied slots in order as `(entity, value, slot)`
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(Entity, T, usize),
    {
        for (slot, entity) in self.dense.entities().enumerate() {
            let values = self.dense.slot_values(slot);
            f(entity, T::unpack(self.dense.layout(), &values), slot);
        }
    }

    /// Entities in slot order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.dense.entities()
    }
}

impl<T: Component> DenseStore<T> {
    /// Create a store laid out with the component's declared fields
    pub fn for_component(initial_capacity: usize, bytes_per_element: usize) -> EcsResult<Self> {
        Self::new(initial_capacity, bytes_per_element, T::layout())
    }
}

impl<T: Packed> ComponentStorage for DenseStore<T> {
    type Value = T;

    fn add(&mut self, entity: Entity, value: T) -> EcsResult<()> {
        if self.dense.contains(entity) {
            return Err(EcsError::DuplicateEntity(entity));
        }
        self.flatten(&value)?;
        let Self { dense, scratch, .. } = self;
        dense.insert(entity, scratch).map(|_| ())
    }

    fn set(&mut self, entity: Entity, value: T) -> EcsResult<()> {
        if !self.dense.contains(entity) {
            return self.add(entity, value);
        }
        self.flatten(&value)?;
        let Self { dense, scratch, .. } = self;
        dense.write(entity, scratch)
    }

    fn remove(&mut self, entity: Entity) -> EcsResult<()> {
        self.dense.remove(entity)
    }

    fn has(&self, entity: Entity) -> bool {
        self.dense.contains(entity)
    }

    fn len(&self) -> usize {
        self.dense.len()
    }

    fn clear(&mut self) {
        self.dense.clear();
    }
}

impl<T: Packed + 'static> AnyStorage for DenseStore<T> {
    fn store_name(&self) -> &'static str {
        "DenseStore"
    }

    fn contains_entity(&self, entity: Entity) -> bool {
        self.dense.contains(entity)
    }

    fn remove_entity(&mut self, entity: Entity) -> EcsResult<()> {
        self.dense.remove(entity)
    }

    fn entity_count(&self) -> usize {
        self.dense.len()
    }

    fn as_dense(&self) -> Option<&DenseSet> {
        Some(&self.dense)
    }

    fn as_dense_mut(&mut self) -> Option<&mut DenseSet> {
        Some(&mut self.dense)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::value::{FieldValue, Record};

    fn xy(x: f64, y: f64) -> Record {
        Record::new().with("x", x).with("y", y)
    }

    fn xy_store() -> DenseStore<Record> {
        DenseStore::new(4, 4, Layout::fields(["x", "y"])).unwrap()
    }

    #[test]
    fn test_invalid_construction() {
        assert_eq!(
            DenseStore::<Record>::new(0, 4, Layout::scalar()).unwrap_err(),
            EcsError::InvalidCapacity
        );
        assert_eq!(
            DenseStore::<Record>::new(16, 3, Layout::scalar()).unwrap_err(),
            EcsError::InvalidElementWidth(3)
        );
    }

    #[test]
    fn test_element_kinds() {
        assert_eq!(ElementKind::from_bytes(2).unwrap(), ElementKind::U16);
        assert_eq!(ElementKind::U16.bytes(), 2);
        assert!(ElementKind::U8.is_integer());
        assert!(!ElementKind::F64.is_integer());
        assert_eq!(ElementKind::U16.quantize(12.6), 13.0);
        assert_eq!(ElementKind::U16.quantize(70000.0), 65535.0);
        assert_eq!(ElementKind::U8.quantize(-4.0), 0.0);
        assert_eq!(ElementKind::U8.quantize(f64::NAN), 0.0);
    }

    #[test]
    fn test_add_get() {
        let mut store = xy_store();
        let e = Entity::new(1);
        store.add(e, xy(10.0, 20.0)).unwrap();

        assert!(store.has(e));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(e), Some(xy(10.0, 20.0)));
        assert_eq!(store.get(Entity::new(2)), None);
    }

    #[test]
    fn test_add_duplicate() {
        let mut store = xy_store();
        let e = Entity::new(1);
        store.add(e, xy(1.0, 2.0)).unwrap();
        assert_eq!(store.add(e, xy(3.0, 4.0)), Err(EcsError::DuplicateEntity(e)));
        assert_eq!(store.get(e), Some(xy(1.0, 2.0)));
    }

    #[test]
    fn test_shape_mismatch_leaves_store_untouched() {
        let mut store = xy_store();
        store.add(Entity::new(0), xy(1.0, 2.0)).unwrap();

        let wide = Record::new().with("x", 1.0).with("y", 2.0).with("z", 3.0);
        let err = store.add(Entity::new(1), wide).unwrap_err();
        assert_eq!(err, EcsError::ShapeMismatch { expected: 2, actual: 3 });
        assert_eq!(store.len(), 1);
        assert_eq!(store.raw().buffer().len(), 2);
        assert!(!store.has(Entity::new(1)));
    }

    #[test]
    fn test_nested_value_rejected() {
        let mut store = xy_store();
        let nested = Record::new()
            .with("x", 1.0)
            .with("y", FieldValue::List(vec![FieldValue::Number(2.0)]));
        let err = store.add(Entity::new(0), nested).unwrap_err();
        assert_eq!(err, EcsError::UnsupportedShape { field: "y".to_string() });
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_adds_when_absent_and_overwrites_in_place() {
        let mut store = xy_store();
        let a = Entity::new(0);
        let b = Entity::new(1);
        store.set(a, xy(1.0, 1.0)).unwrap();
        store.add(b, xy(2.0, 2.0)).unwrap();

        store.set(a, xy(9.0, 8.0)).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.raw().slot_of(a), Some(0));
        assert_eq!(store.get(a), Some(xy(9.0, 8.0)));

        let err = store.set(a, Record::new().with("x", 1.0)).unwrap_err();
        assert_eq!(err, EcsError::ShapeMismatch { expected: 2, actual: 1 });
        assert_eq!(store.get(a), Some(xy(9.0, 8.0)));
    }

    #[test]
    fn test_remove_middle_swaps_last() {
        let mut store = xy_store();
        let (a, b, c) = (Entity::new(0), Entity::new(1), Entity::new(2));
        store.add(a, xy(1.0, 1.0)).unwrap();
        store.add(b, xy(2.0, 2.0)).unwrap();
        store.add(c, xy(3.0, 3.0)).unwrap();

        store.remove(a).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.raw().slot_of(c), Some(0));
        assert_eq!(store.raw().entity_at(0), Some(c));
        assert_eq!(store.get(c), Some(xy(3.0, 3.0)));
        assert_eq!(store.get(b), Some(xy(2.0, 2.0)));
        assert!(!store.has(a));
    }

    #[test]
    fn test_remove_last_and_only() {
        let mut store = xy_store();
        let (a, b) = (Entity::new(0), Entity::new(1));
        store.add(a, xy(1.0, 1.0)).unwrap();
        store.add(b, xy(2.0, 2.0)).unwrap();

        store.remove(b).unwrap();
        assert_eq!(store.entities().collect::<Vec<_>>(), vec![a]);
        store.remove(a).unwrap();
        assert!(store.is_empty());
        assert!(store.raw().buffer().is_empty());
    }

    #[test]
    fn test_remove_unknown() {
        let mut store = xy_store();
        assert_eq!(
            store.remove(Entity::new(5)),
            Err(EcsError::UnknownEntity(Entity::new(5)))
        );
    }

    #[test]
    fn test_for_each_slot_order() {
        let mut store = xy_store();
        for i in 0..3 {
            store.add(Entity::new(i), xy(i as f64, 0.0)).unwrap();
        }
        store.remove(Entity::new(0)).unwrap();

        let mut seen = Vec::new();
        store.for_each(|entity, value, slot| {
            seen.push((entity.raw(), value.number("x").unwrap(), slot));
        });
        assert_eq!(seen, vec![(2, 2.0, 0), (1, 1.0, 1)]);
    }

    #[test]
    fn test_grows_past_initial_capacity() {
        let mut store = DenseStore::<f64>::new(2, 8, Layout::scalar()).unwrap();
        for i in 0..10 {
            store.add(Entity::new(i), i as f64 * 0.5).unwrap();
        }
        assert_eq!(store.len(), 10);
        assert_eq!(store.get(Entity::new(9)), Some(4.5));
    }

    #[test]
    fn test_u16_store_quantizes() {
        let mut store = DenseStore::<Vec<f64>>::new(1, 2, Layout::cells(3)).unwrap();
        let e = Entity::new(0);
        store.add(e, vec![1.4, 1.6, 100000.0]).unwrap();
        assert_eq!(store.get(e), Some(vec![1.0, 2.0, 65535.0]));
        assert_eq!(store.raw().element_kind(), ElementKind::U16);
    }

    #[test]
    fn test_raw_write_and_read() {
        let mut store = DenseStore::<Vec<f64>>::new(1, 8, Layout::grid(2, 2)).unwrap();
        let e = Entity::new(3);
        store.add(e, vec![0.0; 4]).unwrap();
        store.raw_mut().write(e, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(store.raw().read(e), Some(vec![1.0, 2.0, 3.0, 4.0]));
        assert_eq!(
            store.raw_mut().write(e, &[1.0]),
            Err(EcsError::ShapeMismatch { expected: 4, actual: 1 })
        );
    }
}
