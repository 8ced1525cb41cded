//! Cache Value Module
//!
//! Cached payloads are either immutable primitives, replaced wholesale on
//! update, or mutable objects that apply updates to themselves through the
//! [`MutableValue`] capability. The classification is made once, when the
//! value is wrapped.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{CacheError, Result};

// == Mutable Value Capability ==
/// Capability required of every mutable cached object.
pub trait MutableValue: Any + fmt::Debug + Send + Sync {
    /// Applies `new_value` (full or partial state) in place.
    ///
    /// Implementations returning `Err` must leave themselves unchanged.
    fn update(&mut self, new_value: &JsonValue, fetched_time: i64) -> Result<()>;

    /// Returns the minimal state needed to rebuild this object.
    fn serialize(&self) -> JsonValue;

    /// Concrete type identity, used for exact-type filtering.
    fn value_type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Short name of the concrete type.
    fn type_name(&self) -> &'static str {
        short_type_name(type_name::<Self>())
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    // Generic parameters may contain paths of their own
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

// == Complex ==
/// Complex number primitive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

// == Frozen Set ==
/// Duplicate-free, order-preserving collection of primitives.
///
/// Equality ignores element order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Primitive>", into = "Vec<Primitive>")]
pub struct FrozenSet {
    items: Vec<Primitive>,
}

impl FrozenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, item: &Primitive) -> bool {
        self.items.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Primitive> {
        self.items.iter()
    }
}

impl FromIterator<Primitive> for FrozenSet {
    fn from_iter<I: IntoIterator<Item = Primitive>>(iter: I) -> Self {
        let mut items: Vec<Primitive> = Vec::new();
        for item in iter {
            if !items.contains(&item) {
                items.push(item);
            }
        }
        Self { items }
    }
}

impl From<Vec<Primitive>> for FrozenSet {
    fn from(items: Vec<Primitive>) -> Self {
        items.into_iter().collect()
    }
}

impl From<FrozenSet> for Vec<Primitive> {
    fn from(set: FrozenSet) -> Self {
        set.items
    }
}

impl PartialEq for FrozenSet {
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len()
            && self.items.iter().all(|item| other.items.contains(item))
    }
}

// == Primitive ==
/// Immutable cached value.
///
/// Serialized in an adjacently tagged form, e.g. `{"type": "int", "value": 5}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Primitive {
    Str(String),
    Int(i64),
    Float(f64),
    Complex(Complex),
    Bool(bool),
    Tuple(Vec<Primitive>),
    FrozenSet(FrozenSet),
}

impl Primitive {
    /// Builds a frozen set primitive, dropping duplicates.
    pub fn frozenset<I: IntoIterator<Item = Primitive>>(items: I) -> Self {
        Primitive::FrozenSet(items.into_iter().collect())
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Primitive::Str(_) => ValueType::Str,
            Primitive::Int(_) => ValueType::Int,
            Primitive::Float(_) => ValueType::Float,
            Primitive::Complex(_) => ValueType::Complex,
            Primitive::Bool(_) => ValueType::Bool,
            Primitive::Tuple(_) => ValueType::Tuple,
            Primitive::FrozenSet(_) => ValueType::FrozenSet,
        }
    }

    /// Plain JSON rendering, without type tags.
    ///
    /// Non-finite floats render as `null`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Primitive::Str(s) => JsonValue::from(s.as_str()),
            Primitive::Int(i) => JsonValue::from(*i),
            Primitive::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Primitive::Complex(c) => serde_json::json!({ "re": c.re, "im": c.im }),
            Primitive::Bool(b) => JsonValue::Bool(*b),
            Primitive::Tuple(items) => items.iter().map(Primitive::to_json).collect(),
            Primitive::FrozenSet(set) => set.iter().map(Primitive::to_json).collect(),
        }
    }
}

macro_rules! primitive_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for Primitive {
                fn from(value: $source) -> Self {
                    Primitive::$variant(value.into())
                }
            }

            impl From<$source> for CacheValue {
                fn from(value: $source) -> Self {
                    CacheValue::Immutable(Primitive::from(value))
                }
            }
        )*
    };
}

primitive_from! {
    String => Str,
    &str => Str,
    i64 => Int,
    i32 => Int,
    u32 => Int,
    f64 => Float,
    Complex => Complex,
    bool => Bool,
    Vec<Primitive> => Tuple,
    FrozenSet => FrozenSet,
}

// == Value Kind ==
/// Mutability classification of a cached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Immutable,
    Mutable,
}

// == Value Type ==
/// Exact runtime type of a cached value.
///
/// Object types compare by `TypeId` alone.
#[derive(Debug, Clone, Copy)]
pub enum ValueType {
    Str,
    Int,
    Float,
    Complex,
    Bool,
    Tuple,
    FrozenSet,
    /// A concrete mutable object type
    Object { id: TypeId, name: &'static str },
}

impl ValueType {
    /// Value type of the concrete mutable type `T`.
    pub fn of<T: MutableValue>() -> Self {
        ValueType::Object {
            id: TypeId::of::<T>(),
            name: short_type_name(type_name::<T>()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Str => "str",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Complex => "complex",
            ValueType::Bool => "bool",
            ValueType::Tuple => "tuple",
            ValueType::FrozenSet => "frozenset",
            ValueType::Object { name, .. } => *name,
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            ValueType::Object { .. } => ValueKind::Mutable,
            _ => ValueKind::Immutable,
        }
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueType::Object { id: a, .. }, ValueType::Object { id: b, .. }) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Eq for ValueType {}

impl Hash for ValueType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        if let ValueType::Object { id, .. } = self {
            id.hash(state);
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueType {
    type Err = CacheError;

    /// Parses primitive type names and `document`, the built-in mutable type.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "str" => Ok(ValueType::Str),
            "int" => Ok(ValueType::Int),
            "float" => Ok(ValueType::Float),
            "complex" => Ok(ValueType::Complex),
            "bool" => Ok(ValueType::Bool),
            "tuple" => Ok(ValueType::Tuple),
            "frozenset" => Ok(ValueType::FrozenSet),
            "document" => Ok(ValueType::of::<crate::cache::Document>()),
            other => Err(CacheError::InvalidRequest(format!(
                "Unknown value type '{}'",
                other
            ))),
        }
    }
}

// == Cache Value ==
/// A cached payload, classified once at construction.
#[derive(Debug)]
pub enum CacheValue {
    Immutable(Primitive),
    Mutable(Box<dyn MutableValue>),
}

impl CacheValue {
    /// Wraps a mutable object.
    pub fn mutable<T: MutableValue>(value: T) -> Self {
        CacheValue::Mutable(Box::new(value))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            CacheValue::Immutable(_) => ValueKind::Immutable,
            CacheValue::Mutable(_) => ValueKind::Mutable,
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            CacheValue::Immutable(primitive) => primitive.value_type(),
            CacheValue::Mutable(object) => ValueType::Object {
                id: object.value_type_id(),
                name: object.type_name(),
            },
        }
    }

    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            CacheValue::Immutable(primitive) => Some(primitive),
            CacheValue::Mutable(_) => None,
        }
    }

    /// State handed to a mutable object's `update`.
    pub fn to_state(&self) -> JsonValue {
        match self {
            CacheValue::Immutable(primitive) => primitive.to_json(),
            CacheValue::Mutable(object) => object.serialize(),
        }
    }
}

impl From<Primitive> for CacheValue {
    fn from(primitive: Primitive) -> Self {
        CacheValue::Immutable(primitive)
    }
}

impl From<Box<dyn MutableValue>> for CacheValue {
    fn from(object: Box<dyn MutableValue>) -> Self {
        CacheValue::Mutable(object)
    }
}

impl PartialEq for CacheValue {
    /// Mutable objects compare by concrete type and serialized state.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CacheValue::Immutable(a), CacheValue::Immutable(b)) => a == b,
            (CacheValue::Mutable(a), CacheValue::Mutable(b)) => {
                a.value_type_id() == b.value_type_id() && a.serialize() == b.serialize()
            }
            _ => false,
        }
    }
}

impl PartialEq<Primitive> for CacheValue {
    fn eq(&self, other: &Primitive) -> bool {
        self.as_primitive() == Some(other)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Counter {
        count: i64,
    }

    impl MutableValue for Counter {
        fn update(&mut self, new_value: &JsonValue, _fetched_time: i64) -> Result<()> {
            let delta = new_value
                .as_i64()
                .ok_or_else(|| CacheError::UnsupportedValueType("expected integer".into()))?;
            self.count += delta;
            Ok(())
        }

        fn serialize(&self) -> JsonValue {
            json!(self.count)
        }
    }

    #[test]
    fn test_primitive_classification() {
        assert_eq!(CacheValue::from("a").value_type(), ValueType::Str);
        assert_eq!(CacheValue::from(5).value_type(), ValueType::Int);
        assert_eq!(CacheValue::from(true).value_type(), ValueType::Bool);
        assert_eq!(CacheValue::from(1.5).value_type(), ValueType::Float);
        assert_eq!(
            CacheValue::from(Complex::new(1.0, -1.0)).value_type(),
            ValueType::Complex
        );
        assert_eq!(CacheValue::from(5).kind(), ValueKind::Immutable);
    }

    #[test]
    fn test_bool_is_not_int() {
        assert_ne!(CacheValue::from(true).value_type(), ValueType::Int);
    }

    #[test]
    fn test_mutable_classification() {
        let value = CacheValue::mutable(Counter { count: 1 });
        assert_eq!(value.kind(), ValueKind::Mutable);
        assert_eq!(value.value_type(), ValueType::of::<Counter>());
        assert_eq!(value.value_type().name(), "Counter");
        assert_eq!(value.value_type().kind(), ValueKind::Mutable);
    }

    #[test]
    fn test_frozenset_drops_duplicates_and_ignores_order() {
        let a = Primitive::frozenset(vec![Primitive::Int(1), Primitive::Int(2), Primitive::Int(1)]);
        let b = Primitive::frozenset(vec![Primitive::Int(2), Primitive::Int(1)]);
        assert_eq!(a, b);

        if let Primitive::FrozenSet(set) = a {
            assert_eq!(set.len(), 2);
            assert!(set.contains(&Primitive::Int(1)));
        } else {
            panic!("expected frozenset");
        }
    }

    #[test]
    fn test_primitive_wire_format() {
        let json = serde_json::to_value(Primitive::Int(5)).unwrap();
        assert_eq!(json, json!({"type": "int", "value": 5}));

        let tuple: Primitive = serde_json::from_value(json!({
            "type": "tuple",
            "value": [{"type": "str", "value": "a"}, {"type": "bool", "value": false}]
        }))
        .unwrap();
        assert_eq!(
            tuple,
            Primitive::Tuple(vec![Primitive::from("a"), Primitive::Bool(false)])
        );

        let set: Primitive = serde_json::from_value(json!({
            "type": "frozenset",
            "value": [{"type": "int", "value": 3}, {"type": "int", "value": 3}]
        }))
        .unwrap();
        assert_eq!(set, Primitive::frozenset(vec![Primitive::Int(3)]));
    }

    #[test]
    fn test_to_state() {
        assert_eq!(CacheValue::from("a").to_state(), json!("a"));
        assert_eq!(
            CacheValue::from(Complex::new(1.0, 2.0)).to_state(),
            json!({"re": 1.0, "im": 2.0})
        );
        assert_eq!(
            CacheValue::mutable(Counter { count: 4 }).to_state(),
            json!(4)
        );
        assert_eq!(Primitive::Float(f64::NAN).to_json(), JsonValue::Null);
    }

    #[test]
    fn test_value_type_from_str() {
        assert_eq!("int".parse::<ValueType>().unwrap(), ValueType::Int);
        assert_eq!("FrozenSet".parse::<ValueType>().unwrap(), ValueType::FrozenSet);
        assert!(matches!(
            "list".parse::<ValueType>(),
            Err(CacheError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_cache_value_equality() {
        assert_eq!(CacheValue::from("a"), CacheValue::from("a"));
        assert_ne!(CacheValue::from(1), CacheValue::from(1.0));
        assert_eq!(
            CacheValue::mutable(Counter { count: 2 }),
            CacheValue::mutable(Counter { count: 2 })
        );
        assert_ne!(CacheValue::mutable(Counter { count: 2 }), CacheValue::from(2));
        assert!(CacheValue::from(7) == Primitive::Int(7));
    }
}
