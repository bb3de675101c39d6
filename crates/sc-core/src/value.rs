use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::function::Function;
use crate::record::Record;

/// Custom values that resolve keys on their own instead of through the
/// structural rules of the query engine.
pub trait Extractable: fmt::Debug + Send + Sync {
    fn extract_by_key(&self, key: &str) -> Option<Value>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl IntKind {
    pub fn min(self) -> i128 {
        match self {
            Self::I8 => i8::MIN as i128,
            Self::I16 => i16::MIN as i128,
            Self::I32 => i32::MIN as i128,
            Self::I64 => i64::MIN as i128,
            Self::U8 | Self::U16 | Self::U32 | Self::U64 => 0,
        }
    }

    pub fn max(self) -> i128 {
        match self {
            Self::I8 => i8::MAX as i128,
            Self::I16 => i16::MAX as i128,
            Self::I32 => i32::MAX as i128,
            Self::I64 => i64::MAX as i128,
            Self::U8 => u8::MAX as i128,
            Self::U16 => u16::MAX as i128,
            Self::U32 => u32::MAX as i128,
            Self::U64 => u64::MAX as i128,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::I8 => "int8",
            Self::I16 => "int16",
            Self::I32 => "int32",
            Self::I64 => "int64",
            Self::U8 => "uint8",
            Self::U16 => "uint16",
            Self::U32 => "uint32",
            Self::U64 => "uint64",
        }
    }
}

/// A fixed-width integer. The value is always within the range of its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntValue {
    kind: IntKind,
    value: i128,
}

impl IntValue {
    pub fn new(kind: IntKind, value: i128) -> Option<Self> {
        if value < kind.min() || value > kind.max() {
            return None;
        }
        Some(Self { kind, value })
    }

    pub fn kind(&self) -> IntKind {
        self.kind
    }

    pub fn get(&self) -> i128 {
        self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    F32,
    F64,
}

impl FloatKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::F32 => "float32",
            Self::F64 => "float64",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatValue {
    kind: FloatKind,
    value: f64,
}

impl FloatValue {
    pub fn f32(value: f32) -> Self {
        Self {
            kind: FloatKind::F32,
            value: value as f64,
        }
    }

    pub fn f64(value: f64) -> Self {
        Self {
            kind: FloatKind::F64,
            value,
        }
    }

    pub fn kind(&self) -> FloatKind {
        self.kind
    }

    pub fn get(&self) -> f64 {
        self.value
    }

    /// Shortest text that round-trips at the value's own width.
    pub fn to_decimal_string(&self) -> String {
        match self.kind {
            FloatKind::F32 => (self.value as f32).to_string(),
            FloatKind::F64 => self.value.to_string(),
        }
    }
}

/// Text carried under a user-defined string type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedString {
    type_name: String,
    value: String,
}

impl NamedString {
    pub fn new(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            value: value.into(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    type_name: String,
    values: Vec<(i32, String)>,
}

impl EnumDescriptor {
    pub fn new<'a>(
        type_name: impl Into<String>,
        values: impl IntoIterator<Item = (i32, &'a str)>,
    ) -> Arc<Self> {
        Arc::new(Self {
            type_name: type_name.into(),
            values: values
                .into_iter()
                .map(|(number, name)| (number, name.to_string()))
                .collect(),
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn name_of(&self, number: i32) -> Option<&str> {
        self.values
            .iter()
            .find(|(candidate, _)| *candidate == number)
            .map(|(_, name)| name.as_str())
    }

    pub fn number_of(&self, name: &str) -> Option<i32> {
        self.values
            .iter()
            .find(|(_, candidate)| candidate == name)
            .map(|(number, _)| *number)
    }
}

#[derive(Debug, Clone)]
pub struct EnumValue {
    descriptor: Arc<EnumDescriptor>,
    number: i32,
}

impl EnumValue {
    pub fn new(descriptor: &Arc<EnumDescriptor>, number: i32) -> Self {
        Self {
            descriptor: Arc::clone(descriptor),
            number,
        }
    }

    pub fn from_name(descriptor: &Arc<EnumDescriptor>, name: &str) -> Option<Self> {
        descriptor
            .number_of(name)
            .map(|number| Self::new(descriptor, number))
    }

    pub fn descriptor(&self) -> &Arc<EnumDescriptor> {
        &self.descriptor
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    /// Canonical name, or the number itself for values outside the table.
    pub fn name(&self) -> Cow<'_, str> {
        match self.descriptor.name_of(self.number) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(self.number.to_string()),
        }
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.type_name == other.descriptor.type_name && self.number == other.number
    }
}

/// Numeric text of unbounded size, kept verbatim as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Number(String);

impl Number {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single key/value pair of an ordered mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct MapItem {
    pub key: Value,
    pub value: Value,
}

impl MapItem {
    pub fn new(key: impl Into<Value>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Ref(Option<Box<Value>>),
    Bool(bool),
    Int(IntValue),
    Float(FloatValue),
    String(String),
    Named(NamedString),
    Enum(EnumValue),
    Number(Number),
    BigInt(BigInt),
    BigDecimal(BigDecimal),
    Seq(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Record(Record),
    MapItem(Box<MapItem>),
    MapSlice(Vec<MapItem>),
    Object(Arc<dyn Extractable>),
    Function(Function),
}

impl Value {
    pub fn ptr(value: impl Into<Value>) -> Self {
        Self::Ref(Some(Box::new(value.into())))
    }

    pub fn null_ptr() -> Self {
        Self::Ref(None)
    }

    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    pub fn map_slice<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        Self::MapSlice(
            entries
                .into_iter()
                .map(|(key, value)| MapItem::new(key, value))
                .collect(),
        )
    }

    pub fn object(object: impl Extractable + 'static) -> Self {
        Self::Object(Arc::new(object))
    }

    /// True for a literal absence and for a null indirection; never for any
    /// other shape.
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil | Self::Ref(None))
    }

    /// Fixed-width numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    /// Arbitrary-precision numbers, including numeric text.
    pub fn is_big_numeric(&self) -> bool {
        matches!(self, Self::Number(_) | Self::BigInt(_) | Self::BigDecimal(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            Self::Named(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn type_name(&self) -> Cow<'_, str> {
        match self {
            Self::Nil => Cow::Borrowed("nil"),
            Self::Ref(_) => Cow::Borrowed("pointer"),
            Self::Bool(_) => Cow::Borrowed("bool"),
            Self::Int(value) => Cow::Borrowed(value.kind().name()),
            Self::Float(value) => Cow::Borrowed(value.kind().name()),
            Self::String(_) => Cow::Borrowed("string"),
            Self::Named(value) => Cow::Borrowed(value.type_name()),
            Self::Enum(value) => Cow::Borrowed(value.descriptor().type_name()),
            Self::Number(_) => Cow::Borrowed("number"),
            Self::BigInt(_) => Cow::Borrowed("bigint"),
            Self::BigDecimal(_) => Cow::Borrowed("bigdecimal"),
            Self::Seq(_) => Cow::Borrowed("seq"),
            Self::Map(_) => Cow::Borrowed("map"),
            Self::Record(record) => Cow::Borrowed(record.schema().type_name()),
            Self::MapItem(_) => Cow::Borrowed("map-item"),
            Self::MapSlice(_) => Cow::Borrowed("map-slice"),
            Self::Object(_) => Cow::Borrowed("object"),
            Self::Function(_) => Cow::Borrowed("function"),
        }
    }

    /// Print form with strings quoted, for diagnostics.
    pub fn repr(&self) -> String {
        match self {
            Self::String(value) => format!("{:?}", value),
            Self::Named(value) => format!("{:?}", value.as_str()),
            Self::Number(value) => value.as_str().to_string(),
            other => other.to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Ref(left), Self::Ref(right)) => left == right,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::Float(left), Self::Float(right)) => left == right,
            (Self::String(left), Self::String(right)) => left == right,
            (Self::Named(left), Self::Named(right)) => left == right,
            (Self::Enum(left), Self::Enum(right)) => left == right,
            (Self::Number(left), Self::Number(right)) => left == right,
            (Self::BigInt(left), Self::BigInt(right)) => left == right,
            (Self::BigDecimal(left), Self::BigDecimal(right)) => {
                crate::numeric::decimal_eq(left, right)
            }
            (Self::Seq(left), Self::Seq(right)) => left == right,
            (Self::Map(left), Self::Map(right)) => {
                let count = |entries: &[(Value, Value)], entry: &(Value, Value)| {
                    entries.iter().filter(|other| **other == *entry).count()
                };
                left.len() == right.len()
                    && left
                        .iter()
                        .all(|entry| count(left, entry) == count(right, entry))
            }
            (Self::Record(left), Self::Record(right)) => left == right,
            (Self::MapItem(left), Self::MapItem(right)) => left == right,
            (Self::MapSlice(left), Self::MapSlice(right)) => left == right,
            (Self::Object(left), Self::Object(right)) => Arc::ptr_eq(left, right),
            (Self::Function(left), Self::Function(right)) => left == right,
            _ => false,
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, values: &[Value]) -> fmt::Result {
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", value)?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil | Self::Ref(None) => f.write_str("<nil>"),
            Self::Ref(Some(value)) => write!(f, "{}", value),
            Self::Bool(value) => write!(f, "{}", value),
            Self::Int(value) => write!(f, "{}", value.get()),
            Self::Float(value) => f.write_str(&value.to_decimal_string()),
            Self::String(value) => f.write_str(value),
            Self::Named(value) => f.write_str(value.as_str()),
            Self::Enum(value) => f.write_str(&value.name()),
            Self::Number(value) => f.write_str(value.as_str()),
            Self::BigInt(value) => write!(f, "{}", value),
            Self::BigDecimal(value) => write!(f, "{}", value),
            Self::Seq(values) => {
                f.write_str("[")?;
                write_joined(f, values)?;
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("map[")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}:{}", key, value)?;
                }
                f.write_str("]")
            }
            Self::Record(record) => {
                f.write_str("{")?;
                write_joined(f, record.values())?;
                f.write_str("}")
            }
            Self::MapItem(item) => write!(f, "{{{} {}}}", item.key, item.value),
            Self::MapSlice(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{{{} {}}}", item.key, item.value)?;
                }
                f.write_str("]")
            }
            Self::Object(object) => write!(f, "{:?}", object),
            Self::Function(function) => write!(f, "func {}", function.name()),
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Int(IntValue {
                        kind: IntKind::$kind,
                        value: value as i128,
                    })
                }
            }
        )*
    };
}

impl_from_int!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(FloatValue::f32(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(FloatValue::f64(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<NamedString> for Value {
    fn from(value: NamedString) -> Self {
        Self::Named(value)
    }
}

impl From<EnumValue> for Value {
    fn from(value: EnumValue) -> Self {
        Self::Enum(value)
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Self::BigInt(value)
    }
}

impl From<BigDecimal> for Value {
    fn from(value: BigDecimal) -> Self {
        Self::BigDecimal(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Self::Seq(values)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Self::Record(record)
    }
}

impl From<MapItem> for Value {
    fn from(item: MapItem) -> Self {
        Self::MapItem(Box::new(item))
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Self::Function(function)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::ptr(value),
            None => Self::null_ptr(),
        }
    }
}
