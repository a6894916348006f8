//! Element-type tags, and the allow-lists every adapter consults before trusting one.
//!
//! Tags are closed: there is no runtime registration. A tag outside these lists
//! is rejected on write and on read with [`FrameError::DisallowedElementType`].

use crate::error::FrameError;
use anyhow::Result;
use safeframe_types::serde::ArrayType;
use std::fmt;

/// Array element tags with no built-in null representation.
/// The timezone-aware family `datetime64[ns, <tz>]` is accepted in addition to these.
pub const PRIMITIVE_TAGS: &[&str] = &[
    "bool",
    "int8",
    "int16",
    "int32",
    "int64",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "float32",
    "float64",
    "str",
    "datetime64[ns]",
    "timedelta64[ns]",
];

/// Extension tags with an inherent null slot.
pub const NULLABLE_TAGS: &[&str] = &[
    "boolean", "Int8", "Int16", "Int32", "Int64", "UInt8", "UInt16", "UInt32", "UInt64", "Float32",
    "Float64",
];

pub const STRING_TAG: &str = "string";

pub const CATEGORY_TAG: &str = "category";

const DATETIME_TZ_PREFIX: &str = "datetime64[ns, ";
const INTERVAL_PREFIX: &str = "interval[";

const TZ_MAX_LEN: usize = 64;

/// Not-a-time, for `datetime64` and `timedelta64` elements.
pub const NAT: i64 = i64::MIN;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Family {
    Primitive,
    Nullable,
}

pub fn is_allowed(tag: &str, family: Family) -> bool {
    match family {
        Family::Primitive => PrimitiveType::parse(tag).is_some(),
        Family::Nullable => NullableType::parse(tag).is_some(),
    }
}

pub fn check_allowed(tag: &str, family: Family) -> Result<()> {
    if is_allowed(tag, family) {
        Ok(())
    } else {
        Err(FrameError::DisallowedElementType(String::from(tag)).into())
    }
}

#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub enum PrimitiveType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Str,
    /// Nanoseconds since the epoch, naive.
    DateTime,
    /// Nanoseconds.
    TimeDelta,
    /// Nanoseconds since the epoch, UTC, displayed in the named zone.
    DateTimeTz(String),
}

impl PrimitiveType {
    pub fn parse(tag: &str) -> Option<Self> {
        let typ = match tag {
            "bool" => Self::Bool,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "uint8" => Self::UInt8,
            "uint16" => Self::UInt16,
            "uint32" => Self::UInt32,
            "uint64" => Self::UInt64,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            "str" => Self::Str,
            "datetime64[ns]" => Self::DateTime,
            "timedelta64[ns]" => Self::TimeDelta,
            _ => {
                let tz = tag.strip_prefix(DATETIME_TZ_PREFIX)?.strip_suffix(']')?;
                if !is_valid_tz(tz) {
                    return None;
                }
                Self::DateTimeTz(String::from(tz))
            }
        };
        Some(typ)
    }

    /// A timezone-aware datetime type. Fails on a malformed zone name.
    pub fn datetime_tz(tz: &str) -> Result<Self> {
        let typ = Self::DateTimeTz(String::from(tz));
        check_allowed(&typ.tag(), Family::Primitive)?;
        Ok(typ)
    }

    pub fn tag(&self) -> String {
        let tag = match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Str => "str",
            Self::DateTime => "datetime64[ns]",
            Self::TimeDelta => "timedelta64[ns]",
            Self::DateTimeTz(tz) => return format!("{}{}]", DATETIME_TZ_PREFIX, tz),
        };
        String::from(tag)
    }

    pub fn storage(&self) -> ArrayType {
        match self {
            Self::Bool => ArrayType::Bool,
            Self::Int8 => ArrayType::I8,
            Self::Int16 => ArrayType::I16,
            Self::Int32 => ArrayType::I32,
            Self::Int64 => ArrayType::I64,
            Self::UInt8 => ArrayType::U8,
            Self::UInt16 => ArrayType::U16,
            Self::UInt32 => ArrayType::U32,
            Self::UInt64 => ArrayType::U64,
            Self::Float32 => ArrayType::F32,
            Self::Float64 => ArrayType::F64,
            Self::Str => ArrayType::Str,
            Self::DateTime | Self::TimeDelta | Self::DateTimeTz(_) => ArrayType::I64,
        }
    }

    pub fn tz(&self) -> Option<&str> {
        match self {
            Self::DateTimeTz(tz) => Some(tz),
            _ => None,
        }
    }
}

/// IANA style names ("UTC", "Europe/Berlin", "Etc/GMT+1") and fixed offsets ("+01:00").
fn is_valid_tz(tz: &str) -> bool {
    !tz.is_empty()
        && tz.len() <= TZ_MAX_LEN
        && !tz.starts_with('/')
        && tz
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-' | '/' | ':'))
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum NullableType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
}

impl NullableType {
    pub fn parse(tag: &str) -> Option<Self> {
        let typ = match tag {
            "boolean" => Self::Boolean,
            "Int8" => Self::Int8,
            "Int16" => Self::Int16,
            "Int32" => Self::Int32,
            "Int64" => Self::Int64,
            "UInt8" => Self::UInt8,
            "UInt16" => Self::UInt16,
            "UInt32" => Self::UInt32,
            "UInt64" => Self::UInt64,
            "Float32" => Self::Float32,
            "Float64" => Self::Float64,
            _ => return None,
        };
        Some(typ)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::UInt8 => "UInt8",
            Self::UInt16 => "UInt16",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
        }
    }

    pub fn storage(&self) -> ArrayType {
        match self {
            Self::Boolean => ArrayType::Bool,
            Self::Int8 => ArrayType::I8,
            Self::Int16 => ArrayType::I16,
            Self::Int32 => ArrayType::I32,
            Self::Int64 => ArrayType::I64,
            Self::UInt8 => ArrayType::U8,
            Self::UInt16 => ArrayType::U16,
            Self::UInt32 => ArrayType::U32,
            Self::UInt64 => ArrayType::U64,
            Self::Float32 => ArrayType::F32,
            Self::Float64 => ArrayType::F64,
        }
    }
}

/// Which bounds of an interval are inclusive.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Closed {
    Left,
    Right,
    Both,
    Neither,
}

impl Closed {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "both" => Some(Self::Both),
            "neither" => Some(Self::Neither),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Both => "both",
            Self::Neither => "neither",
        }
    }
}

impl fmt::Display for Closed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every tag this crate recognizes.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub enum ElementType {
    Primitive(PrimitiveType),
    Nullable(NullableType),
    String,
    Category,
    /// Only meaningful for an index. Columns have no branch for it.
    Interval(PrimitiveType, Closed),
}

impl ElementType {
    pub fn parse(tag: &str) -> Result<Self> {
        if tag == STRING_TAG {
            return Ok(Self::String);
        }
        if tag == CATEGORY_TAG {
            return Ok(Self::Category);
        }
        if let Some(typ) = NullableType::parse(tag) {
            return Ok(Self::Nullable(typ));
        }
        if let Some(typ) = PrimitiveType::parse(tag) {
            return Ok(Self::Primitive(typ));
        }
        if let Some((subtype, closed)) = parse_interval(tag) {
            return Ok(Self::Interval(subtype, closed));
        }
        Err(FrameError::DisallowedElementType(String::from(tag)).into())
    }

    pub fn tag(&self) -> String {
        match self {
            Self::Primitive(typ) => typ.tag(),
            Self::Nullable(typ) => String::from(typ.tag()),
            Self::String => String::from(STRING_TAG),
            Self::Category => String::from(CATEGORY_TAG),
            Self::Interval(subtype, closed) => {
                format!("{}{}, {}]", INTERVAL_PREFIX, subtype.tag(), closed)
            }
        }
    }
}

/// `interval[<primitive>, <closed>]`. The primitive may itself contain ", ".
fn parse_interval(tag: &str) -> Option<(PrimitiveType, Closed)> {
    let inner = tag.strip_prefix(INTERVAL_PREFIX)?.strip_suffix(']')?;
    let (subtype, closed) = inner.rsplit_once(", ")?;
    Some((PrimitiveType::parse(subtype)?, Closed::parse(closed)?))
}
