//! Runtime literal values and their URI literal form.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SecondsFormat, TimeDelta};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::handles::EnumType;
use crate::primitive::PrimitiveKind;
use crate::types::EdmTypeReference;

/// A literal carried by a constant node or a key segment.
#[derive(Clone, PartialEq, Debug)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    Byte(u8),
    SByte(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Single(f32),
    Double(f64),
    Decimal(Decimal),
    String(String),
    Guid(Uuid),
    Date(NaiveDate),
    DateTimeOffset(DateTime<FixedOffset>),
    Duration(TimeDelta),
    TimeOfDay(NaiveTime),
    Binary(Vec<u8>),
    Enum { ty: EnumType, member: String },
}

impl LiteralValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Primitive kind of the runtime value. `None` for null and enum values.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        let kind = match self {
            Self::Null | Self::Enum { .. } => return None,
            Self::Boolean(_) => PrimitiveKind::Boolean,
            Self::Byte(_) => PrimitiveKind::Byte,
            Self::SByte(_) => PrimitiveKind::SByte,
            Self::Int16(_) => PrimitiveKind::Int16,
            Self::Int32(_) => PrimitiveKind::Int32,
            Self::Int64(_) => PrimitiveKind::Int64,
            Self::Single(_) => PrimitiveKind::Single,
            Self::Double(_) => PrimitiveKind::Double,
            Self::Decimal(_) => PrimitiveKind::Decimal,
            Self::String(_) => PrimitiveKind::String,
            Self::Guid(_) => PrimitiveKind::Guid,
            Self::Date(_) => PrimitiveKind::Date,
            Self::DateTimeOffset(_) => PrimitiveKind::DateTimeOffset,
            Self::Duration(_) => PrimitiveKind::Duration,
            Self::TimeOfDay(_) => PrimitiveKind::TimeOfDay,
            Self::Binary(_) => PrimitiveKind::Binary,
        };
        Some(kind)
    }

    /// Type inferred from the runtime value. `None` for null.
    ///
    /// Strings and binaries are reference-like and therefore nullable;
    /// every other value type is not.
    pub fn type_reference(&self) -> Option<EdmTypeReference> {
        if let Self::Enum { ty, .. } = self {
            return Some(EdmTypeReference::enumeration(ty.clone(), false));
        }
        let kind = self.primitive_kind()?;
        let nullable = matches!(kind, PrimitiveKind::String | PrimitiveKind::Binary);
        Some(EdmTypeReference::primitive(kind, nullable))
    }

    /// Render as an OData URI literal (`'O''Neil'`, `42`, `duration'PT1H'`).
    pub fn to_uri_literal(&self) -> String {
        match self {
            Self::Null => "null".to_owned(),
            Self::Boolean(b) => b.to_string(),
            Self::Byte(n) => n.to_string(),
            Self::SByte(n) => n.to_string(),
            Self::Int16(n) => n.to_string(),
            Self::Int32(n) => n.to_string(),
            Self::Int64(n) => n.to_string(),
            Self::Single(n) => format_float(*n),
            Self::Double(n) => format_float(*n),
            Self::Decimal(d) => d.normalize().to_string(),
            Self::String(s) => quote(s),
            Self::Guid(g) => g.hyphenated().to_string(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::DateTimeOffset(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Self::Duration(d) => format!("duration'{}'", iso8601_duration(*d)),
            Self::TimeOfDay(t) => t.format("%H:%M:%S%.f").to_string(),
            Self::Binary(bytes) => format!("binary'{}'", URL_SAFE.encode(bytes)),
            Self::Enum { ty, member } => format!("{}'{}'", ty.full_name(), member),
        }
    }
}

impl From<bool> for LiteralValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i32> for LiteralValue {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<i64> for LiteralValue {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<f64> for LiteralValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<Decimal> for LiteralValue {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<&str> for LiteralValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for LiteralValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Uuid> for LiteralValue {
    fn from(v: Uuid) -> Self {
        Self::Guid(v)
    }
}

impl From<NaiveDate> for LiteralValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn format_float<T: Copy + Into<f64> + std::fmt::Display>(n: T) -> String {
    let wide: f64 = n.into();
    if wide.is_nan() {
        "NaN".to_owned()
    } else if wide.is_infinite() {
        if wide > 0.0 { "INF" } else { "-INF" }.to_owned()
    } else {
        n.to_string()
    }
}

fn iso8601_duration(d: TimeDelta) -> String {
    let sign = if d < TimeDelta::zero() { "-" } else { "" };
    let d = d.abs();
    let days = d.num_days();
    let hours = d.num_hours() % 24;
    let minutes = d.num_minutes() % 60;
    let seconds = d.num_seconds() % 60;
    let nanos = d.subsec_nanos();

    let mut time = String::new();
    if hours > 0 {
        time.push_str(&format!("{hours}H"));
    }
    if minutes > 0 {
        time.push_str(&format!("{minutes}M"));
    }
    if nanos > 0 {
        let frac = format!("{nanos:09}");
        time.push_str(&format!("{seconds}.{}S", frac.trim_end_matches('0')));
    } else if seconds > 0 || (days == 0 && time.is_empty()) {
        time.push_str(&format!("{seconds}S"));
    }

    let mut out = format!("{sign}P");
    if days > 0 {
        out.push_str(&format!("{days}D"));
    }
    if !time.is_empty() {
        out.push('T');
        out.push_str(&time);
    }
    out
}
