//! Primitive type kinds of the `Edm` namespace.

/// Built-in primitive types.
///
/// Spatial and geography kinds are not modelled.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum PrimitiveKind {
    Binary = 0,
    Boolean = 1,
    Byte = 2,
    Date = 3,
    DateTimeOffset = 4,
    Decimal = 5,
    Double = 6,
    Duration = 7,
    Guid = 8,
    Int16 = 9,
    Int32 = 10,
    Int64 = 11,
    SByte = 12,
    Single = 13,
    Stream = 14,
    String = 15,
    TimeOfDay = 16,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 17] = [
        Self::Binary,
        Self::Boolean,
        Self::Byte,
        Self::Date,
        Self::DateTimeOffset,
        Self::Decimal,
        Self::Double,
        Self::Duration,
        Self::Guid,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::SByte,
        Self::Single,
        Self::Stream,
        Self::String,
        Self::TimeOfDay,
    ];

    /// Unqualified name (`Int32`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Binary => "Binary",
            Self::Boolean => "Boolean",
            Self::Byte => "Byte",
            Self::Date => "Date",
            Self::DateTimeOffset => "DateTimeOffset",
            Self::Decimal => "Decimal",
            Self::Double => "Double",
            Self::Duration => "Duration",
            Self::Guid => "Guid",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::SByte => "SByte",
            Self::Single => "Single",
            Self::Stream => "Stream",
            Self::String => "String",
            Self::TimeOfDay => "TimeOfDay",
        }
    }

    /// Qualified name (`Edm.Int32`).
    pub fn full_name(self) -> String {
        format!("Edm.{}", self.name())
    }

    /// Resolve a qualified (`Edm.Int32`) or bare (`Int32`) name.
    pub fn from_name(name: &str) -> Option<Self> {
        let bare = name.strip_prefix("Edm.").unwrap_or(name);
        Self::ALL.into_iter().find(|k| k.name() == bare)
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            Self::Byte | Self::SByte | Self::Int16 | Self::Int32 | Self::Int64
        )
    }

    pub fn is_numeric(self) -> bool {
        self.is_integral() || matches!(self, Self::Decimal | Self::Double | Self::Single)
    }

    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            Self::Date | Self::DateTimeOffset | Self::Duration | Self::TimeOfDay
        )
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Edm.{}", self.name())
    }
}
