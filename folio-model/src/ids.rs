use std::{fmt, num::ParseIntError, str::FromStr};

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(transparent)
        )]
        #[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
        pub struct $name(pub $inner);

        impl $name {
            pub const fn new(raw: $inner) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> $inner {
                self.0
            }
        }

        impl From<$inner> for $name {
            fn from(raw: $inner) -> Self {
                Self(raw)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<$inner>().map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

catalog_id!(
    /// Internal catalog identifier of an item.
    ItemId(i64)
);

catalog_id!(
    /// Identifier exposed by the legacy storefront. When no mapping exists
    /// the external id equals the internal [`ItemId`].
    LegacyItemId(i64)
);

catalog_id!(
    /// Category identifier.
    CategoryId(i64)
);

catalog_id!(
    /// Author identifier.
    AuthorId(i64)
);

catalog_id!(
    /// Publisher identifier.
    PublisherId(i64)
);

catalog_id!(
    /// Customer review identifier.
    ReviewId(i64)
);

catalog_id!(
    /// Locale of a description row.
    LanguageId(i32)
);

impl LanguageId {
    /// Locale used when nothing else is configured.
    pub const DEFAULT: LanguageId = LanguageId(1);
}

impl Default for LanguageId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ItemId {
    /// Id exposed to clients when the item has no legacy mapping.
    pub const fn as_legacy(self) -> LegacyItemId {
        LegacyItemId(self.0)
    }
}

impl LegacyItemId {
    /// Interpretation of the external id when no mapping row exists.
    pub const fn as_internal(self) -> ItemId {
        ItemId(self.0)
    }
}
