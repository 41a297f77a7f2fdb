//! Sales platform - the fixed set of channels a sale can be recorded on.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Channel a sale was made on.
///
/// Declaration order is significant: it is the tie-break order used when picking the most
/// popular platform.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Platform {
    /// Own web shop
    #[sea_orm(string_value = "Webshop")]
    Webshop,
    /// Facebook
    #[sea_orm(string_value = "Facebook")]
    Facebook,
    /// Instagram
    #[sea_orm(string_value = "Instagram")]
    Instagram,
    /// Online marketplace listing
    #[sea_orm(string_value = "Marketplace")]
    Marketplace,
    /// Anything else ("Egyéb")
    #[sea_orm(string_value = "Egyéb")]
    Other,
}

impl Platform {
    /// Label stored in the database and printed in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Webshop => "Webshop",
            Self::Facebook => "Facebook",
            Self::Instagram => "Instagram",
            Self::Marketplace => "Marketplace",
            Self::Other => "Egyéb",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_labels_match_stored_values() {
        for platform in Platform::iter() {
            assert_eq!(platform.to_value(), platform.label());
        }
        assert_eq!(Platform::Other.to_string(), "Egyéb");
    }

    #[test]
    fn test_declaration_order_is_tie_break_order() {
        let mut platforms: Vec<Platform> = Platform::iter().collect();
        platforms.reverse();
        platforms.sort();
        assert_eq!(platforms.first(), Some(&Platform::Webshop));
        assert_eq!(platforms.last(), Some(&Platform::Other));
    }
}
