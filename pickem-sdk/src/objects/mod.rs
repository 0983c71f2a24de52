use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub mod default_pick;
pub mod league;
pub mod pick;
pub mod user_team;
pub mod week;

pub use default_pick::DefaultPickMessage;
pub use league::LeagueMessage;
pub use pick::{PickDetailMessage, PickMessage};
pub use user_team::UserTeamMessage;
pub use week::WeekMessage;

/// Lifecycle marker carried by every entity message.
///
/// Producers have sent both the integer ordinal (0/1/2) and the name in
/// mixed case, so deserialization accepts either form. Serialization
/// always emits the upper-case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreatedStatus {
    New,
    Update,
    Delete,
}

impl CreatedStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CreatedStatus::New => "NEW",
            CreatedStatus::Update => "UPDATE",
            CreatedStatus::Delete => "DELETE",
        }
    }

    fn from_ordinal(value: u64) -> Option<Self> {
        match value {
            0 => Some(CreatedStatus::New),
            1 => Some(CreatedStatus::Update),
            2 => Some(CreatedStatus::Delete),
            _ => None,
        }
    }

    fn from_name(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("new") {
            Some(CreatedStatus::New)
        } else if value.eq_ignore_ascii_case("update") {
            Some(CreatedStatus::Update)
        } else if value.eq_ignore_ascii_case("delete") {
            Some(CreatedStatus::Delete)
        } else {
            None
        }
    }
}

impl Serialize for CreatedStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CreatedStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StatusVisitor;

        impl Visitor<'_> for StatusVisitor {
            type Value = CreatedStatus;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a created-status ordinal (0-2) or name")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<CreatedStatus, E> {
                CreatedStatus::from_ordinal(v)
                    .ok_or_else(|| E::custom(format!("unknown status ordinal {v}")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<CreatedStatus, E> {
                u64::try_from(v)
                    .ok()
                    .and_then(CreatedStatus::from_ordinal)
                    .ok_or_else(|| E::custom(format!("unknown status ordinal {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<CreatedStatus, E> {
                CreatedStatus::from_name(v)
                    .ok_or_else(|| E::custom(format!("unknown status name {v:?}")))
            }
        }

        deserializer.deserialize_any(StatusVisitor)
    }
}

/// Outcome flag on a pick detail.
///
/// Same dual wire form as [`CreatedStatus`]: ordinal or name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickWin {
    None,
    Won,
    Lost,
}

impl PickWin {
    pub fn as_str(self) -> &'static str {
        match self {
            PickWin::None => "NONE",
            PickWin::Won => "WON",
            PickWin::Lost => "LOST",
        }
    }

    /// The ordinal stored in the `is_correct` column.
    pub fn as_ordinal(self) -> i32 {
        match self {
            PickWin::None => 0,
            PickWin::Won => 1,
            PickWin::Lost => 2,
        }
    }

    fn from_ordinal(value: u64) -> Option<Self> {
        match value {
            0 => Some(PickWin::None),
            1 => Some(PickWin::Won),
            2 => Some(PickWin::Lost),
            _ => None,
        }
    }

    fn from_name(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("none") {
            Some(PickWin::None)
        } else if value.eq_ignore_ascii_case("won") {
            Some(PickWin::Won)
        } else if value.eq_ignore_ascii_case("lost") {
            Some(PickWin::Lost)
        } else {
            None
        }
    }
}

impl Serialize for PickWin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PickWin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PickWinVisitor;

        impl Visitor<'_> for PickWinVisitor {
            type Value = PickWin;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a pick-win ordinal (0-2) or name")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<PickWin, E> {
                PickWin::from_ordinal(v)
                    .ok_or_else(|| E::custom(format!("unknown pick-win ordinal {v}")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<PickWin, E> {
                u64::try_from(v)
                    .ok()
                    .and_then(PickWin::from_ordinal)
                    .ok_or_else(|| E::custom(format!("unknown pick-win ordinal {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<PickWin, E> {
                PickWin::from_name(v).ok_or_else(|| E::custom(format!("unknown pick-win name {v:?}")))
            }
        }

        deserializer.deserialize_any(PickWinVisitor)
    }
}
