use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumString};

/// Closed set of roles a principal can hold.
///
/// Serialized as `"User"` / `"Admin"`; parsing is case-insensitive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Role::from_str(raw.trim())
            .map_err(|_| serde::de::Error::custom(format!("unknown role: {raw}")))
    }
}
