use std::fmt;

use serde::{Deserialize, Serialize};

use super::AttrValue;

/// The closed set of record kinds the console knows how to build.
///
/// Every path that turns user text or a persisted `__class__` tag into a
/// record goes through [`ClassName::from_str`]; there is no other way to
/// name a kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ClassName {
    BaseModel,
    User,
    State,
    City,
    Amenity,
    Place,
    Review,
}

impl ClassName {
    pub const ALL: [ClassName; 7] = [
        Self::BaseModel,
        Self::User,
        Self::State,
        Self::City,
        Self::Amenity,
        Self::Place,
        Self::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BaseModel => "BaseModel",
            Self::User => "User",
            Self::State => "State",
            Self::City => "City",
            Self::Amenity => "Amenity",
            Self::Place => "Place",
            Self::Review => "Review",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "BaseModel" => Some(Self::BaseModel),
            "User" => Some(Self::User),
            "State" => Some(Self::State),
            "City" => Some(Self::City),
            "Amenity" => Some(Self::Amenity),
            "Place" => Some(Self::Place),
            "Review" => Some(Self::Review),
            _ => None,
        }
    }

    /// Default attributes a fresh record of this kind starts with.
    pub fn defaults(&self) -> Vec<(&'static str, AttrValue)> {
        let empty = || AttrValue::String(String::new());
        match self {
            Self::BaseModel => vec![],
            Self::User => vec![
                ("email", empty()),
                ("password", empty()),
                ("first_name", empty()),
                ("last_name", empty()),
            ],
            Self::State => vec![("name", empty())],
            Self::City => vec![("state_id", empty()), ("name", empty())],
            Self::Amenity => vec![("name", empty())],
            Self::Place => vec![
                ("city_id", empty()),
                ("user_id", empty()),
                ("name", empty()),
                ("description", empty()),
                ("number_rooms", AttrValue::Integer(0)),
                ("number_bathrooms", AttrValue::Integer(0)),
                ("max_guest", AttrValue::Integer(0)),
                ("price_by_night", AttrValue::Integer(0)),
                ("latitude", AttrValue::Float(0.0)),
                ("longitude", AttrValue::Float(0.0)),
                ("amenity_ids", AttrValue::StringList(Vec::new())),
            ],
            Self::Review => vec![
                ("place_id", empty()),
                ("user_id", empty()),
                ("text", empty()),
            ],
        }
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
