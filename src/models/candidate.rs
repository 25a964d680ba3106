//! Candidate places and their category tags

use haversine::{Location as HaversineLocation, Units, distance};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Category of a point of interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Spot,
    Food,
    Cafe,
    Event,
    Shopping,
    Stay,
    Etc,
    /// Tag from the candidate source that this crate does not know
    Unknown,
}

impl Category {
    /// All known categories, in allocation priority order
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Spot,
        Category::Cafe,
        Category::Event,
        Category::Shopping,
        Category::Stay,
        Category::Etc,
        Category::Unknown,
    ];

    /// Parse an external category tag, falling back to `Unknown`
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "SPOT" => Category::Spot,
            "FOOD" => Category::Food,
            "CAFE" => Category::Cafe,
            "EVENT" => Category::Event,
            "SHOPPING" => Category::Shopping,
            "STAY" => Category::Stay,
            "ETC" => Category::Etc,
            _ => Category::Unknown,
        }
    }

    /// Upper-case tag as used by the candidate source
    #[must_use]
    pub fn as_tag(&self) -> &'static str {
        match self {
            Category::Spot => "SPOT",
            Category::Food => "FOOD",
            Category::Cafe => "CAFE",
            Category::Event => "EVENT",
            Category::Shopping => "SHOPPING",
            Category::Stay => "STAY",
            Category::Etc => "ETC",
            Category::Unknown => "UNKNOWN",
        }
    }

    /// Position in allocation order; food and spots are placed first
    #[must_use]
    pub fn priority(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(Self::ALL.len())
    }
}

/// Tags are matched case-insensitively, unknown tags become `Unknown`
impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Category::from_tag(&tag))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// A scored point of interest returned by the candidate search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Identifier assigned by the candidate source
    pub id: String,
    /// Display name, if the source provided one
    #[serde(default)]
    pub name: Option<String>,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    pub category: Category,
    /// Relevance score from the similarity search (higher is better)
    #[serde(default)]
    pub score: f64,
}

impl Candidate {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        latitude: f64,
        longitude: f64,
        category: Category,
        score: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: None,
            latitude,
            longitude,
            category,
            score,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name shown to the traveller, falling back to the id
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Great-circle distance to another candidate in meters
    #[must_use]
    pub fn distance_meters(&self, other: &Candidate) -> f64 {
        haversine_meters(self.position(), other.position())
    }

    #[must_use]
    pub fn position(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Haversine distance between two `(lat, lon)` pairs in meters
#[must_use]
pub fn haversine_meters(from: (f64, f64), to: (f64, f64)) -> f64 {
    let from = HaversineLocation {
        latitude: from.0,
        longitude: from.1,
    };
    let to = HaversineLocation {
        latitude: to.0,
        longitude: to.1,
    };
    distance(from, to, Units::Kilometers) * 1000.0
}
