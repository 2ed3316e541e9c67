//!
//! src/types.rs  Andrew Belles  Oct 18th, 2026
//!
//! Identifier and value types shared by the catalog clients
//! and the converter
//!

use std::fmt;

use serde::{Deserialize, Serialize};

/// Platforms the converter can translate between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamingPlatform {
    Tidal,
    Spotify
}

impl StreamingPlatform {
    ///
    /// Attributes an id to a platform by its shape alone.
    /// Tidal ids are decimal (126102208), anything else is treated as a
    /// spotify base62 id (3tYxhPqkioZEV5el3DJxLQ). Never fails, so a
    /// malformed id simply lands on spotify.
    ///
    pub fn classify(id: &str) -> Self {
        if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
            StreamingPlatform::Tidal
        } else {
            StreamingPlatform::Spotify
        }
    }

    /// The platform queried for the equivalent resource
    pub fn counterpart(self) -> Self {
        match self {
            StreamingPlatform::Tidal => StreamingPlatform::Spotify,
            StreamingPlatform::Spotify => StreamingPlatform::Tidal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StreamingPlatform::Tidal => "tidal",
            StreamingPlatform::Spotify => "spotify"
        }
    }
}

impl fmt::Display for StreamingPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Track,
    Album
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Track => "track",
            EntityKind::Album => "album"
        }
    }
}

// International standard recording code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Isrc(pub String);

// Universal product code (barcode) of a release
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Upc(pub String);

impl fmt::Display for Isrc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Upc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumInfo {
    pub artist: String,
    pub album_name: String,
    pub release_date: String,
    pub upc: Upc
}

/// Body returned by the convert endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub links: Vec<String>
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_are_tidal() {
        for id in ["126102208", "0", "391366623", "5839856"] {
            assert_eq!(StreamingPlatform::classify(id), StreamingPlatform::Tidal);
        }
    }

    #[test]
    fn other_ids_are_spotify() {
        for id in ["3tYxhPqkioZEV5el3DJxLQ", "6JLO3HVtVEKLHqbgs6ujdw", "12a", "", " 12", "١٢٣"] {
            assert_eq!(StreamingPlatform::classify(id), StreamingPlatform::Spotify);
        }
    }

    #[test]
    fn counterpart_is_never_origin() {
        for p in [StreamingPlatform::Tidal, StreamingPlatform::Spotify] {
            assert_ne!(p.counterpart(), p);
            assert_eq!(p.counterpart().counterpart(), p);
        }
    }

    #[test]
    fn convert_response_wire_shape() {
        let body = ConvertResponse { links: vec!["https://tidal.com/browse/track/1".into()] };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "links": ["https://tidal.com/browse/track/1"] }));
    }
}
