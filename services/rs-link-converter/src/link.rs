//!
//! src/link.rs  Andrew Belles  Oct 18th, 2026
//!
//! Pulls the entity kind and platform id out of shared links, e.g.
//!   tidal.com/browse/track/126102208?u
//!   https://open.spotify.com/album/6JLO3HVtVEKLHqbgs6ujdw?si=X0bMCF
//!   spotify:track:3tYxhPqkioZEV5el3DJxLQ
//!

use url::Url;

use crate::errors::ConvertError;
use crate::types::{EntityKind, StreamingPlatform};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedLink {
    pub platform: StreamingPlatform,
    pub kind: EntityKind,
    pub id: String
}

fn kind_of(segment: &str) -> Option<EntityKind> {
    match segment {
        "track" => Some(EntityKind::Track),
        "album" => Some(EntityKind::Album),
        _ => None
    }
}

fn platform_of(host: &str) -> Option<StreamingPlatform> {
    let host = host.to_ascii_lowercase();
    let matches = |domain: &str| host == domain || host.ends_with(&format!(".{domain}"));

    if matches("spotify.com") {
        Some(StreamingPlatform::Spotify)
    } else if matches("tidal.com") {
        Some(StreamingPlatform::Tidal)
    } else {
        None
    }
}

/// Platform ids are plain ascii alphanumerics on both catalogs
pub(crate) fn valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// spotify:track:<id>
fn parse_uri(raw: &str) -> Result<SharedLink, ConvertError> {
    let mut parts = raw.split(':').skip(1);
    let kind = parts.next().and_then(kind_of);
    let id = parts.next();

    match (kind, id, parts.next()) {
        (Some(kind), Some(id), None) if valid_id(id) => Ok( SharedLink {
            platform: StreamingPlatform::Spotify,
            kind,
            id: id.to_string()
        }),
        _ => Err(ConvertError::InvalidLink(raw.to_string()))
    }
}

///
/// Parses a shared link. The id has to agree with the host: a spotify link
/// carrying an all digit id would be routed to tidal by the classifier, so
/// it is rejected instead.
///
pub fn parse(raw: &str) -> Result<SharedLink, ConvertError> {
    let raw = raw.trim();
    if raw.starts_with("spotify:") {
        return parse_uri(raw);
    }

    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw.trim_start_matches('/'))
    };

    let url = Url::parse(&with_scheme)
        .map_err(|e| ConvertError::InvalidLink(format!("{raw}: {e}")))?;

    let platform = url.host_str()
        .and_then(platform_of)
        .ok_or_else(|| ConvertError::InvalidLink(format!("{raw}: unsupported host")))?;

    let segments: Vec<&str> = url.path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();

    let (kind, id) = segments.windows(2)
        .find_map(|pair| kind_of(pair[0]).map(|kind| (kind, pair[1])))
        .ok_or_else(|| ConvertError::InvalidLink(
            format!("{raw}: expected a track or album link")
        ))?;

    if !valid_id(id) {
        return Err(ConvertError::InvalidLink(format!("{raw}: bad id {id}")));
    }
    if StreamingPlatform::classify(id) != platform {
        return Err(ConvertError::InvalidLink(
            format!("{raw}: id {id} does not look like a {platform} id")
        ));
    }

    Ok( SharedLink { platform, kind, id: id.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tidal_browse_links() {
        let link = parse("https://tidal.com/browse/track/126102208?u").unwrap();
        assert_eq!(link, SharedLink {
            platform: StreamingPlatform::Tidal,
            kind: EntityKind::Track,
            id: "126102208".to_string()
        });

        let link = parse("tidal.com/browse/album/126102201?u").unwrap();
        assert_eq!(link.kind, EntityKind::Album);
        assert_eq!(link.id, "126102201");

        let link = parse("/tidal.com/browse/track/391366623?u").unwrap();
        assert_eq!(link.id, "391366623");

        let link = parse("https://listen.tidal.com/album/126102201").unwrap();
        assert_eq!(link.platform, StreamingPlatform::Tidal);
    }

    #[test]
    fn spotify_links_and_uris() {
        let link = parse(
            "https://open.spotify.com/track/3tYxhPqkioZEV5el3DJxLQ?si=56e840f23942422f"
        ).unwrap();
        assert_eq!(link, SharedLink {
            platform: StreamingPlatform::Spotify,
            kind: EntityKind::Track,
            id: "3tYxhPqkioZEV5el3DJxLQ".to_string()
        });

        let link = parse("open.spotify.com/intl-de/album/6JLO3HVtVEKLHqbgs6ujdw").unwrap();
        assert_eq!(link.kind, EntityKind::Album);
        assert_eq!(link.id, "6JLO3HVtVEKLHqbgs6ujdw");

        let link = parse("spotify:album:6JLO3HVtVEKLHqbgs6ujdw").unwrap();
        assert_eq!(link.kind, EntityKind::Album);
    }

    #[test]
    fn rejects_unsupported_links() {
        for raw in [
            "https://tidal.com/browse/artist/5839856?u",
            "https://open.spotify.com/artist/1IHjrY7ygKbmLVoUV1VcXc",
            "https://music.example.com/track/123",
            "https://notspotify.com/track/3tYxhPqkioZEV5el3DJxLQ",
            "https://tidal.com/browse/track/",
            "spotify:track:",
            "spotify:playlist:37i9dQZF1DXcBWIGoYBM5M",
            "https://open.spotify.com/track/12345",
            "https://tidal.com/browse/track/abc",
        ] {
            assert!(
                matches!(parse(raw), Err(ConvertError::InvalidLink(_))),
                "{raw} should be rejected"
            );
        }
    }
}
