//! Upstream payloads and the reshaped responses built from them

use serde::{Deserialize, Serialize};

/// Status reported when Spotify has no active playback.
pub const NOTHING_PLAYING: &str = "Nothing is playing";

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub name: String,
}

/// Track object as returned by the Web API. Only the fields the proxy
/// reshapes are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub name: String,
    #[serde(default)]
    pub uri: String,
    /// Episodes carry no artists
    #[serde(default)]
    pub artists: Vec<Artist>,
}

/// One page of a paged Web API listing.
#[derive(Debug, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
}

/// Body of `GET /me/player/currently-playing` when it answers 200.
#[derive(Debug, Deserialize)]
pub struct CurrentlyPlaying {
    #[serde(default)]
    pub is_playing: bool,
    pub item: Option<Track>,
}

/// Body of `PUT /me/player/play`. A missing uri is forwarded as `null`.
#[derive(Debug, Serialize)]
pub struct PlayRequest<'a> {
    pub uris: Vec<Option<&'a str>>,
}

/// Artist names joined with `", "`.
pub fn join_artists(artists: &[Artist]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reshaped track returned by `/spotify/top-tracks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub name: String,
    pub artist: String,
    pub uri: String,
}

impl From<&Track> for TrackSummary {
    fn from(track: &Track) -> Self {
        Self {
            name: track.name.clone(),
            artist: join_artists(&track.artists),
            uri: track.uri.clone(),
        }
    }
}

/// Response of `/spotify/now-playing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NowPlaying {
    Idle {
        status: String,
    },
    Track {
        name: String,
        artist: String,
        is_playing: bool,
    },
}

impl NowPlaying {
    pub fn nothing() -> Self {
        NowPlaying::Idle {
            status: NOTHING_PLAYING.to_string(),
        }
    }

    /// `None` is the 204 case. A playback without an item (private
    /// session, ad break) is reported the same way.
    pub fn from_playback(playback: Option<CurrentlyPlaying>) -> Self {
        match playback {
            Some(CurrentlyPlaying {
                is_playing,
                item: Some(track),
            }) => NowPlaying::Track {
                artist: join_artists(&track.artists),
                name: track.name,
                is_playing,
            },
            _ => NowPlaying::nothing(),
        }
    }
}
