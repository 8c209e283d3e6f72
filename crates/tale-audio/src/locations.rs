use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::AudioError;

/// Key of the mandatory fallback track.
pub const DEFAULT_LOCATION: &str = "default";

const BUILTIN_TRACKS: &[(&str, &str)] = &[
    ("village_of_meadowbrook", "audio/peaceful_village.mp3"),
    ("forest_of_whispers", "audio/mysterious_forest.mp3"),
    ("ancient_ruins", "audio/dark_ruins.mp3"),
    ("mountain_pass", "audio/epic_mountains.mp3"),
    ("tavern", "audio/tavern_music.mp3"),
    ("castle", "audio/royal_castle.mp3"),
    ("cave", "audio/cave_ambience.mp3"),
    ("beach", "audio/ocean_waves.mp3"),
    ("dark_forest", "audio/dark_forest.mp3"),
    (DEFAULT_LOCATION, "audio/adventure_theme.mp3"),
];

/// Maps location identifiers to the music asset played there.
///
/// Immutable once built; always carries a `default` track used for any
/// location without an explicit entry.
#[derive(Debug, Clone)]
pub struct LocationMusicMap {
    tracks: HashMap<String, PathBuf>,
    default: PathBuf,
}

impl LocationMusicMap {
    /// Build a map from explicit entries. One of them must be `default`.
    pub fn new<I, K, P>(entries: I) -> Result<Self, AudioError>
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<PathBuf>,
    {
        let mut tracks: HashMap<String, PathBuf> = entries
            .into_iter()
            .map(|(location, path)| (location.into(), path.into()))
            .collect();
        let default = tracks
            .remove(DEFAULT_LOCATION)
            .ok_or(AudioError::MissingDefault)?;
        Ok(Self { tracks, default })
    }

    /// The built-in table shipped with the client.
    pub fn builtin() -> Self {
        let mut tracks: HashMap<String, PathBuf> = BUILTIN_TRACKS
            .iter()
            .map(|(location, path)| (location.to_string(), PathBuf::from(path)))
            .collect();
        let default = tracks
            .remove(DEFAULT_LOCATION)
            .unwrap_or_else(|| PathBuf::from("audio/adventure_theme.mp3"));
        Self { tracks, default }
    }

    /// The built-in table with entries added or replaced by `overrides`.
    pub fn with_overrides<I, K, P>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<PathBuf>,
    {
        let mut map = Self::builtin();
        for (location, path) in overrides {
            let location = location.into();
            let path = path.into();
            if location == DEFAULT_LOCATION {
                map.default = path;
            } else {
                map.tracks.insert(location, path);
            }
        }
        map
    }

    /// Track for `location`, falling back to the default track.
    pub fn resolve(&self, location: &str) -> &Path {
        self.tracks.get(location).unwrap_or(&self.default)
    }
}

impl Default for LocationMusicMap {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_all_locations() {
        let map = LocationMusicMap::builtin();
        for (location, path) in BUILTIN_TRACKS {
            assert_eq!(map.resolve(location), Path::new(path), "{location}");
        }
        assert_eq!(map.resolve("tavern"), Path::new("audio/tavern_music.mp3"));
        assert_eq!(map.resolve(DEFAULT_LOCATION), Path::new("audio/adventure_theme.mp3"));
    }

    #[test]
    fn unmapped_locations_use_default() {
        let map = LocationMusicMap::builtin();
        for location in ["swamp", "", "TAVERN", "sky_island"] {
            assert_eq!(map.resolve(location), Path::new("audio/adventure_theme.mp3"), "{location}");
        }
    }

    #[test]
    fn new_requires_default() {
        let err = LocationMusicMap::new([("cave", "cave.ogg")]).unwrap_err();
        assert!(matches!(err, AudioError::MissingDefault));

        let map = LocationMusicMap::new([("cave", "cave.ogg"), ("default", "main.ogg")]).unwrap();
        assert_eq!(map.resolve("cave"), Path::new("cave.ogg"));
        assert_eq!(map.resolve("beach"), Path::new("main.ogg"));
    }

    #[test]
    fn overrides_replace_and_extend() {
        let map = LocationMusicMap::with_overrides([
            ("tavern", "custom/tavern.ogg"),
            ("swamp", "custom/swamp.ogg"),
            ("default", "custom/theme.ogg"),
        ]);
        assert_eq!(map.resolve("tavern"), Path::new("custom/tavern.ogg"));
        assert_eq!(map.resolve("swamp"), Path::new("custom/swamp.ogg"));
        assert_eq!(map.resolve("nowhere"), Path::new("custom/theme.ogg"));
        assert_eq!(map.resolve("cave"), Path::new("audio/cave_ambience.mp3"));
    }
}
