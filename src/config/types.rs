use serde::{Deserialize, Serialize};
use tagforged_bmff::{OutputProfile, TextStyle};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub brand: BrandConfig,

    #[serde(default)]
    pub text_track: TextTrackConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BrandConfig {
    /// Profile used by `brand` when none is given on the command line.
    /// When unset the file extension decides.
    #[serde(default)]
    pub profile: Option<OutputProfile>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TextTrackConfig {
    /// ISO-639-2 language code
    #[serde(default = "default_language")]
    pub language: String,

    /// Time units per second
    #[serde(default = "default_timescale")]
    pub timescale: u32,

    /// Fixed track id; the next free id is used when unset
    #[serde(default)]
    pub track_id: Option<u32>,

    #[serde(default)]
    pub style: TextStyle,
}

impl Default for TextTrackConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            timescale: default_timescale(),
            track_id: None,
            style: TextStyle::default(),
        }
    }
}

fn default_language() -> String {
    tagforged_bmff::text_track::DEFAULT_LANGUAGE.to_string()
}

fn default_timescale() -> u32 {
    tagforged_bmff::text_track::DEFAULT_TIMESCALE
}
