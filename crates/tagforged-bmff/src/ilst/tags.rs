//! Well-known iTunes tag keys and their values.

use crate::bmff::AtomType;
use crate::{Error, Result};
use std::collections::BTreeMap;

/// `data` atom type codes used by the tags below.
pub mod data_type {
    /// Implicit / binary (used for `trkn` and `disk` pairs).
    pub const IMPLICIT: u32 = 0;
    /// UTF-8 text.
    pub const UTF8: u32 = 1;
    /// JPEG image.
    pub const JPEG: u32 = 13;
    /// PNG image.
    pub const PNG: u32 = 14;
    /// Big-endian signed integer.
    pub const INTEGER: u32 = 21;
}

/// The kind of value a tag key carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Text,
    Integer,
    Pair,
    Image,
}

/// Well-known metadata keys, declared in the order they are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagKey {
    Title,
    Artist,
    Genre,
    Date,
    Lyrics,
    TvShow,
    TvEpisodeId,
    SortName,
    SortArtist,
    SortAlbum,
    Season,
    Episode,
    MediaKind,
    HdVideo,
    Hevc,
    HdrVideo,
    Rating,
    Gapless,
    Compilation,
    TrackNumber,
    DiscNumber,
    Cover,
}

impl TagKey {
    /// Every key, in write order.
    pub const ALL: [TagKey; 22] = [
        TagKey::Title,
        TagKey::Artist,
        TagKey::Genre,
        TagKey::Date,
        TagKey::Lyrics,
        TagKey::TvShow,
        TagKey::TvEpisodeId,
        TagKey::SortName,
        TagKey::SortArtist,
        TagKey::SortAlbum,
        TagKey::Season,
        TagKey::Episode,
        TagKey::MediaKind,
        TagKey::HdVideo,
        TagKey::Hevc,
        TagKey::HdrVideo,
        TagKey::Rating,
        TagKey::Gapless,
        TagKey::Compilation,
        TagKey::TrackNumber,
        TagKey::DiscNumber,
        TagKey::Cover,
    ];

    /// The atom type naming this tag inside `ilst`.
    pub fn atom_type(self) -> AtomType {
        AtomType(match self {
            TagKey::Title => *b"\xa9nam",
            TagKey::Artist => *b"\xa9ART",
            TagKey::Genre => *b"\xa9gen",
            TagKey::Date => *b"\xa9day",
            TagKey::Lyrics => *b"\xa9lyr",
            TagKey::TvShow => *b"tvsh",
            TagKey::TvEpisodeId => *b"tven",
            TagKey::SortName => *b"sonm",
            TagKey::SortArtist => *b"soar",
            TagKey::SortAlbum => *b"soal",
            TagKey::Season => *b"tvsn",
            TagKey::Episode => *b"tves",
            TagKey::MediaKind => *b"stik",
            TagKey::HdVideo => *b"hdvd",
            TagKey::Hevc => *b"hevc",
            TagKey::HdrVideo => *b"hdrv",
            TagKey::Rating => *b"rtng",
            TagKey::Gapless => *b"pgap",
            TagKey::Compilation => *b"cpil",
            TagKey::TrackNumber => *b"trkn",
            TagKey::DiscNumber => *b"disk",
            TagKey::Cover => *b"covr",
        })
    }

    /// Look up the key for an `ilst` child type.
    pub fn from_atom_type(atom_type: AtomType) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.atom_type() == atom_type)
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            TagKey::Title => "title",
            TagKey::Artist => "artist",
            TagKey::Genre => "genre",
            TagKey::Date => "date",
            TagKey::Lyrics => "lyrics",
            TagKey::TvShow => "tv_show",
            TagKey::TvEpisodeId => "tv_episode_id",
            TagKey::SortName => "sort_name",
            TagKey::SortArtist => "sort_artist",
            TagKey::SortAlbum => "sort_album",
            TagKey::Season => "season",
            TagKey::Episode => "episode",
            TagKey::MediaKind => "media_kind",
            TagKey::HdVideo => "hd_video",
            TagKey::Hevc => "hevc",
            TagKey::HdrVideo => "hdr_video",
            TagKey::Rating => "rating",
            TagKey::Gapless => "gapless",
            TagKey::Compilation => "compilation",
            TagKey::TrackNumber => "track_number",
            TagKey::DiscNumber => "disc_number",
            TagKey::Cover => "cover",
        }
    }

    /// The value kind this key accepts.
    pub fn kind(self) -> TagKind {
        match self {
            TagKey::Title
            | TagKey::Artist
            | TagKey::Genre
            | TagKey::Date
            | TagKey::Lyrics
            | TagKey::TvShow
            | TagKey::TvEpisodeId
            | TagKey::SortName
            | TagKey::SortArtist
            | TagKey::SortAlbum => TagKind::Text,
            TagKey::Season
            | TagKey::Episode
            | TagKey::MediaKind
            | TagKey::HdVideo
            | TagKey::Hevc
            | TagKey::HdrVideo
            | TagKey::Rating
            | TagKey::Gapless
            | TagKey::Compilation => TagKind::Integer,
            TagKey::TrackNumber | TagKey::DiscNumber => TagKind::Pair,
            TagKey::Cover => TagKind::Image,
        }
    }
}

impl std::fmt::Display for TagKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Cover art encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Jpeg,
    Png,
}

impl ImageFormat {
    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    /// Guess the format from the leading bytes; anything not PNG is JPEG.
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(&Self::PNG_SIGNATURE) {
            Self::Png
        } else {
            Self::Jpeg
        }
    }

    /// The `data` atom type code.
    pub fn data_type(self) -> u32 {
        match self {
            Self::Jpeg => data_type::JPEG,
            Self::Png => data_type::PNG,
        }
    }
}

/// A tag value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    Text(String),
    Integer(i32),
    /// Index and total, as used by track and disc numbers.
    Pair { index: u16, total: u16 },
    Image { format: ImageFormat, data: Vec<u8> },
}

impl TagValue {
    /// Cover image with the format sniffed from its bytes.
    pub fn image(data: Vec<u8>) -> Self {
        Self::Image {
            format: ImageFormat::detect(&data),
            data,
        }
    }

    /// The kind of this value.
    pub fn kind(&self) -> TagKind {
        match self {
            Self::Text(_) => TagKind::Text,
            Self::Integer(_) => TagKind::Integer,
            Self::Pair { .. } => TagKind::Pair,
            Self::Image { .. } => TagKind::Image,
        }
    }

    /// Borrow the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for TagValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for TagValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i32> for TagValue {
    fn from(n: i32) -> Self {
        Self::Integer(n)
    }
}

/// A set of tags keyed by [`TagKey`]. Iteration follows write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    entries: BTreeMap<TagKey, TagValue>,
}

impl Tags {
    /// Create an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a tag, returning the previous value.
    ///
    /// Fails if the value kind does not match the key.
    pub fn insert(&mut self, key: TagKey, value: impl Into<TagValue>) -> Result<Option<TagValue>> {
        let value = value.into();
        if value.kind() != key.kind() {
            return Err(Error::invalid_input(format!(
                "{} expects a {:?} value, got {:?}",
                key,
                key.kind(),
                value.kind()
            )));
        }
        Ok(self.entries.insert(key, value))
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: TagKey, value: impl Into<TagValue>) -> Result<Self> {
        self.insert(key, value)?;
        Ok(self)
    }

    /// Get a tag.
    pub fn get(&self, key: TagKey) -> Option<&TagValue> {
        self.entries.get(&key)
    }

    /// Get a text tag.
    pub fn text(&self, key: TagKey) -> Option<&str> {
        self.get(key).and_then(TagValue::as_text)
    }

    /// Number of tags set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tags are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in write order.
    pub fn iter(&self) -> impl Iterator<Item = (TagKey, &TagValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    // Used by the reader, which has already matched kind to data type.
    pub(crate) fn insert_unchecked(&mut self, key: TagKey, value: TagValue) {
        self.entries.insert(key, value);
    }
}
