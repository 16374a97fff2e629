//! Semantic fields and the one table that maps them onto tag keys.
//!
//! Typed accessors (`title()`, `track_number()`, ...), the generic tag store and
//! the guess-pattern tokens all read from `FIELDS`. Nothing else hardcodes a
//! canonical key.

use std::fmt;

/// A semantic metadata field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagField {
    Title,
    Artist,
    Album,
    Year,
    Genre,
    Composer,
    Mcn,
    Isrc,
    Encoder,
    Comment,
    TrackNumber,
    TrackTotal,
    DiscNumber,
    DiscTotal,
    Compilation,
    Custom,
}

/// How a field's text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Number,
    Flag,
}

struct FieldRow {
    field: TagField,
    key: &'static str,
    token: &'static str,
    kind: ValueKind,
}

// Order must follow the enum declaration (looked up by discriminant).
static FIELDS: [FieldRow; 16] = [
    FieldRow { field: TagField::Title, key: "TITLE", token: "title", kind: ValueKind::Text },
    FieldRow { field: TagField::Artist, key: "ARTIST", token: "artist", kind: ValueKind::Text },
    FieldRow { field: TagField::Album, key: "ALBUM", token: "album", kind: ValueKind::Text },
    FieldRow { field: TagField::Year, key: "DATE", token: "year", kind: ValueKind::Number },
    FieldRow { field: TagField::Genre, key: "GENRE", token: "genre", kind: ValueKind::Text },
    FieldRow { field: TagField::Composer, key: "COMPOSER", token: "composer", kind: ValueKind::Text },
    FieldRow { field: TagField::Mcn, key: "MCN", token: "MCN", kind: ValueKind::Text },
    FieldRow { field: TagField::Isrc, key: "ISRC", token: "ISRC", kind: ValueKind::Text },
    FieldRow { field: TagField::Encoder, key: "ENCODER", token: "encoder", kind: ValueKind::Text },
    FieldRow { field: TagField::Comment, key: "COMMENT", token: "comment", kind: ValueKind::Text },
    FieldRow { field: TagField::TrackNumber, key: "TRACKNUMBER", token: "trackNumber", kind: ValueKind::Number },
    FieldRow { field: TagField::TrackTotal, key: "TRACKTOTAL", token: "trackTotal", kind: ValueKind::Number },
    FieldRow { field: TagField::DiscNumber, key: "DISCNUMBER", token: "discNumber", kind: ValueKind::Number },
    FieldRow { field: TagField::DiscTotal, key: "DISCTOTAL", token: "discTotal", kind: ValueKind::Number },
    FieldRow { field: TagField::Compilation, key: "COMPILATION", token: "compilation", kind: ValueKind::Flag },
    FieldRow { field: TagField::Custom, key: "CUSTOM", token: "custom", kind: ValueKind::Text },
];

impl TagField {
    pub const ALL: [TagField; 16] = [
        TagField::Title,
        TagField::Artist,
        TagField::Album,
        TagField::Year,
        TagField::Genre,
        TagField::Composer,
        TagField::Mcn,
        TagField::Isrc,
        TagField::Encoder,
        TagField::Comment,
        TagField::TrackNumber,
        TagField::TrackTotal,
        TagField::DiscNumber,
        TagField::DiscTotal,
        TagField::Compilation,
        TagField::Custom,
    ];

    fn row(self) -> &'static FieldRow {
        &FIELDS[self as usize]
    }

    /// Canonical tag key, before any per-file aliasing.
    pub fn key(self) -> &'static str {
        self.row().key
    }

    /// Placeholder name used in guess patterns (`[trackNumber]`).
    pub fn token(self) -> &'static str {
        self.row().token
    }

    pub fn kind(self) -> ValueKind {
        self.row().kind
    }

    pub fn from_token(token: &str) -> Option<TagField> {
        FIELDS.iter().find(|s| s.token == token).map(|s| s.field)
    }

    pub fn from_key(key: &str) -> Option<TagField> {
        FIELDS.iter().find(|s| s.key == key).map(|s| s.field)
    }
}

impl fmt::Display for TagField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
