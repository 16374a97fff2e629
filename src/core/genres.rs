//! The standard ID3v1 genre list.
//! Index = numeric genre code, as found in old `(17)` style TCON values.

pub const ID3V1_GENRES: [&str; 80] = [
    "Blues",
    "Classic Rock",
    "Country",
    "Dance",
    "Disco",
    "Funk",
    "Grunge",
    "Hip-Hop",
    "Jazz",
    "Metal",
    "New Age",
    "Oldies",
    "Other",
    "Pop",
    "R&B",
    "Rap",
    "Reggae",
    "Rock",
    "Techno",
    "Industrial",
    "Alternative",
    "Ska",
    "Death Metal",
    "Pranks",
    "Soundtrack",
    "Euro-Techno",
    "Ambient",
    "Trip-Hop",
    "Vocal",
    "Jazz+Funk",
    "Fusion",
    "Trance",
    "Classical",
    "Instrumental",
    "Acid",
    "House",
    "Game",
    "Sound Clip",
    "Gospel",
    "Noise",
    "AlternRock",
    "Bass",
    "Soul",
    "Punk",
    "Space",
    "Meditative",
    "Instrumental Pop",
    "Instrumental Rock",
    "Ethnic",
    "Gothic",
    "Darkwave",
    "Techno-Industrial",
    "Electronic",
    "Pop-Folk",
    "Eurodance",
    "Dream",
    "Southern Rock",
    "Comedy",
    "Cult",
    "Gangsta",
    "Top 40",
    "Christian Rap",
    "Pop/Funk",
    "Jungle",
    "Native American",
    "Cabaret",
    "New Wave",
    "Psychadelic",
    "Rave",
    "Showtunes",
    "Trailer",
    "Lo-Fi",
    "Tribal",
    "Acid Punk",
    "Acid Jazz",
    "Polka",
    "Retro",
    "Musical",
    "Rock & Roll",
    "Hard Rock",
];

/// Genre names sorted for display.
pub fn sorted_genres() -> Vec<&'static str> {
    let mut out = ID3V1_GENRES.to_vec();
    out.sort_unstable_by_key(|g| g.to_ascii_lowercase());
    out
}

/// Resolve a numeric genre reference like `17` or `(17)` to its name.
/// Anything else (including real names) returns None.
pub fn genre_by_code(s: &str) -> Option<&'static str> {
    let s = s.trim();
    let s = s
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(s);

    let code = s.parse::<usize>().ok()?;
    ID3V1_GENRES.get(code).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_codes_resolve() {
        assert_eq!(genre_by_code("17"), Some("Rock"));
        assert_eq!(genre_by_code("(0)"), Some("Blues"));
        assert_eq!(genre_by_code("(200)"), None);
        assert_eq!(genre_by_code("Rock"), None);
    }

    #[test]
    fn sorted_list_is_complete() {
        let genres = sorted_genres();
        assert_eq!(genres.len(), 80);
        assert_eq!(genres[0], "Acid");
    }
}
