//! Mapping of upstream category names onto Ventaura event types
//!
//! Ticketmaster reports segment/genre names, Yelp reports category slugs and
//! hosts may type anything. Everything is funnelled through one static table
//! so the ranking service only ever sees the canonical set below.

/// Every event type the ranking service understands
pub const CANONICAL_TYPES: [&str; 24] = [
    "Film",
    "Science",
    "Exhibitions",
    "Theater",
    "Networking",
    "Gaming",
    "Pets",
    "Music",
    "Sports",
    "Nightlife",
    "Virtual",
    "Charity",
    "Festivals",
    "Workshops",
    "Family",
    "Holiday",
    "Wellness",
    "Community",
    "Outdoors",
    "Conferences",
    "Tours",
    "Food and Drink",
    "Comedy",
    "Other",
];

/// Fallback for anything the table does not know
pub const OTHER: &str = "Other";

/// Map a raw category name to its canonical Ventaura type
///
/// Matching is case-insensitive and ignores surrounding whitespace. Unknown
/// names map to `"Other"`.
pub fn canonical_type(raw: &str) -> &'static str {
    let key = raw.trim().to_lowercase();

    if let Some(canonical) = CANONICAL_TYPES
        .iter()
        .copied()
        .find(|t| t.eq_ignore_ascii_case(&key))
    {
        return canonical;
    }

    match key.as_str() {
        // Yelp category slugs
        "concerts" => "Music",
        "performing-arts" | "theatre" | "arts & theatre" | "musical" | "opera" | "dance" => {
            "Theater"
        }
        "visual-arts" | "fashion" | "fine art" | "museums" => "Exhibitions",
        "movies" | "cinema" => "Film",
        "lectures-books" | "education" | "seminar" => "Workshops",
        "food-and-drink" | "food & drink" | "food" | "culinary" => "Food and Drink",
        "festivals-fairs" | "festival" | "fairs & festivals" => "Festivals",
        "charities" | "fundraiser" => "Charity",
        "sports-active-life" | "fitness" | "sport" => "Sports",
        "club" | "clubs" => "Nightlife",
        "kids-family" | "children's theatre" | "children's music" => "Family",
        "stand-up" => "Comedy",

        // Ticketmaster genres that pin down a music or sports event
        "rock" | "pop" | "jazz" | "hip-hop/rap" | "country" | "classical" | "r&b"
        | "alternative" | "electronic" | "metal" | "folk" | "blues" | "latin" | "reggae" => {
            "Music"
        }
        "basketball" | "baseball" | "football" | "hockey" | "soccer" | "tennis" | "golf"
        | "boxing" | "motorsports/racing" | "wrestling" => "Sports",
        "magic & illusion" | "circus & specialty acts" => "Family",

        "technology" => "Science",
        "conference" | "expo" | "convention" => "Conferences",
        "meetup" | "business" => "Networking",
        "esports" | "video games" => "Gaming",
        "animals" => "Pets",
        "seasonal" => "Holiday",
        "yoga" | "meditation" | "health" => "Wellness",
        "volunteer" => "Community",
        "hiking" | "nature" => "Outdoors",
        "tour" | "sightseeing" | "activity" => "Tours",
        "online" | "livestream" => "Virtual",

        // Includes Ticketmaster's "Miscellaneous" and "Undefined"
        _ => OTHER,
    }
}

/// Pick the type for a Ticketmaster event from its genre and segment
///
/// The genre is tried first because it is more specific. The first
/// mapping other than `"Other"` wins.
pub fn ticketmaster_type(genre: Option<&str>, segment: Option<&str>) -> &'static str {
    [genre, segment]
        .into_iter()
        .flatten()
        .map(canonical_type)
        .find(|t| *t != OTHER)
        .unwrap_or(OTHER)
}
