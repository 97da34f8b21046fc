//! Defensive decoding of upstream payloads into domain records.
//!
//! Only a body that is not JSON at all fails. Everything below that is
//! tolerated: list elements that do not decode are dropped (and counted),
//! nested collections fall back to empty, scalar fields fall back to defaults.

mod fields;

use crate::error::DecodeError;
use catalog_models::{Country, Episode, Genre, Season, Source, Title, TitleKind, UNKNOWN_TITLE};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Outcome of decoding a list payload
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub items: Vec<T>,
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct RawPoster {
    #[serde(deserialize_with = "fields::id")]
    id: i64,
    #[serde(default, rename = "type", deserialize_with = "fields::opt_string")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "fields::opt_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "fields::string_or_empty")]
    description: String,
    #[serde(default, deserialize_with = "fields::year")]
    year: u32,
    #[serde(default, deserialize_with = "fields::float_or_zero")]
    imdb: f32,
    #[serde(default, deserialize_with = "fields::float_or_zero")]
    rating: f32,
    #[serde(default, deserialize_with = "fields::duration")]
    duration: Option<String>,
    #[serde(default, deserialize_with = "fields::string_or_empty")]
    image: String,
    #[serde(default, deserialize_with = "fields::string_or_empty")]
    cover: String,
    #[serde(default, deserialize_with = "fields::tolerant_vec")]
    genres: Vec<RawGenre>,
    #[serde(default, alias = "countries", deserialize_with = "fields::tolerant_vec")]
    country: Vec<RawCountry>,
    #[serde(default, deserialize_with = "fields::tolerant_vec")]
    sources: Vec<RawSource>,
}

#[derive(Debug, Deserialize)]
struct RawGenre {
    #[serde(deserialize_with = "fields::id")]
    id: i64,
    #[serde(default, deserialize_with = "fields::string_or_empty")]
    title: String,
}

#[derive(Debug, Deserialize)]
struct RawCountry {
    #[serde(deserialize_with = "fields::id")]
    id: i64,
    #[serde(default, deserialize_with = "fields::string_or_empty")]
    title: String,
    #[serde(default, deserialize_with = "fields::string_or_empty")]
    image: String,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    #[serde(deserialize_with = "fields::id")]
    id: i64,
    #[serde(default, deserialize_with = "fields::string_or_empty")]
    quality: String,
    #[serde(default, rename = "type", deserialize_with = "fields::string_or_empty")]
    kind: String,
    #[serde(deserialize_with = "fields::required_string")]
    url: String,
}

#[derive(Debug, Deserialize)]
struct RawSeason {
    #[serde(deserialize_with = "fields::id")]
    id: i64,
    #[serde(default, deserialize_with = "fields::string_or_empty")]
    title: String,
    #[serde(default, deserialize_with = "fields::tolerant_vec")]
    episodes: Vec<RawEpisode>,
}

#[derive(Debug, Deserialize)]
struct RawEpisode {
    #[serde(deserialize_with = "fields::id")]
    id: i64,
    #[serde(default, deserialize_with = "fields::string_or_empty")]
    title: String,
    #[serde(default, deserialize_with = "fields::string_or_empty")]
    description: String,
    #[serde(default, deserialize_with = "fields::duration")]
    duration: Option<String>,
    #[serde(default, deserialize_with = "fields::string_or_empty")]
    image: String,
    #[serde(default, deserialize_with = "fields::tolerant_vec")]
    sources: Vec<RawSource>,
}

impl From<RawPoster> for Title {
    fn from(raw: RawPoster) -> Self {
        let kind = raw
            .kind
            .as_deref()
            .and_then(TitleKind::from_label)
            .unwrap_or(TitleKind::Movie);

        // Series sources live on episodes
        let sources = match kind {
            TitleKind::Movie => raw.sources.into_iter().map(Source::from).collect(),
            TitleKind::Series => Vec::new(),
        };

        Title {
            id: raw.id,
            kind,
            title: raw.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            description: raw.description,
            year: raw.year,
            imdb: raw.imdb.clamp(0.0, 10.0),
            rating: raw.rating,
            duration: raw.duration,
            image: raw.image,
            cover: raw.cover,
            genres: raw.genres.into_iter().map(Genre::from).collect(),
            countries: raw.country.into_iter().map(Country::from).collect(),
            sources,
        }
    }
}

impl From<RawGenre> for Genre {
    fn from(raw: RawGenre) -> Self {
        Genre { id: raw.id, title: raw.title }
    }
}

impl From<RawCountry> for Country {
    fn from(raw: RawCountry) -> Self {
        Country { id: raw.id, title: raw.title, image: raw.image }
    }
}

impl From<RawSource> for Source {
    fn from(raw: RawSource) -> Self {
        Source { id: raw.id, quality: raw.quality, kind: raw.kind, url: raw.url }
    }
}

impl From<RawSeason> for Season {
    fn from(raw: RawSeason) -> Self {
        Season {
            id: raw.id,
            title: raw.title,
            episodes: raw.episodes.into_iter().map(Episode::from).collect(),
        }
    }
}

impl From<RawEpisode> for Episode {
    fn from(raw: RawEpisode) -> Self {
        Episode {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            duration: raw.duration,
            image: raw.image,
            sources: raw.sources.into_iter().map(Source::from).collect(),
        }
    }
}

fn parse(text: &str) -> Result<Value, DecodeError> {
    serde_json::from_str(text).map_err(|e| DecodeError::InvalidJson(e.to_string()))
}

/// Decode one element, yielding the record or the reason it was rejected
fn decode_element<R, T>(element: Value) -> Result<T, serde_json::Error>
where
    R: DeserializeOwned,
    T: From<R>,
{
    serde_json::from_value::<R>(element).map(T::from)
}

/// Decode every element of `value` independently; a non-array yields nothing
fn decode_array<R, T>(value: Value, what: &str) -> Decoded<T>
where
    R: DeserializeOwned,
    T: From<R>,
{
    let elements = match value {
        Value::Array(elements) => elements,
        Value::Null => Vec::new(),
        other => {
            warn!(kind = what, found = json_kind(&other), "Expected a JSON array, treating as empty");
            Vec::new()
        }
    };

    let mut items = Vec::with_capacity(elements.len());
    let mut skipped = 0;
    for (index, element) in elements.into_iter().enumerate() {
        match decode_element::<R, T>(element) {
            Ok(item) => items.push(item),
            Err(e) => {
                skipped += 1;
                debug!(kind = what, index, error = %e, "Skipping malformed element");
            }
        }
    }

    if skipped > 0 {
        warn!(kind = what, skipped, kept = items.len(), "Dropped malformed elements from response");
    }

    Decoded { items, skipped }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Array of poster objects (movie, series and country-filtered lists)
pub fn titles(text: &str) -> Result<Decoded<Title>, DecodeError> {
    Ok(decode_array::<RawPoster, Title>(parse(text)?, "title"))
}

/// Search response: an object whose `posters` array holds the matches
pub fn search_posters(text: &str) -> Result<Decoded<Title>, DecodeError> {
    let posters = match parse(text)? {
        Value::Object(mut map) => map.remove("posters").unwrap_or(Value::Null),
        other => {
            warn!(found = json_kind(&other), "Search response is not an object, treating as empty");
            Value::Null
        }
    };
    Ok(decode_array::<RawPoster, Title>(posters, "search poster"))
}

pub fn genres(text: &str) -> Result<Decoded<Genre>, DecodeError> {
    Ok(decode_array::<RawGenre, Genre>(parse(text)?, "genre"))
}

pub fn countries(text: &str) -> Result<Decoded<Country>, DecodeError> {
    Ok(decode_array::<RawCountry, Country>(parse(text)?, "country"))
}

pub fn seasons(text: &str) -> Result<Decoded<Season>, DecodeError> {
    Ok(decode_array::<RawSeason, Season>(parse(text)?, "season"))
}
