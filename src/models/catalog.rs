//! Catalog data models.
//!
//! A catalog document is a JSON array of entries. Each entry owns its seasons
//! and each season owns an ordered list of episodes:
//!
//! ```json
//! [{"id": "a", "title": "A", "seasons": [{"ordinal": 1, "episodes": ["e0", "e1"]}]}]
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Shared handle to an episode.
///
/// Navigation compares episodes by identity ([`same_episode`]), so two
/// episodes with identical content at different positions stay distinct.
pub type EpisodeRef = Arc<Episode>;

/// Compare two episode handles by identity.
pub fn same_episode(a: &EpisodeRef, b: &EpisodeRef) -> bool {
    Arc::ptr_eq(a, b)
}

/// A playable episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EpisodeRepr")]
pub struct Episode {
    /// Display label (e.g., "Episode 3").
    pub label: String,
    /// Media URL, if the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Episode {
    /// Create an episode with only a label.
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            url: None,
        }
    }

    /// Set the playable URL.
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }
}

/// Episodes appear either as bare labels or as objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum EpisodeRepr {
    Label(String),
    Full {
        #[serde(default, alias = "title", alias = "name", deserialize_with = "lenient_text")]
        label: Option<String>,
        #[serde(default, alias = "episode", deserialize_with = "lenient_number")]
        number: Option<u32>,
        #[serde(
            default,
            alias = "src",
            alias = "video",
            alias = "videoUrl",
            deserialize_with = "lenient_text"
        )]
        url: Option<String>,
    },
}

impl From<EpisodeRepr> for Episode {
    fn from(repr: EpisodeRepr) -> Self {
        match repr {
            EpisodeRepr::Label(label) => Episode { label, url: None },
            EpisodeRepr::Full { label, number, url } => {
                let label = label.unwrap_or_else(|| match number {
                    Some(n) => format!("Episode {}", n),
                    None => "Untitled episode".to_string(),
                });
                Episode { label, url }
            }
        }
    }
}

/// A season of a catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    /// Season number.
    #[serde(alias = "season", alias = "number")]
    pub ordinal: u32,
    /// Episodes in play order.
    #[serde(default)]
    pub episodes: Vec<EpisodeRef>,
}

impl Season {
    /// Create a season from episodes.
    pub fn new(ordinal: u32, episodes: Vec<Episode>) -> Self {
        Self {
            ordinal,
            episodes: episodes.into_iter().map(Arc::new).collect(),
        }
    }

    /// Position of an episode in this season, by identity.
    pub fn position_of(&self, episode: &EpisodeRef) -> Option<usize> {
        self.episodes.iter().position(|e| same_episode(e, episode))
    }

    /// Episode at an index.
    pub fn episode(&self, index: usize) -> Option<&EpisodeRef> {
        self.episodes.get(index)
    }
}

/// One animated title in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique identifier.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Display title.
    pub title: String,
    /// Short synopsis.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    /// Poster image URL.
    #[serde(
        default,
        alias = "image",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub poster: Option<String>,
    /// Release year.
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<u16>,
    /// Genres.
    #[serde(
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub genres: Vec<String>,
    /// Seasons in display order.
    #[serde(default)]
    pub seasons: Vec<Season>,
}

impl CatalogEntry {
    /// Create an entry with no metadata.
    pub fn new(id: &str, title: &str, seasons: Vec<Season>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            poster: None,
            year: None,
            genres: Vec::new(),
            seasons,
        }
    }

    /// Look up a season by ordinal.
    pub fn season(&self, ordinal: u32) -> Option<&Season> {
        self.seasons.iter().find(|s| s.ordinal == ordinal)
    }

    /// Total number of episodes across all seasons.
    pub fn episode_count(&self) -> usize {
        self.seasons.iter().map(|s| s.episodes.len()).sum()
    }
}

/// The in-memory result of one catalog fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub entries: Vec<Arc<CatalogEntry>>,
}

impl Catalog {
    /// Build a catalog from entries.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(Arc::new).collect(),
        }
    }

    /// Parse a catalog document.
    pub fn from_json(content: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// First entry with the given id.
    pub fn find(&self, id: &str) -> Option<Arc<CatalogEntry>> {
        self.entries.iter().find(|e| e.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accept ids written either as strings or as numbers.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

// Optional metadata never fails the whole catalog: a value of the wrong
// shape is read as absent.

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_number<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64> + std::str::FromStr,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| T::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(String::from)
            .collect(),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_episode_labels() {
        let catalog = Catalog::from_json(
            r#"[{"id":"a","title":"A","seasons":[{"ordinal":1,"episodes":["e0","e1"]}]}]"#,
        )
        .unwrap();

        let entry = catalog.find("a").unwrap();
        let season = entry.season(1).unwrap();
        assert_eq!(season.episodes.len(), 2);
        assert_eq!(season.episodes[0].label, "e0");
        assert!(season.episodes[1].url.is_none());
    }

    #[test]
    fn test_parse_episode_objects_and_aliases() {
        let catalog = Catalog::from_json(
            r#"[{"id":7,"title":"Seven","image":"p.png","seasons":[
                {"season":2,"episodes":[{"title":"Pilot","src":"https://cdn/1.mp4"}]}
            ]}]"#,
        )
        .unwrap();

        let entry = catalog.find("7").unwrap();
        assert_eq!(entry.poster.as_deref(), Some("p.png"));
        let episode = &entry.season(2).unwrap().episodes[0];
        assert_eq!(episode.label, "Pilot");
        assert_eq!(episode.url.as_deref(), Some("https://cdn/1.mp4"));
    }

    #[test]
    fn test_odd_metadata_does_not_break_catalog() {
        let catalog = Catalog::from_json(
            r#"[
                {"id":"a","title":"A","seasons":[]},
                {"id":"b","title":"B","year":"2001","genres":"Comedy, Family","seasons":[]},
                {"id":"c","title":"C","year":{"from":1999},"genres":[1,"Drama"],
                 "description":null,"poster":false,"seasons":[]}
            ]"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 3);
        let b = catalog.find("b").unwrap();
        assert_eq!(b.year, Some(2001));
        assert_eq!(b.genres, vec!["Comedy", "Family"]);

        let c = catalog.find("c").unwrap();
        assert_eq!(c.year, None);
        assert_eq!(c.genres, vec!["Drama"]);
        assert!(c.description.is_none());
        assert!(c.poster.is_none());
    }

    #[test]
    fn test_out_of_range_year_is_dropped() {
        let catalog =
            Catalog::from_json(r#"[{"id":"a","title":"A","year":70000,"seasons":[]}]"#).unwrap();
        assert_eq!(catalog.find("a").unwrap().year, None);
    }

    #[test]
    fn test_episode_object_without_label() {
        let catalog = Catalog::from_json(
            r#"[{"id":"a","title":"A","seasons":[{"ordinal":1,"episodes":[
                {"episode":1,"videoUrl":"x.mp4"},
                {"video":"y.mp4"}
            ]}]}]"#,
        )
        .unwrap();

        let season = catalog.find("a").unwrap().season(1).unwrap().clone();
        assert_eq!(season.episodes[0].label, "Episode 1");
        assert_eq!(season.episodes[0].url.as_deref(), Some("x.mp4"));
        assert_eq!(season.episodes[1].label, "Untitled episode");
    }

    #[test]
    fn test_find_returns_first_match() {
        let catalog = Catalog::new(vec![
            CatalogEntry::new("x", "First", vec![]),
            CatalogEntry::new("x", "Second", vec![]),
        ]);
        assert_eq!(catalog.find("x").unwrap().title, "First");
        assert!(catalog.find("missing").is_none());
    }

    #[test]
    fn test_equal_episodes_are_distinct_by_position() {
        let season = Season::new(1, vec![Episode::new("same"), Episode::new("same")]);
        assert_eq!(*season.episodes[0], *season.episodes[1]);
        assert!(!same_episode(&season.episodes[0], &season.episodes[1]));
        assert_eq!(season.position_of(&season.episodes[1]), Some(1));
    }
}
