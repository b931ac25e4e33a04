use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A repository as returned by `GET /users/{username}/repos`.
///
/// Only the fields the ranking and description steps read are typed. The provider's
/// object is kept whole in `raw` and serialized back with the same keys: a typed
/// field is written only when the provider sent its key or it was set since.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct RepositoryRecord {
    pub id: u64,
    pub name: String,
    pub language: Option<String>,
    pub description: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub homepage: Option<String>,
    pub topics: Vec<String>,
    pub fork: bool,
    pub raw: Map<String, Value>,
}

#[derive(Deserialize)]
struct TypedFields {
    id: u64,
    name: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    homepage: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    fork: bool,
}

impl TryFrom<Map<String, Value>> for RepositoryRecord {
    type Error = serde_json::Error;

    fn try_from(raw: Map<String, Value>) -> Result<Self, Self::Error> {
        let fields: TypedFields = serde_json::from_value(Value::Object(raw.clone()))?;
        Ok(Self {
            id: fields.id,
            name: fields.name,
            language: fields.language,
            description: fields.description,
            stargazers_count: fields.stargazers_count,
            forks_count: fields.forks_count,
            created_at: fields.created_at,
            updated_at: fields.updated_at,
            homepage: fields.homepage,
            topics: fields.topics,
            fork: fields.fork,
            raw,
        })
    }
}

impl From<RepositoryRecord> for Map<String, Value> {
    fn from(repo: RepositoryRecord) -> Self {
        let mut map = repo.raw;
        map.insert("id".to_string(), Value::from(repo.id));
        map.insert("name".to_string(), Value::from(repo.name));
        let fields = [
            ("language", repo.language.is_none(), json!(repo.language)),
            ("description", repo.description.is_none(), json!(repo.description)),
            ("stargazers_count", repo.stargazers_count == 0, json!(repo.stargazers_count)),
            ("forks_count", repo.forks_count == 0, json!(repo.forks_count)),
            ("created_at", repo.created_at.is_none(), json!(repo.created_at)),
            ("updated_at", repo.updated_at.is_none(), json!(repo.updated_at)),
            ("homepage", repo.homepage.is_none(), json!(repo.homepage)),
            ("topics", repo.topics.is_empty(), json!(repo.topics)),
            ("fork", !repo.fork, json!(repo.fork)),
        ];
        for (key, is_default, value) in fields {
            if !is_default || map.contains_key(key) {
                map.insert(key.to_string(), value);
            }
        }
        map
    }
}

impl RepositoryRecord {
    /// Parses `updated_at`; `None` when missing or not an RFC 3339 timestamp.
    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.updated_at.as_deref()?)
    }

    /// Primary language, treating an empty string like a missing one.
    pub fn primary_language(&self) -> Option<&str> {
        self.language.as_deref().filter(|l| !l.is_empty())
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// A repository with its ranking score attached.
#[derive(Debug, Clone, Serialize)]
pub struct RankedRepository {
    #[serde(flatten)]
    pub repo: RepositoryRecord,
    pub score: f64,
}

/// An entry of the `top_repos` response list. Only the first ranks carry an
/// `enhanced_description`; the rest are serialized without the key.
#[derive(Debug, Clone, Serialize)]
pub struct TopRepository {
    #[serde(flatten)]
    pub ranked: RankedRepository,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhanced_description: Option<String>,
}

#[cfg(test)]
pub(crate) fn make_repo(
    id: u64,
    language: Option<&str>,
    stars: u64,
    updated_at: Option<&str>,
) -> RepositoryRecord {
    RepositoryRecord {
        id,
        name: format!("repo-{id}"),
        language: language.map(str::to_string),
        description: None,
        stargazers_count: stars,
        forks_count: 0,
        created_at: Some("2022-01-01T00:00:00Z".to_string()),
        updated_at: updated_at.map(str::to_string),
        homepage: None,
        topics: vec![],
        fork: false,
        raw: Map::new(),
    }
}
