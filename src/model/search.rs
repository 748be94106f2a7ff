use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SearchQuery: what the user typed
// ---------------------------------------------------------------------------

/// Query text plus the matching-mode toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Keywords; may be empty.
    pub text: String,
    /// Ask the service for context matching instead of literal matching.
    pub context_search: bool,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context_search: false,
        }
    }

    pub fn context_search(mut self, enabled: bool) -> Self {
        self.context_search = enabled;
        self
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/search/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequestPayload {
    /// The whole file as a base64 data URI.
    pub file_input: String,
    pub query: String,
    pub is_context_search: bool,
}

impl SearchRequestPayload {
    /// Build the payload from an encoded file and a query snapshot.
    pub fn new(file_input: String, query: &SearchQuery) -> Self {
        Self {
            file_input,
            query: query.text.clone(),
            is_context_search: query.context_search,
        }
    }
}

/// A single time-range hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Seconds from the start of the media.
    pub start_time: f64,
    pub end_time: f64,
    /// Confidence in [0.0, 1.0].
    pub confidence: f64,
    pub transcript: String,
}

impl MatchResult {
    /// Display projection used by the results list.
    pub fn row(&self) -> MatchRow {
        MatchRow {
            range: format!("{} - {} seconds", self.start_time, self.end_time),
            confidence: format!("{:.0}% confident", self.confidence * 100.0),
            transcript: self.transcript.clone(),
        }
    }
}

/// Complete search response. Match order is the server's relevance order and
/// is never re-sorted on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// URI of the playable media resource.
    pub access_link: String,
    /// Server-side processing time in seconds.
    #[serde(rename = "elapsed_time")]
    pub elapsed_time_seconds: f64,
    /// An absent list means "no matches", not an error.
    #[serde(default)]
    pub matches: Vec<MatchResult>,
}

impl SearchResponse {
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }
}

/// Preformatted text for one entry of the results list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRow {
    pub range: String,
    pub confidence: String,
    pub transcript: String,
}
