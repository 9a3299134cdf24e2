use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::constants::{FETCH_LIMIT_START, FETCH_LIMIT_STEP};
use crate::error::FetchError;
use crate::records::Artwork;
use crate::sequence::RequestSequence;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchType {
    #[default]
    #[serde(rename = "artistCulture")]
    ArtistCulture,
    #[serde(rename = "medium")]
    Medium,
}

impl SearchType {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchType::ArtistCulture => "artistCulture",
            SearchType::Medium => "medium",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "medium" => SearchType::Medium,
            _ => SearchType::ArtistCulture,
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            SearchType::ArtistCulture => "Search...",
            SearchType::Medium => "Enter Medium",
        }
    }
}

/// Filter criteria entered in the search form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    #[serde(rename = "isHighlight")]
    pub is_highlight: bool,
    #[serde(rename = "isOnView")]
    pub is_on_view: bool,
    #[serde(rename = "departmentId")]
    pub department_id: Option<u32>,
    #[serde(rename = "searchType")]
    pub search_type: SearchType,
}

impl QueryParams {
    /// Query-string pairs for the collection API `search` endpoint, unencoded.
    pub fn search_pairs(&self) -> Vec<(&'static str, String)> {
        let term = self.search_term.trim();
        let term = if term.is_empty() { "*" } else { term };
        let mut pairs = Vec::new();
        match self.search_type {
            SearchType::ArtistCulture => pairs.push(("artistOrCulture", "true".to_string())),
            SearchType::Medium => pairs.push(("medium", term.to_string())),
        }
        if self.is_highlight {
            pairs.push(("isHighlight", "true".to_string()));
        }
        if self.is_on_view {
            pairs.push(("isOnView", "true".to_string()));
        }
        if let Some(dept) = self.department_id {
            pairs.push(("departmentId", dept.to_string()));
        }
        pairs.push(("q", term.to_string()));
        pairs
    }
}

/// One of the filter-row controls, each of which re-runs the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterChange {
    Department(Option<u32>),
    Highlight(bool),
    OnView(bool),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchQuery {
    /// The backend's random selection, shown before the first search.
    Random,
    /// Collection API search for the results in `[start, limit)`.
    Search {
        params: QueryParams,
        start: usize,
        limit: usize,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    /// Sequence number of the replacing request this one extends.
    pub generation: u64,
    pub append: bool,
    pub query: SearchQuery,
}

#[derive(Debug)]
pub struct SearchState {
    params: QueryParams,
    results: Vec<Artwork>,
    fetch_limit: usize,
    requests: RequestSequence,
    generation: u64,
    /// The current generation is a collection search rather than the random load.
    searched: bool,
    /// Records of the replacing request, once it has landed.
    first_page: Option<Vec<Artwork>>,
    first_limit: usize,
    /// "See more" pages keyed by window start, with their window end.
    pages: BTreeMap<usize, (usize, Vec<Artwork>)>,
    pending: BTreeSet<u64>,
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState {
            params: QueryParams::default(),
            results: Vec::new(),
            fetch_limit: FETCH_LIMIT_START,
            requests: RequestSequence::default(),
            generation: 0,
            searched: false,
            first_page: None,
            first_limit: 0,
            pages: BTreeMap::new(),
            pending: BTreeSet::new(),
        }
    }
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn results(&self) -> &[Artwork] {
        &self.results
    }

    /// True while any request of the current generation is outstanding.
    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn fetch_limit(&self) -> usize {
        self.fetch_limit
    }

    /// "See more" extends a search; the random selection has nothing to extend.
    pub fn show_see_more(&self) -> bool {
        self.searched && !self.results.is_empty()
    }

    pub fn set_term(&mut self, term: &str) {
        self.params.search_term = term.to_string();
    }

    pub fn set_search_type(&mut self, search_type: SearchType) {
        self.params.search_type = search_type;
    }

    pub fn load_initial(&mut self) -> SearchRequest {
        self.replace(SearchQuery::Random)
    }

    pub fn submit(&mut self) -> SearchRequest {
        let query = SearchQuery::Search {
            params: self.params.clone(),
            start: 0,
            limit: self.fetch_limit,
        };
        self.replace(query)
    }

    pub fn change_filter(&mut self, change: FilterChange) -> SearchRequest {
        match change {
            FilterChange::Department(d) => self.params.department_id = d,
            FilterChange::Highlight(v) => self.params.is_highlight = v,
            FilterChange::OnView(v) => self.params.is_on_view = v,
        }
        tracing::debug!(params = ?self.params, "filters changed");
        self.submit()
    }

    /// Raise the limit and request only the records past the old one.
    /// Over the random selection this starts a search from the first record.
    pub fn see_more(&mut self) -> SearchRequest {
        let start = self.fetch_limit;
        self.fetch_limit += FETCH_LIMIT_STEP;
        if !self.searched {
            return self.submit();
        }
        let seq = self.requests.issue();
        self.pending.insert(seq);
        SearchRequest {
            seq,
            generation: self.generation,
            append: true,
            query: SearchQuery::Search {
                params: self.params.clone(),
                start,
                limit: self.fetch_limit,
            },
        }
    }

    fn replace(&mut self, query: SearchQuery) -> SearchRequest {
        let seq = self.requests.issue();
        self.generation = seq;
        self.pending.clear();
        self.pending.insert(seq);
        self.pages.clear();
        self.first_page = None;
        (self.searched, self.first_limit) = match &query {
            SearchQuery::Random => (false, 0),
            SearchQuery::Search { limit, .. } => (true, *limit),
        };
        SearchRequest {
            seq,
            generation: seq,
            append: false,
            query,
        }
    }

    /// Apply a response. Returns true when the view should re-render.
    ///
    /// A replacing request supersedes everything issued before it. "See more"
    /// pages of the current generation are spliced in window order, so a page
    /// shows only once every window before it has landed.
    pub fn finish(&mut self, req: &SearchRequest, result: Result<Vec<Artwork>, FetchError>) -> bool {
        if req.generation != self.generation || !self.pending.remove(&req.seq) {
            tracing::warn!(seq = req.seq, "dropping superseded search response");
            return false;
        }
        match (result, &req.query) {
            (Ok(records), SearchQuery::Search { start, limit, .. }) if req.append => {
                self.pages.insert(*start, (*limit, records));
            }
            (Ok(records), _) => self.first_page = Some(records),
            (Err(err), _) => {
                tracing::warn!(%err, "artwork search failed");
                self.abandon();
            }
        }
        self.assemble();
        true
    }

    // A failed request empties the list; pages still in flight for this
    // generation are dropped when they land.
    fn abandon(&mut self) {
        self.generation = self.requests.issue();
        self.pending.clear();
        self.pages.clear();
        self.first_page = Some(Vec::new());
    }

    fn assemble(&mut self) {
        let Some(first) = &self.first_page else {
            self.results.clear();
            return;
        };
        let mut results = first.clone();
        let mut next = self.first_limit;
        while let Some((limit, records)) = self.pages.get(&next) {
            results.extend(records.iter().cloned());
            next = *limit;
        }
        self.results = results;
    }
}
