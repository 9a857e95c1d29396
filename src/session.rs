use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

use crate::data_models::{Query, SearchResultItem};
use crate::search::SearchOrchestrator;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchPhase {
    Idle,
    Loading,
    Populated,
    Empty,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: SearchPhase,
    pub query: Option<String>,
    pub results: Vec<SearchResultItem>,
    pub is_loading: bool,
}

#[derive(Debug)]
struct SessionState {
    phase: SearchPhase,
    query: Option<Query>,
    results: Vec<SearchResultItem>,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

/// Current query, result list and loading flag for one search box.
///
/// Only the most recent submission may publish results: submitting cancels
/// whatever search is still in flight.
pub struct SearchSession {
    orchestrator: Arc<SearchOrchestrator>,
    state: Mutex<SessionState>,
}

impl SearchSession {
    pub fn new(orchestrator: Arc<SearchOrchestrator>) -> Self {
        Self {
            orchestrator,
            state: Mutex::new(SessionState {
                phase: SearchPhase::Idle,
                query: None,
                results: Vec::new(),
                generation: 0,
                in_flight: None,
            }),
        }
    }

    /// Submits `raw` and waits for its results.
    ///
    /// Returns `None` when the input is blank (nothing changes) or when a later
    /// submission superseded this one.
    pub async fn submit(&self, raw: &str) -> Option<SessionSnapshot> {
        let Some(query) = Query::parse(raw) else {
            log::debug!("ignoring blank query");
            return None;
        };

        let (token, generation) = {
            let mut state = self.lock();
            if let Some(previous) = state.in_flight.take() {
                log::debug!("cancelling in-flight search {:?}", state.query);
                previous.cancel();
            }
            state.generation += 1;
            state.phase = SearchPhase::Loading;
            state.query = Some(query.clone());
            let token = CancellationToken::new();
            state.in_flight = Some(token.clone());
            (token, state.generation)
        };
        let _loading = LoadingGuard {
            session: self,
            generation,
        };

        let items = tokio::select! {
            _ = token.cancelled() => return None,
            items = self.orchestrator.search(&query) => items,
        };

        let mut state = self.lock();
        if state.generation != generation {
            return None;
        }
        state.in_flight = None;
        state.phase = if items.is_empty() {
            SearchPhase::Empty
        } else {
            SearchPhase::Populated
        };
        state.results = items;
        Some(Self::snapshot_of(&state))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        Self::snapshot_of(&self.lock())
    }

    pub fn phase(&self) -> SearchPhase {
        self.lock().phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == SearchPhase::Loading
    }

    fn snapshot_of(state: &SessionState) -> SessionSnapshot {
        SessionSnapshot {
            phase: state.phase,
            query: state.query.as_ref().map(|q| q.as_str().to_string()),
            results: state.results.clone(),
            is_loading: state.phase == SearchPhase::Loading,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // state is only ever replaced wholesale, a poisoned lock is still consistent
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Leaves `Loading` if the submitting future goes away before publishing.
struct LoadingGuard<'a> {
    session: &'a SearchSession,
    generation: u64,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.session.lock();
        if state.generation == self.generation && state.phase == SearchPhase::Loading {
            log::debug!("search abandoned while loading, clearing results");
            state.in_flight = None;
            state.phase = SearchPhase::Empty;
            state.results.clear();
        }
    }
}
