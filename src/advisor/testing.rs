//! Test doubles for the transport and the reporter.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::report::{Endpoint, Reporter, SlowQueryEntry, SuggestedIndexEntry};
use crate::transport::{ApiResponse, Transport};
use crate::AtlasError;

/// Canned outcome for one endpoint.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Response(ApiResponse),
    ConnectionRefused,
}

impl Reply {
    pub(crate) fn json(body: &str) -> Self {
        Reply::Response(ApiResponse::new(200, body))
    }

    pub(crate) fn status(status: u16, body: &str) -> Self {
        Reply::Response(ApiResponse::new(status, body))
    }
}

/// Transport answering each endpoint with a scripted reply and recording
/// every requested URI.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    replies: HashMap<Endpoint, Reply>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub(crate) fn reply(mut self, endpoint: Endpoint, reply: Reply) -> Self {
        self.replies.insert(endpoint, reply);
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

fn endpoint_of(uri: &str) -> Option<Endpoint> {
    let path = uri.split('?').next().unwrap_or(uri);
    if path.ends_with("/slowQueryLogs") {
        Some(Endpoint::SlowQueryLogs)
    } else if path.ends_with("/suggestedIndexes") {
        Some(Endpoint::SuggestedIndexes)
    } else if path.ends_with("/processes/") {
        Some(Endpoint::Processes)
    } else {
        None
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, uri: &str) -> Result<ApiResponse, AtlasError> {
        self.requests.lock().push(uri.to_string());
        match endpoint_of(uri).and_then(|e| self.replies.get(&e)) {
            Some(Reply::Response(response)) => Ok(response.clone()),
            Some(Reply::ConnectionRefused) => {
                Err(AtlasError::Connection("connection refused".to_string()))
            }
            None => Err(AtlasError::Http(format!("unscripted request: {}", uri))),
        }
    }
}

/// Everything a reporter was told, in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    Primary(String),
    SlowQuery(SlowQueryEntry),
    SuggestedIndex(SuggestedIndexEntry),
    Error(Endpoint, String),
}

#[derive(Debug, Default)]
pub(crate) struct CollectingReporter {
    events: Mutex<Vec<Event>>,
}

impl CollectingReporter {
    pub(crate) fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub(crate) fn slow_queries(&self) -> Vec<SlowQueryEntry> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::SlowQuery(entry) => Some(entry),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn suggested_indexes(&self) -> Vec<SuggestedIndexEntry> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::SuggestedIndex(entry) => Some(entry),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn errors(&self) -> Vec<(Endpoint, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Error(endpoint, message) => Some((endpoint, message)),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for CollectingReporter {
    fn primary_resolved(&self, process_id: &str) {
        self.events.lock().push(Event::Primary(process_id.to_string()));
    }

    fn slow_query(&self, entry: &SlowQueryEntry) {
        self.events.lock().push(Event::SlowQuery(entry.clone()));
    }

    fn suggested_index(&self, entry: &SuggestedIndexEntry) {
        self.events.lock().push(Event::SuggestedIndex(entry.clone()));
    }

    fn error(&self, endpoint: Endpoint, error: &AtlasError) {
        self.events
            .lock()
            .push(Event::Error(endpoint, error.to_string()));
    }
}
