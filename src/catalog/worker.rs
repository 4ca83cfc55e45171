//! Background thread that owns the blocking catalog client so the event loop
//! stays responsive. Requests carry a monotonically increasing generation;
//! the UI remembers the generation it is waiting on and discards anything
//! stale, which is what keeps two racing searches from resolving out of
//! order.

use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::debug;

use crate::models::{BookRecord, WorkDetails};

use super::client::CatalogClient;

enum Request {
    Search { generation: u64, query: String },
    Details { generation: u64, olid: String },
}

/// Responses mirror requests and echo the originating generation so the UI
/// can tell a current answer from a superseded one.
pub enum CatalogEvent {
    SearchResults {
        generation: u64,
        results: Vec<BookRecord>,
    },
    Details {
        generation: u64,
        details: Option<WorkDetails>,
    },
}

/// Handle to the worker thread. Dropping it closes the request channel,
/// which ends the thread after its current request.
pub struct CatalogWorker {
    requests: Sender<Request>,
    events: Receiver<CatalogEvent>,
    generation: u64,
}

impl CatalogWorker {
    /// Spawn the worker thread around `client`. The thread processes one
    /// request at a time in submission order.
    pub fn spawn(client: CatalogClient) -> Self {
        let (request_tx, request_rx) = unbounded::<Request>();
        let (event_tx, event_rx) = unbounded();

        thread::spawn(move || {
            for request in request_rx {
                let event = match request {
                    Request::Search { generation, query } => {
                        debug!(generation, query, "running catalog search");
                        CatalogEvent::SearchResults {
                            generation,
                            results: client.search(&query),
                        }
                    }
                    Request::Details { generation, olid } => {
                        debug!(generation, olid, "fetching catalog details");
                        CatalogEvent::Details {
                            generation,
                            details: client.get_details(&olid),
                        }
                    }
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self {
            requests: request_tx,
            events: event_rx,
            generation: 0,
        }
    }

    /// Queue a search and return the generation its response will carry.
    pub fn submit_search(&mut self, query: &str) -> u64 {
        let generation = self.next_generation();
        // Send only fails when the worker is gone, which happens during
        // shutdown when nobody will drain the response anyway.
        let _ = self.requests.send(Request::Search {
            generation,
            query: query.to_string(),
        });
        generation
    }

    /// Queue a detail fetch and return its generation.
    pub fn submit_details(&mut self, olid: &str) -> u64 {
        let generation = self.next_generation();
        let _ = self.requests.send(Request::Details {
            generation,
            olid: olid.to_string(),
        });
        generation
    }

    /// Drain every response that has arrived since the last tick without
    /// blocking.
    pub fn poll(&self) -> Vec<CatalogEvent> {
        self.events.try_iter().collect()
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}
