//! Line-oriented search palette.
//!
//! Each input line is a query. Queries run on blocking worker threads and
//! may finish out of order; only the response to the latest query is shown.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::{print_hit, print_json};
use crate::core::ContentStore;
use crate::search::{QueryTicket, SearchResponse, SearchService, SearchSession};

/// Input that closes the palette
const QUIT: &str = ":q";

#[derive(Serialize)]
struct PaletteOutput<'a> {
    query: &'a str,
    generation: u64,
    #[serde(flatten)]
    response: &'a SearchResponse,
}

/// Run the palette until EOF or `:q`
pub async fn run(store: Arc<ContentStore>, json: bool) -> Result<()> {
    let service = SearchService::new(Arc::clone(&store));
    let session = Arc::new(SearchSession::new());

    if !json {
        print_idle(&store);
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<(QueryTicket, String, SearchResponse)>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let query = line.trim().to_string();
                if query == QUIT {
                    break;
                }

                let ticket = session.issue();
                let service = service.clone();
                let tx = tx.clone();
                tokio::task::spawn_blocking(move || {
                    let response = service.query(&query);
                    let _ = tx.send((ticket, query, response));
                });
            }
            Some((ticket, query, response)) = rx.recv() => {
                if let Some(response) = session.accept(ticket, response) {
                    render(&store, &query, ticket, &response, json)?;
                }
            }
        }
    }

    // Let in-flight queries finish; the last one issued is still shown
    drop(tx);
    while let Some((ticket, query, response)) = rx.recv().await {
        if let Some(response) = session.accept(ticket, response) {
            render(&store, &query, ticket, &response, json)?;
        }
    }

    Ok(())
}

fn render(
    store: &ContentStore,
    query: &str,
    ticket: QueryTicket,
    response: &SearchResponse,
    json: bool,
) -> Result<()> {
    if json {
        return print_json(&PaletteOutput {
            query,
            generation: ticket.generation(),
            response,
        });
    }

    match response {
        SearchResponse::Idle => print_idle(store),
        SearchResponse::Results(hits) if hits.is_empty() => {
            println!("No results found for \"{}\"", query);
        }
        SearchResponse::Results(hits) => {
            for hit in hits {
                print_hit(hit);
            }
        }
    }
    println!();
    Ok(())
}

/// Idle screen: what the palette searches across
fn print_idle(store: &ContentStore) {
    let snapshot = store.snapshot();
    println!("Start typing to search content ({} to quit)", QUIT);
    println!("Search across:");
    for (kind, count) in snapshot.repository.published_counts() {
        if kind.is_searchable() {
            println!("  {} ({})", kind.label(), count);
        }
    }
}
