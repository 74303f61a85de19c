//! Capture of a list of pages into one document

use crate::config::CaptureConfig;
use crate::context::ContextProvider;
use crate::error::{CaptureError, Result};
use crate::session::LiveSession;
use futures::stream::{self, StreamExt};
use har_builder::HarDocument;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

/// Per-page progress of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// The page was captured
    Load { url: String, index: usize },
    /// The page failed and is left out of the document
    Fail {
        url: String,
        index: usize,
        error: String,
    },
}

/// A page that could not be captured
#[derive(Debug)]
pub struct PageFailure {
    pub index: usize,
    pub url: String,
    pub error: CaptureError,
}

/// Result of a batch
#[derive(Debug)]
pub struct BatchCapture {
    /// Pages that loaded, in input order, renumbered `page_1..`
    pub document: HarDocument,
    pub failures: Vec<PageFailure>,
}

/// Capture every URL of `urls` with at most `config.parallel()` pages in
/// flight, reporting progress on `progress` when given.
pub async fn capture_urls(
    provider: Arc<dyn ContextProvider>,
    urls: &[String],
    config: CaptureConfig,
    progress: Option<UnboundedSender<CaptureEvent>>,
) -> BatchCapture {
    let parallel = config.parallel().max(1);
    let session = LiveSession::new(provider, config);
    info!("Capturing {} page(s), {} at a time", urls.len(), parallel);

    let session = &session;
    let progress = &progress;
    let mut results: Vec<(usize, Result<HarDocument>)> = stream::iter(urls.iter().enumerate())
        .map(|(index, url)| async move {
            let result = session.run(url, index, urls).await;
            report(progress.as_ref(), url, index, &result);
            (index, result)
        })
        .buffer_unordered(parallel)
        .collect()
        .await;
    results.sort_by_key(|(index, _)| *index);

    let mut documents = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (index, result) in results {
        match result {
            Ok(document) => documents.push(document),
            Err(error) => failures.push(PageFailure {
                index,
                url: urls[index].clone(),
                error,
            }),
        }
    }

    info!(
        "Batch finished: {} page(s) captured, {} failed",
        documents.len(),
        failures.len()
    );
    BatchCapture {
        document: HarDocument::merge(documents),
        failures,
    }
}

fn report(
    progress: Option<&UnboundedSender<CaptureEvent>>,
    url: &str,
    index: usize,
    result: &Result<HarDocument>,
) {
    let event = match result {
        Ok(_) => CaptureEvent::Load {
            url: url.to_string(),
            index,
        },
        Err(error) => {
            warn!("Page {} ({}) failed: {}", index, url, error);
            CaptureEvent::Fail {
                url: url.to_string(),
                index,
                error: error.to_string(),
            }
        }
    };
    if let Some(sender) = progress {
        // The receiver may have stopped listening; progress is advisory
        let _ = sender.send(event);
    }
}
