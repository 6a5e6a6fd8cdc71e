//! Recursive fan-out crawl
//!
//! Every visited page spawns one task per newly claimed target. A semaphore
//! sized by `crawler.workers` caps how many pages are fetched at once; the
//! permit is held only for the fetch, so waiting parents never starve their
//! children.

use crate::crawler::session::CrawlSession;
use crate::url::node_url;
use crate::CrawlError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

type ScrapeFuture = Pin<Box<dyn Future<Output = Result<(), CrawlError>> + Send>>;

pub(crate) async fn run_recursive(session: Arc<CrawlSession>, seed: Url) -> Result<(), CrawlError> {
    let permits = Arc::new(Semaphore::new(
        session.crawler.config().workers.max(1) as usize,
    ));

    if !session.visits.claim(&node_url(&seed)) {
        return Ok(());
    }

    scrape(session, permits, seed, 0).await
}

fn scrape(
    session: Arc<CrawlSession>,
    permits: Arc<Semaphore>,
    url: Url,
    depth: usize,
) -> ScrapeFuture {
    Box::pin(async move {
        if depth >= session.max_depth || session.cancel.is_cancelled() {
            return Ok(());
        }

        let visited = {
            let _permit = tokio::select! {
                biased;
                _ = session.cancel.cancelled() => return Ok(()),
                permit = permits.acquire() => match permit {
                    Ok(permit) => permit,
                    Err(_) => return Ok(()),
                },
            };
            session.visit(&url, depth).await
        };

        let targets = match visited {
            Ok(targets) => targets,
            Err(e) => {
                session.report_failure(&url, &e);
                return Ok(());
            }
        };

        let mut children = JoinSet::new();
        for target in targets {
            if session.visits.claim(&target) {
                children.spawn(scrape(session.clone(), permits.clone(), target, depth + 1));
            }
        }

        let mut failure = None;
        while let Some(joined) = children.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => failure = Some(e),
                Err(e) => {
                    tracing::error!("Crawl task for a child of {} panicked: {}", url, e);
                    failure = Some(CrawlError::Worker(e.to_string()));
                }
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    })
}
