//! Worker-pool crawl coordination
//!
//! A fixed pool of workers pulls `Job`s from a bounded queue. Each worker
//! visits its page and reports back over a single event channel: first one
//! `Discovered` event per new target, then a `Finished` event. A single
//! coordinating loop owns the outstanding-job counter, deduplicates
//! discovered targets, feeds the job queue from its backlog, and stops when
//! the counter reaches zero or the crawl is cancelled.
//!
//! Events from one worker arrive in order, so a page's discoveries are
//! always counted before its completion.

use crate::crawler::session::CrawlSession;
use crate::url::node_url;
use crate::CrawlError;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use url::Url;

/// A page to crawl and the number of hops from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub url: Url,
    pub depth: usize,
}

#[derive(Debug)]
enum WorkerEvent {
    Discovered(Job),
    Finished {
        url: Url,
        result: Result<(), CrawlError>,
    },
}

type JobQueue = Arc<Mutex<mpsc::Receiver<Job>>>;

pub(crate) async fn run_pool(session: Arc<CrawlSession>, seed: Url) -> Result<(), CrawlError> {
    let settings = session.crawler.config();
    let capacity = settings.queue_capacity.max(1) as usize;

    let (jobs_tx, jobs_rx) = mpsc::channel::<Job>(capacity);
    let jobs_rx: JobQueue = Arc::new(Mutex::new(jobs_rx));
    let (events_tx, mut events_rx) = mpsc::channel::<WorkerEvent>(capacity);

    let mut workers = JoinSet::new();
    for worker_id in 0..settings.workers.max(1) {
        workers.spawn(worker_loop(
            worker_id,
            session.clone(),
            jobs_rx.clone(),
            events_tx.clone(),
        ));
    }
    drop(events_tx);

    let mut backlog = VecDeque::new();
    let mut outstanding = 0usize;
    if session.visits.quote(&node_url(&seed)) {
        outstanding += 1;
        backlog.push_back(Job {
            url: seed,
            depth: 0,
        });
    }

    while outstanding > 0 {
        tokio::select! {
            biased;

            _ = session.cancel.cancelled() => {
                tracing::info!("Crawl cancelled with {} job(s) outstanding", outstanding);
                break;
            }

            event = events_rx.recv() => match event {
                Some(WorkerEvent::Discovered(job)) => {
                    // Only hosts never seen before become new jobs
                    if session.visits.quote(&job.url) {
                        outstanding += 1;
                        backlog.push_back(job);
                    }
                }
                Some(WorkerEvent::Finished { url, result }) => {
                    outstanding -= 1;
                    if let Err(e) = result {
                        session.report_failure(&url, &e);
                    }
                }
                None => break,
            },

            permit = jobs_tx.reserve(), if !backlog.is_empty() => {
                let Ok(permit) = permit else { break };
                if let Some(job) = backlog.pop_front() {
                    if session.visits.claim(&node_url(&job.url)) {
                        permit.send(job);
                    } else {
                        outstanding -= 1;
                    }
                }
            }
        }
    }

    // Closing both ends lets idle and blocked workers exit
    drop(jobs_tx);
    drop(events_rx);

    let mut failure = None;
    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            tracing::error!("Crawl worker terminated abnormally: {}", e);
            failure = Some(CrawlError::Worker(e.to_string()));
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

async fn worker_loop(
    worker_id: u32,
    session: Arc<CrawlSession>,
    jobs: JobQueue,
    events: mpsc::Sender<WorkerEvent>,
) {
    let enqueue_timeout = session.crawler.config().enqueue_timeout();
    tracing::trace!("Worker {} started", worker_id);

    loop {
        let job = { jobs.lock().await.recv().await };
        let Some(job) = job else { break };

        tracing::debug!("Worker {} crawling {} at depth {}", worker_id, job.url, job.depth);

        let result = match session.visit(&job.url, job.depth).await {
            Ok(targets) => {
                for target in targets {
                    let label = target.to_string();
                    let discovered = WorkerEvent::Discovered(Job {
                        url: target,
                        depth: job.depth + 1,
                    });

                    match tokio::time::timeout(enqueue_timeout, events.send(discovered)).await {
                        Ok(Ok(())) => {}
                        Ok(Err(_)) => return,
                        Err(_) => {
                            tracing::warn!(
                                "Dropping job for {}: queue still full after {:?}",
                                label,
                                enqueue_timeout
                            );
                            session.stats.record_dropped_job();
                        }
                    }
                }
                Ok(())
            }
            Err(e) => Err(e),
        };

        let finished = WorkerEvent::Finished {
            url: job.url,
            result,
        };
        if events.send(finished).await.is_err() {
            break;
        }
    }

    tracing::trace!("Worker {} stopped", worker_id);
}
