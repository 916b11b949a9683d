use crate::archive::ArchiveBuilder;
use crate::config::HarvestConfig;
use crate::error::{FetchCause, Result};
use crate::fetch::retrieve;
use crate::results::{ArchiveOutput, FailedUrl, RetrievalResult};
use reqwest::Client;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Fetches every URL concurrently and packages the successes into a zip.
///
/// Individual failures never abort the batch; they are returned alongside
/// the archive. When `cancel` completes first, unfinished fetches are
/// aborted and reported as cancelled.
pub async fn build_archive<F>(
    client: &Client,
    urls: &[String],
    config: &HarvestConfig,
    cancel: F,
) -> Result<ArchiveOutput>
where
    F: Future<Output = ()>,
{
    let results = retrieve_all(client, urls, config, cancel).await;

    let mut builder = ArchiveBuilder::new(&config.archive_folder);
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(image) => {
                builder.add(&image)?;
            }
            Err(failure) => failures.push(failure),
        }
    }

    let (bytes, entries) = builder.finish()?;

    ::log::info!(
        "Built {} with {} entries ({} bytes), {} failed",
        config.archive_name,
        entries.len(),
        bytes.len(),
        failures.len()
    );

    Ok(ArchiveOutput {
        name: config.archive_name.clone(),
        bytes,
        entries,
        failures,
    })
}

/// Fetches every distinct URL on a bounded pool of tasks.
///
/// Results are returned in input order, one per distinct URL.
pub async fn retrieve_all<F>(
    client: &Client,
    urls: &[String],
    config: &HarvestConfig,
    cancel: F,
) -> Vec<RetrievalResult>
where
    F: Future<Output = ()>,
{
    let urls = distinct(urls);
    if urls.is_empty() {
        return Vec::new();
    }

    let max_concurrency = config.concurrency();
    ::log::info!(
        "Retrieving {} images with concurrency {}",
        urls.len(),
        max_concurrency
    );

    let semaphore = Arc::new(Semaphore::new(max_concurrency));
    let config = Arc::new(config.clone());
    let mut tasks = JoinSet::new();

    for (index, url) in urls.iter().enumerate() {
        spawn_fetch(
            &mut tasks,
            index,
            url.clone(),
            client.clone(),
            Arc::clone(&config),
            Arc::clone(&semaphore),
        );
    }

    // Only this loop writes to the result slots
    let mut slots: Vec<Option<RetrievalResult>> = (0..urls.len()).map(|_| None).collect();
    let mut cancelled = false;
    tokio::pin!(cancel);

    loop {
        tokio::select! {
            biased;

            joined = tasks.join_next() => match joined {
                Some(Ok((index, result))) => slots[index] = Some(result),
                Some(Err(e)) => ::log::error!("Retrieval task failed: {}", e),
                None => break,
            },
            _ = &mut cancel => {
                ::log::warn!(
                    "Batch cancelled with {} of {} fetches unfinished",
                    tasks.len(),
                    urls.len()
                );
                cancelled = true;
                tasks.abort_all();
                break;
            }
        }
    }

    // Keep anything that finished while the abort was being delivered
    if cancelled {
        while let Some(joined) = tasks.join_next().await {
            if let Ok((index, result)) = joined {
                slots[index] = Some(result);
            }
        }
    }

    slots
        .into_iter()
        .zip(urls)
        .map(|(slot, url)| {
            slot.unwrap_or_else(|| {
                let cause = if cancelled {
                    FetchCause::Cancelled
                } else {
                    FetchCause::Network("retrieval task did not complete".to_string())
                };
                Err(FailedUrl { url, cause })
            })
        })
        .collect()
}

/// Spawns a single fetch that waits for a pool permit first
fn spawn_fetch(
    tasks: &mut JoinSet<(usize, RetrievalResult)>,
    index: usize,
    url: String,
    client: Client,
    config: Arc<HarvestConfig>,
    semaphore: Arc<Semaphore>,
) {
    ::log::trace!("Spawning fetch {} for {}", index, url);

    tasks.spawn(async move {
        let _permit = match semaphore.acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                let failure = FailedUrl {
                    url,
                    cause: FetchCause::Cancelled,
                };
                return (index, Err(failure));
            }
        };
        ::log::trace!("Fetch {} acquired permit for {}", index, url);

        let result = retrieve::fetch_one(&client, &url, &config)
            .await
            .map_err(|e| FailedUrl::from_error(url, e));
        (index, result)
    });
}

/// Drops exact-duplicate URLs, keeping first occurrences in order
fn distinct(urls: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.iter()
        .filter(|url| {
            let fresh = seen.insert(url.as_str());
            if !fresh {
                ::log::debug!("Skipping duplicate request: {}", url);
            }
            fresh
        })
        .cloned()
        .collect()
}
