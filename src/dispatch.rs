//! Bounded-concurrency batch dispatch.
//!
//! One fixed-size pool serves the whole run: the per-repository batch and
//! the per-file batches submitted from inside repository tasks. A batch
//! blocks until every task has finished; a failing task is logged and
//! counted, never cancels its siblings.

use anyhow::{Context, Result};
use log::warn;
use std::sync::atomic::{AtomicUsize, Ordering};

pub type Task<'a> = Box<dyn FnOnce() -> Result<()> + Send + 'a>;

pub struct Dispatcher {
    pool: rayon::ThreadPool,
}

impl Dispatcher {
    pub fn new(workers: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("crawl-{i}"))
            .build()
            .context("Failed to build worker pool")?;
        Ok(Self { pool })
    }

    /// Runs every task to completion and returns how many failed.
    ///
    /// Nested calls from within a running task reuse the same pool; the
    /// blocked outer scope participates in work stealing, so the configured
    /// worker count bounds total parallelism across both batch levels.
    pub fn run_all(&self, label: &str, tasks: Vec<Task<'_>>) -> usize {
        let failed = AtomicUsize::new(0);

        self.pool.scope(|scope| {
            for task in tasks {
                let failed = &failed;
                scope.spawn(move |_| {
                    if let Err(err) = task() {
                        failed.fetch_add(1, Ordering::Relaxed);
                        warn!("{label} task failed: {err:#}");
                    }
                });
            }
        });

        failed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_blocks_until_every_task_ran() {
        let dispatcher = Dispatcher::new(4).unwrap();
        let ran = AtomicUsize::new(0);

        let tasks: Vec<Task<'_>> = (0..32)
            .map(|_| {
                let ran = &ran;
                Box::new(move || {
                    ran.fetch_add(1, Ordering::Relaxed);
                    Ok(())
                }) as Task<'_>
            })
            .collect();

        let failed = dispatcher.run_all("test", tasks);
        assert_eq!(ran.load(Ordering::Relaxed), 32);
        assert_eq!(failed, 0);
    }

    #[test]
    fn failing_tasks_are_counted_and_do_not_cancel_siblings() {
        let dispatcher = Dispatcher::new(2).unwrap();
        let ran = AtomicUsize::new(0);

        let tasks: Vec<Task<'_>> = (0..10)
            .map(|i| {
                let ran = &ran;
                Box::new(move || {
                    ran.fetch_add(1, Ordering::Relaxed);
                    if i % 2 == 0 {
                        anyhow::bail!("task {i} failed")
                    }
                    Ok(())
                }) as Task<'_>
            })
            .collect();

        let failed = dispatcher.run_all("test", tasks);
        assert_eq!(ran.load(Ordering::Relaxed), 10);
        assert_eq!(failed, 5);
    }

    #[test]
    fn nested_batches_share_the_pool_without_deadlocking() {
        let dispatcher = Dispatcher::new(2).unwrap();
        let inner_ran = AtomicUsize::new(0);

        let outer: Vec<Task<'_>> = (0..4)
            .map(|_| {
                let dispatcher = &dispatcher;
                let inner_ran = &inner_ran;
                Box::new(move || {
                    let inner: Vec<Task<'_>> = (0..8)
                        .map(|_| {
                            Box::new(move || {
                                inner_ran.fetch_add(1, Ordering::Relaxed);
                                Ok(())
                            }) as Task<'_>
                        })
                        .collect();
                    dispatcher.run_all("inner", inner);
                    Ok(())
                }) as Task<'_>
            })
            .collect();

        let failed = dispatcher.run_all("outer", outer);
        assert_eq!(failed, 0);
        assert_eq!(inner_ran.load(Ordering::Relaxed), 32);
    }

    #[test]
    fn zero_workers_is_clamped_to_one() {
        let dispatcher = Dispatcher::new(0).unwrap();
        let tasks: Vec<Task<'_>> = vec![Box::new(|| Ok(()))];
        assert_eq!(dispatcher.run_all("test", tasks), 0);
    }
}
