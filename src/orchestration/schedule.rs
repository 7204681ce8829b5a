//! Ordered, bounded fan-out over resolved dependencies
//!
//! A dependency starts once every child that is part of the same list has
//! finished successfully. Among startable dependencies the earliest in the
//! list goes first, so a concurrency of 1 runs exactly in list order.

use crate::dependency::Dependency;
use crate::error::{RiggerError, RiggerResult};
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Waiting,
    Running,
    Done,
    Failed,
    Blocked,
}

/// Run `work` for every dependency, children before dependents
///
/// With `continue_on_error` unset, the first failure stops new work from
/// starting; work already in flight is allowed to finish. Otherwise the
/// dependents of a failed dependency are reported as blocked and everything
/// unrelated still runs. Returns every error in completion order.
pub(crate) async fn run_ordered<F, Fut>(
    dependencies: &[Arc<Dependency>],
    concurrency: usize,
    continue_on_error: bool,
    work: F,
) -> Vec<RiggerError>
where
    F: Fn(Arc<Dependency>) -> Fut,
    Fut: Future<Output = RiggerResult<()>>,
{
    let concurrency = concurrency.max(1);
    let index: HashMap<_, _> = dependencies
        .iter()
        .enumerate()
        .map(|(i, dep)| (dep.id.clone(), i))
        .collect();

    let mut pending = vec![0usize; dependencies.len()];
    let mut dependents = vec![Vec::new(); dependencies.len()];
    for (i, dep) in dependencies.iter().enumerate() {
        for child in &dep.children {
            if let Some(&c) = index.get(child) {
                pending[i] += 1;
                dependents[c].push(i);
            }
        }
    }

    let mut status = vec![Status::Waiting; dependencies.len()];
    let mut ready: BTreeSet<usize> = (0..dependencies.len())
        .filter(|&i| pending[i] == 0)
        .collect();
    let mut in_flight = FuturesUnordered::new();
    let mut errors = Vec::new();
    let mut stopped = false;

    loop {
        while !stopped && in_flight.len() < concurrency {
            let Some(i) = ready.pop_first() else {
                break;
            };
            status[i] = Status::Running;
            let unit = work(Arc::clone(&dependencies[i]));
            in_flight.push(async move { (i, unit.await) });
        }

        let Some((i, result)) = in_flight.next().await else {
            break;
        };

        match result {
            Ok(()) => {
                status[i] = Status::Done;
                for &d in &dependents[i] {
                    pending[d] -= 1;
                    if pending[d] == 0 && status[d] == Status::Waiting {
                        ready.insert(d);
                    }
                }
            }
            Err(e) => {
                status[i] = Status::Failed;
                errors.push(e);

                if !continue_on_error {
                    debug!("Stopping after failure of {}", dependencies[i].id);
                    stopped = true;
                    continue;
                }

                let mut stack = dependents[i].clone();
                while let Some(d) = stack.pop() {
                    if status[d] != Status::Waiting {
                        continue;
                    }
                    status[d] = Status::Blocked;
                    ready.remove(&d);
                    warn!(
                        "Skipping {} because {} failed",
                        dependencies[d].id, dependencies[i].id
                    );
                    errors.push(RiggerError::Blocked {
                        dependency: dependencies[d].id.to_string(),
                        failed: dependencies[i].id.to_string(),
                    });
                    stack.extend(dependents[d].iter().copied());
                }
            }
        }
    }

    errors
}
