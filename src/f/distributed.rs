use std::thread::{self, available_parallelism, ScopedJoinHandle};

pub type Task<'env, T> = Box<dyn (FnOnce() -> T) + Send + 'env>;

/// Runs independent tasks across one scoped thread per core, round-robin batched.
/// Results come back in submission order.
pub fn distributed<'env, T: Send>(tasks: Vec<Task<'env, T>>) -> Vec<T> {
    let cores: usize = available_parallelism().map(|n| n.get()).unwrap_or(1);
    let mut batches: Vec<Vec<(usize, Task<'env, T>)>> = Vec::with_capacity(cores);

    for _ in 0..cores {
        batches.push(vec![]);
    }

    for (i, task) in tasks.into_iter().enumerate() {
        batches[i % cores].push((i, task));
    }

    let mut results: Vec<(usize, T)> = thread::scope(|s| {
        let handles: Vec<ScopedJoinHandle<Vec<(usize, T)>>> = batches
            .into_iter()
            .filter(|batch| !batch.is_empty())
            .map(|batch| {
                s.spawn(move || {
                    batch
                        .into_iter()
                        .map(|(i, task)| (i, task()))
                        .collect::<Vec<(usize, T)>>()
                })
            })
            .collect();

        let mut results = vec![];
        for handle in handles.into_iter() {
            match handle.join() {
                Ok(mut v) => results.append(&mut v),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        results
    });

    results.sort_by_key(|(i, _)| *i);
    results.into_iter().map(|(_, r)| r).collect()
}
