use std::sync::mpsc::channel;

use unwrap::unwrap;

/// Run `f` over each (key, data) pair on a pool of `thread_count` worker threads
///
/// Evidence from different chromosomes or chromosome pairs shares no state, so each key is
/// an independent task. Results are returned in the input key order regardless of the order in
/// which the tasks finish.
///
pub fn process_keys_in_parallel<K, V, R, F>(
    thread_count: usize,
    keyed_data: Vec<(K, V)>,
    f: F,
) -> Vec<R>
where
    K: Send,
    V: Send,
    R: Send,
    F: Fn(K, V) -> R + Sync,
{
    let worker_pool = unwrap!(
        rayon::ThreadPoolBuilder::new()
            .num_threads(thread_count)
            .build(),
        "Unable to create worker thread pool with {} threads",
        thread_count
    );

    let key_count = keyed_data.len();
    let f = &f;
    let (tx, rx) = channel();
    worker_pool.scope(move |scope| {
        for (key_index, (key, data)) in keyed_data.into_iter().enumerate() {
            let tx = tx.clone();
            scope.spawn(move |_| {
                let result = f(key, data);
                tx.send((key_index, result)).unwrap();
            });
        }
    });

    let mut results = (0..key_count).map(|_| None).collect::<Vec<_>>();
    for (key_index, result) in rx {
        results[key_index] = Some(result);
    }
    results.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_keys_in_parallel_order() {
        let keyed_data = (0..20)
            .map(|x| (format!("chr{x}"), vec![x; x]))
            .collect::<Vec<_>>();
        let results = process_keys_in_parallel(4, keyed_data, |key, data| (key, data.len()));
        assert_eq!(results.len(), 20);
        for (index, (key, len)) in results.into_iter().enumerate() {
            assert_eq!(key, format!("chr{index}"));
            assert_eq!(len, index);
        }
    }

    #[test]
    fn test_process_keys_in_parallel_empty() {
        let results = process_keys_in_parallel(2, Vec::<(usize, usize)>::new(), |k, v| k + v);
        assert!(results.is_empty());
    }
}
