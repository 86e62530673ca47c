//! `langfuse::instance()` hands every caller the same client.

use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn instance_is_identical_across_threads() {
    const THREADS: usize = 8;
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                langfuse::instance().expect("client builds")
            })
        })
        .collect();

    let clients: Vec<&'static langfuse::Client> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread finished"))
        .collect();

    let first = clients[0];
    assert!(clients.iter().all(|client| std::ptr::eq(*client, first)));
    assert!(std::ptr::eq(langfuse::instance().expect("cached"), first));
}

#[test]
fn instance_matches_environment() {
    let client = langfuse::instance().expect("client builds");
    let expected = langfuse::env::config_from_env();

    assert_eq!(client.base_url(), expected.base_url);
    assert_eq!(
        client.auth_header(),
        langfuse::basic_auth(&expected.public_key, &expected.secret_key)
    );
}
