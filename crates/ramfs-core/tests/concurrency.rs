//! Multi-threaded access to one instance and to the registry.

use std::sync::{Arc, Barrier};
use std::thread;

use ramfs_core::{FsConfig, FsError, OpenOptions, RamFs, Registry};

const THREADS: usize = 8;
const ROUNDS: usize = 200;

#[test]
fn writers_on_different_files_during_listing() {
    let fs = Arc::new(RamFs::new("conc", FsConfig::default()));
    for t in 0..THREADS {
        fs.create_file(format!("/f{t}").as_str(), false).unwrap();
    }
    let barrier = Arc::new(Barrier::new(THREADS + 1));

    let writers: Vec<_> = (0..THREADS)
        .map(|t| {
            let fs = Arc::clone(&fs);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut ch = fs
                    .open_channel(format!("/f{t}").as_str(), OpenOptions::append())
                    .unwrap();
                barrier.wait();
                for _ in 0..ROUNDS {
                    ch.write(&[t as u8]).unwrap();
                }
            })
        })
        .collect();

    let lister = {
        let fs = Arc::clone(&fs);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..ROUNDS {
                assert_eq!(fs.list("/").unwrap().len(), THREADS);
            }
        })
    };

    for handle in writers {
        handle.join().unwrap();
    }
    lister.join().unwrap();

    for t in 0..THREADS {
        let body = fs.read_all(format!("/f{t}").as_str()).unwrap();
        assert_eq!(body.len(), ROUNDS);
        assert!(body.iter().all(|&b| b == t as u8));
    }
}

#[test]
fn shared_file_appends_are_not_lost() {
    let fs = Arc::new(RamFs::new("conc", FsConfig::default()));
    fs.create_file("/shared", false).unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let fs = Arc::clone(&fs);
            thread::spawn(move || {
                let mut ch = fs.open_channel("/shared", OpenOptions::append()).unwrap();
                for _ in 0..ROUNDS {
                    ch.write(b"xy").unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(fs.stat("/shared").unwrap().size, (THREADS * ROUNDS * 2) as u64);
}

#[test]
fn concurrent_structural_mutations_keep_tree_consistent() {
    let fs = Arc::new(RamFs::new("conc", FsConfig::default()));
    fs.create_directory("/src").unwrap();
    fs.create_directory("/dst").unwrap();
    for i in 0..ROUNDS {
        fs.create_file(format!("/src/{i}").as_str(), false).unwrap();
    }

    // Every thread races to move every file; each file moves exactly once.
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let fs = Arc::clone(&fs);
            thread::spawn(move || {
                let mut moved = 0usize;
                for i in 0..ROUNDS {
                    match fs.rename(
                        format!("/src/{i}").as_str(),
                        format!("/dst/{i}").as_str(),
                        false,
                    ) {
                        Ok(()) => moved += 1,
                        Err(FsError::NotFound(_)) => {}
                        Err(e) => panic!("unexpected error: {e}"),
                    }
                }
                moved
            })
        })
        .collect();

    let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(total, ROUNDS);
    assert_eq!(fs.list("/src").unwrap().len(), 0);
    assert_eq!(fs.list("/dst").unwrap().len(), ROUNDS);
}

#[test]
fn concurrent_create_has_one_winner() {
    let fs = Arc::new(RamFs::new("conc", FsConfig::default()));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let fs = Arc::clone(&fs);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                fs.create_directory("/contended").is_ok()
            })
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|&won| won)
        .count();
    assert_eq!(winners, 1);
}

#[test]
fn registry_register_races() {
    let registry = Arc::new(Registry::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                // Same identifier in different cases.
                let id = if t % 2 == 0 { "shared" } else { "SHARED" };
                let contended = registry.register(id, FsConfig::default()).is_ok();
                registry
                    .register(&format!("own-{t}"), FsConfig::default())
                    .unwrap();
                contended
            })
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|&won| won)
        .count();
    assert_eq!(winners, 1);
    assert_eq!(registry.len(), THREADS + 1);
}
