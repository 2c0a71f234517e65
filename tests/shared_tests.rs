use std::thread;

use trackvec::{Error, SharedTrackVec};

#[test]
fn test_basic_operations() {
    let v: SharedTrackVec<i32> = SharedTrackVec::new();
    assert_eq!(v.is_empty(), Ok(true));

    v.push_back(1).unwrap();
    v.push_back(2).unwrap();
    v.insert(1, 10).unwrap();

    assert_eq!(v.to_vec(), Ok(vec![1, 10, 2]));
    assert_eq!(v.len(), Ok(3));
    assert_eq!(v.front(), Ok(1));
    assert_eq!(v.back(), Ok(2));
    assert_eq!(v.get(1), Ok(10));

    assert_eq!(v.remove(1), Ok(10));
    assert_eq!(v.pop_back(), Ok(2));
    assert_eq!(v.pop_back(), Ok(1));
    assert_eq!(v.pop_back(), Err(Error::EmptyContainer));
}

#[test]
fn test_bounds_checking_matches_single_threaded() {
    let v = SharedTrackVec::from_vec(vec![1, 2]);
    assert_eq!(v.get(2), Err(Error::OutOfBounds { index: 2, len: 2 }));
    assert_eq!(v.set(5, 0), Err(Error::OutOfBounds { index: 5, len: 2 }));
    assert_eq!(
        v.insert(3, 0),
        Err(Error::OutOfBounds { index: 3, len: 2 })
    );
}

#[test]
fn test_clones_share_the_vector() {
    let a = SharedTrackVec::from_vec(vec![1]);
    let b = a.clone();

    b.push_back(2).unwrap();
    assert_eq!(a.to_vec(), Ok(vec![1, 2]));
}

#[test]
fn test_structure_lock_guard_derefs_to_slice() {
    let v = SharedTrackVec::from_vec(vec![10, 20, 30]);
    let guard = v.lock_structure().unwrap();

    assert_eq!(guard.len(), 3);
    assert_eq!(guard.as_slice(), &[10, 20, 30]);
    assert_eq!(guard[1], 20);
    let sum: i32 = guard.iter().sum();
    assert_eq!(sum, 60);
}

#[test]
fn test_mutation_fails_while_guard_is_alive() {
    let v = SharedTrackVec::from_vec(vec![1, 2, 3]);
    let guard = v.lock_structure().unwrap();

    // fails immediately, never blocks
    assert_eq!(v.push_back(4), Err(Error::StructureLocked));
    assert_eq!(v.pop_back(), Err(Error::StructureLocked));
    assert_eq!(v.resize(10, 0), Err(Error::StructureLocked));
    assert_eq!(v.clear(), Err(Error::StructureLocked));

    // shared guards do not conflict with each other
    let second = v.lock_structure().unwrap();
    assert_eq!(second.as_slice(), guard.as_slice());

    drop(guard);
    drop(second);
    v.push_back(4).unwrap();
    assert_eq!(v.len(), Ok(4));
}

#[test]
fn test_cross_thread_pushes() {
    let v: SharedTrackVec<i32> = SharedTrackVec::new();

    thread::scope(|scope| {
        for worker in 0..4 {
            let handle = v.clone();
            scope.spawn(move || {
                for i in 0..100 {
                    let value = worker * 100 + i;
                    // try-locking can conflict with another writer; retry
                    loop {
                        match handle.push_back(value) {
                            Ok(()) => break,
                            Err(Error::StructureLocked) => thread::yield_now(),
                            Err(other) => panic!("unexpected error: {other}"),
                        }
                    }
                }
            });
        }
    });

    let mut items = v.to_vec().unwrap();
    items.sort_unstable();
    assert_eq!(items.len(), 400);
    assert_eq!(items, (0..400).collect::<Vec<_>>());
}

#[test]
fn test_custom_shareable_type() {
    #[derive(Debug, Clone, PartialEq)]
    struct Reading {
        channel: u8,
        value: f64,
    }
    impl trackvec::AsyncShareable for Reading {}

    let v = SharedTrackVec::new();
    v.push_back(Reading {
        channel: 3,
        value: 0.5,
    })
    .unwrap();

    let reading = v.get(0).unwrap();
    assert_eq!(reading.channel, 3);
}

#[test]
fn test_resize_and_with_len() {
    let v = SharedTrackVec::with_len(3, 7u32);
    assert_eq!(v.to_vec(), Ok(vec![7, 7, 7]));

    v.resize(5, 0).unwrap();
    assert_eq!(v.to_vec(), Ok(vec![7, 7, 7, 0, 0]));

    v.resize(1, 0).unwrap();
    assert_eq!(v.to_vec(), Ok(vec![7]));
}
