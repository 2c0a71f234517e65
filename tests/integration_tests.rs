use trackvec::{Error, TrackVec};

#[test]
fn test_construction_variants() {
    let empty: TrackVec<i32> = TrackVec::new();
    assert!(empty.is_empty());

    let defaulted: TrackVec<i32> = TrackVec::default();
    assert_eq!(defaulted.len(), 0);

    let filled = TrackVec::with_len(4, 7);
    assert_eq!(filled.to_vec(), vec![7, 7, 7, 7]);

    let from_vec = TrackVec::from_vec(vec![1, 2]);
    let from_slice = TrackVec::from_slice(&[1, 2]);
    let from_into: TrackVec<i32> = vec![1, 2].into();
    let collected: TrackVec<i32> = (1..=2).collect();
    assert_eq!(from_vec, from_slice);
    assert_eq!(from_into, collected);
}

#[test]
fn test_container_comparisons_are_elementwise() {
    let a = TrackVec::from_vec(vec![1, 2, 3]);
    let b = TrackVec::from_vec(vec![1, 2, 3]);
    let c = TrackVec::from_vec(vec![1, 2, 4]);
    let shorter = TrackVec::from_vec(vec![1, 2]);

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a < c);
    assert!(shorter < a);
    assert!(c >= a);
}

#[test]
fn test_deep_clone_has_its_own_registry() {
    let original = TrackVec::from_vec(vec![1, 2, 3]);
    let cursor = original.cursor_at(1).unwrap();

    let mut copy = original.clone();
    assert_eq!(copy, original);
    assert_eq!(copy.cursor_count(), 0);

    copy.remove(0).unwrap();
    // the original's cursor is unaffected by mutating the copy
    assert_eq!(cursor.index(), 1);
    assert_eq!(cursor.get(), Ok(2));
}

#[test]
fn test_interleaved_mutations_keep_cursors_consistent() {
    let mut v: TrackVec<i32> = (0..10).collect();
    let mut tracked: Vec<_> = [2, 5, 8]
        .into_iter()
        .map(|i| (v.cursor_at(i).unwrap(), i as i32))
        .collect();

    v.remove(0).unwrap(); // [1..10]
    v.insert(0, -1).unwrap(); // [-1, 1, 2, ...]
    v.remove(4).unwrap(); // removes 4
    v.push_back(99).unwrap();
    v.insert_slice(1, &[50, 51]).unwrap();

    // every surviving cursor still dereferences to its original value
    for (cursor, expected) in &mut tracked {
        assert!(cursor.points_to_an_item());
        assert_eq!(cursor.get(), Ok(*expected));
    }
}

#[test]
fn test_cursor_driven_traversal() {
    let v: TrackVec<i32> = [1, 2, 3, 4].into_iter().collect();

    let mut forward = Vec::new();
    let mut c = v.cbegin();
    while c.points_to_an_item() {
        forward.push(c.get().unwrap());
        c.set_to_next().unwrap();
    }
    assert_eq!(forward, vec![1, 2, 3, 4]);
    assert!(c.points_to_end_marker());

    let mut backward = Vec::new();
    while c.has_previous() {
        c.set_to_previous().unwrap();
        backward.push(c.get().unwrap());
    }
    assert_eq!(backward, vec![4, 3, 2, 1]);
}

#[test]
fn test_for_each_and_with_item() {
    let v = TrackVec::from_vec(vec![1, 2, 3]);
    let mut sum = 0;
    v.for_each(|item| sum += item);
    assert_eq!(sum, 6);

    let squared = v.with_item(2, |item| item * item).unwrap();
    assert_eq!(squared, 9);
}

#[test]
fn test_lock_cursor_mutation_lifecycle() {
    // A full pass through the library's moving parts: build, track, lock,
    // unlock, mutate, verify.
    let mut v: TrackVec<i32> = (1..=6).map(|i| i * i).collect();
    let tracked = v.cursor_at(2).unwrap(); // value 9

    {
        let guard = v.lock_structure();
        let snapshot = guard.with_slice(|items| items.to_vec());
        assert_eq!(snapshot, vec![1, 4, 9, 16, 25, 36]);
        assert_eq!(v.remove(0), Err(Error::StructureLocked));
    }

    assert_eq!(v.remove(0), Ok(1));
    assert_eq!(v.remove(0), Ok(4));
    assert_eq!(tracked.index(), 0);
    assert_eq!(tracked.get(), Ok(9));

    let inserted = v.insert(0, 100).unwrap();
    assert_eq!(inserted.get(), Ok(100));
    assert_eq!(tracked.index(), 1);

    let erased_next = v.erase_at(&inserted).unwrap();
    assert_eq!(erased_next.get(), Ok(9));
    assert!(inserted.points_to_end_marker());
    assert_eq!(tracked.index(), 0);

    assert_eq!(v.to_vec(), vec![9, 16, 25, 36]);
}

#[test]
fn test_erase_range_between_cursors() {
    let mut v: TrackVec<i32> = (0..10).collect();
    let mut first = v.begin();
    first.advance(3).unwrap();
    let mut last = v.begin();
    last.advance(7).unwrap();

    let after = v.erase_range_at(&first, &last).unwrap();
    assert_eq!(v.to_vec(), vec![0, 1, 2, 7, 8, 9]);
    assert_eq!(after.index(), 3);
    assert_eq!(after.get(), Ok(7));
}

#[test]
fn test_many_cursors_across_spill_and_release() {
    let mut v: TrackVec<i32> = (0..20).collect();

    let mut cursors = Vec::new();
    for i in 0..12 {
        cursors.push(v.cursor_at(i).unwrap());
    }
    assert_eq!(v.cursor_count(), 12);

    // drop half, mutate, the survivors still track
    cursors.truncate(6);
    assert_eq!(v.cursor_count(), 6);

    v.insert(0, -1).unwrap();
    for (i, cursor) in cursors.iter().enumerate() {
        assert_eq!(cursor.index(), i + 1);
        assert_eq!(cursor.get(), Ok(i as i32));
    }
}
