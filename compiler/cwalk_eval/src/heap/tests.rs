use super::*;
use pretty_assertions::assert_eq;

#[test]
fn allocation_is_zero_filled() {
    let mut heap = Heap::new();
    let base = heap.allocate(16).unwrap();
    for offset in [0, 4, 8, 12] {
        assert_eq!(heap.read(base + offset), Ok(0));
    }
}

#[test]
fn null_is_never_mapped() {
    let mut heap = Heap::new();
    heap.allocate(8).unwrap();
    assert_eq!(heap.read(0), Err(HeapError::Unmapped { address: 0 }));
    assert!(HEAP_BASE > 0);
}

#[test]
fn write_then_read() {
    let mut heap = Heap::new();
    let base = heap.allocate(8).unwrap();
    heap.write(base + 4, 42).unwrap();
    assert_eq!(heap.read(base + 4), Ok(42));
    assert_eq!(heap.read(base), Ok(0));
}

#[test]
fn unaligned_access_rounds_down() {
    let mut heap = Heap::new();
    let base = heap.allocate(8).unwrap();
    heap.write(base + 5, 3).unwrap();
    assert_eq!(heap.read(base + 4), Ok(3));
    assert_eq!(heap.read(base + 7), Ok(3));
}

#[test]
fn partial_word_sizes_round_up_to_whole_words() {
    let mut heap = Heap::new();
    let base = heap.allocate(5).unwrap();
    heap.write(base + 4, 1).unwrap();
    assert_eq!(
        heap.read(base + 8),
        Err(HeapError::Unmapped { address: base + 8 })
    );
}

#[test]
fn blocks_are_separated_by_a_guard_word() {
    let mut heap = Heap::new();
    let first = heap.allocate(8).unwrap();
    let second = heap.allocate(8).unwrap();
    assert_eq!(second, first + 8 + WORD_SIZE);
    assert_eq!(
        heap.write(first + 8, 1),
        Err(HeapError::Unmapped { address: first + 8 })
    );
}

#[test]
fn out_of_bounds_is_unmapped() {
    let mut heap = Heap::new();
    let base = heap.allocate(4).unwrap();
    assert_eq!(
        heap.read(base - 4),
        Err(HeapError::Unmapped { address: base - 4 })
    );
    assert_eq!(
        heap.read(base + 400),
        Err(HeapError::Unmapped { address: base + 400 })
    );
}

#[test]
fn access_after_free_is_detected() {
    let mut heap = Heap::new();
    let base = heap.allocate(8).unwrap();
    heap.free(base).unwrap();
    assert_eq!(heap.read(base), Err(HeapError::UseAfterFree { address: base }));
    assert_eq!(
        heap.write(base + 4, 1),
        Err(HeapError::UseAfterFree { address: base + 4 })
    );
}

#[test]
fn double_free_is_detected() {
    let mut heap = Heap::new();
    let base = heap.allocate(4).unwrap();
    heap.free(base).unwrap();
    assert_eq!(heap.free(base), Err(HeapError::DoubleFree { address: base }));
}

#[test]
fn interior_and_unknown_frees_are_rejected() {
    let mut heap = Heap::new();
    let base = heap.allocate(8).unwrap();
    assert_eq!(
        heap.free(base + 4),
        Err(HeapError::InvalidFree { address: base + 4 })
    );
    assert_eq!(heap.free(0), Err(HeapError::InvalidFree { address: 0 }));
    assert_eq!(heap.live_allocations(), 1);
}

#[test]
fn reused_slot_does_not_revive_stale_addresses() {
    let mut heap = Heap::new();
    let old = heap.allocate(4).unwrap();
    let (old_handle, _) = heap.allocation_at(old).unwrap();
    heap.free(old).unwrap();

    let new = heap.allocate(4).unwrap();
    let (new_handle, size) = heap.allocation_at(new).unwrap();
    assert_ne!(old, new);
    assert_eq!(size, 4);
    assert_eq!(new_handle.slot(), old_handle.slot());
    assert_eq!(new_handle.generation(), old_handle.generation() + 1);

    assert_eq!(heap.read(old), Err(HeapError::UseAfterFree { address: old }));
    assert_eq!(heap.free(old), Err(HeapError::DoubleFree { address: old }));
    assert_eq!(heap.read(new), Ok(0));
}

#[test]
fn invalid_sizes_are_rejected() {
    let mut heap = Heap::new();
    assert_eq!(heap.allocate(-1), Err(HeapError::InvalidSize { size: -1 }));
    assert_eq!(
        heap.allocate(i64::MAX),
        Err(HeapError::Exhausted { size: i64::MAX })
    );
    assert_eq!(heap.live_allocations(), 0);
}

#[test]
fn zero_sized_block_has_a_base_but_no_words() {
    let mut heap = Heap::new();
    let base = heap.allocate(0).unwrap();
    assert_eq!(heap.read(base), Err(HeapError::Unmapped { address: base }));
    assert_eq!(heap.free(base), Ok(()));
}

#[test]
fn live_allocation_count_tracks_frees() {
    let mut heap = Heap::new();
    let a = heap.allocate(4).unwrap();
    let _b = heap.allocate(4).unwrap();
    assert_eq!(heap.live_allocations(), 2);
    heap.free(a).unwrap();
    assert_eq!(heap.live_allocations(), 1);
    assert_eq!(heap.allocation_at(a), None);
}

#[test]
fn freed_ranges_stay_reserved_across_slot_reuse() {
    let mut heap = Heap::new();
    let first = heap.allocate(4).unwrap();
    heap.free(first).unwrap();
    let mut last = first;
    for _ in 0..9 {
        let base = heap.allocate(4).unwrap();
        assert!(base > last);
        heap.free(base).unwrap();
        last = base;
    }

    // One slot served every allocation; each range is a tombstone.
    assert_eq!(heap.live_allocations(), 0);
    assert_eq!(heap.tombstones(), 10);
    assert_eq!(
        heap.read(first),
        Err(HeapError::UseAfterFree { address: first })
    );
    let again = heap.allocate(4).unwrap();
    assert_eq!(heap.allocation_at(again).unwrap().0.slot(), 0);
    assert_eq!(heap.tombstones(), 10);
}
