use std::cell::Cell;
use std::cmp::Ordering;
use std::rc::Rc;

use nexus_chain::{Error, Sll};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a test subscriber filtered by `NEXUS_CHAIN_LOG` (default `warn`).
fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("NEXUS_CHAIN_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

fn cmp_int(a: &i32, b: &i32) -> Ordering {
    a.cmp(b)
}

/// Builds `[start, end)` in ascending order.
fn build_int_list(start: i32, end: i32) -> Sll<i32> {
    let mut list = Sll::new();
    for value in (start..end).rev() {
        list.push(value).unwrap();
    }
    list
}

fn verify_int_list(list: &Sll<i32>, start: i32, end: i32) -> bool {
    list.iter().copied().eq(start..end)
}

// =============================================================================
// Building and draining
// =============================================================================

#[test]
fn push_hundred_then_pop_all() {
    init_tracing();
    let mut list = build_int_list(0, 100);
    assert!(verify_int_list(&list, 0, 100));

    for i in 0..100 {
        assert_eq!(list.pop(), Ok(i));
    }
    assert!(list.is_empty());
    assert_eq!(list.pop(), Err(Error::Empty));
}

#[test]
fn positional_edits() {
    init_tracing();
    let mut list = build_int_list(0, 10);

    list.insert_ith(5, 100).unwrap();
    assert_eq!(list.ith(5), Ok(&100));
    assert_eq!(list.ith(6), Ok(&5));
    assert_eq!(list.length(), 11);

    assert_eq!(list.remove_ith(5), Ok(100));
    assert!(verify_int_list(&list, 0, 10));

    assert_eq!(
        list.insert_ith(12, 0),
        Err(Error::IndexOutOfRange { index: 12, len: 10 })
    );
}

#[test]
fn map_over_doubles() {
    init_tracing();
    let mut list: Sll<f64> = Sll::new();
    for value in [0.5, 1.25, 2.25] {
        list.append(value).unwrap();
    }

    let mut total = 0.0;
    list.map(|v, total| *total += v, &mut total);
    assert!((total - 4.0).abs() < f64::EPSILON);
}

#[test]
fn owned_payloads_move_out() {
    init_tracing();
    let mut list: Sll<String> = Sll::new();
    for word in ["gamma", "alpha", "beta"] {
        list.push(word.to_owned()).unwrap();
    }

    list.merge_sort(|a, b| a.cmp(b));
    assert_eq!(
        list.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["alpha", "beta", "gamma"]
    );

    let first = list.pop().unwrap();
    assert_eq!(first, "alpha");
    assert_eq!(list.last().map(String::as_str), Some("gamma"));
}

// =============================================================================
// Ownership accounting
// =============================================================================

#[test]
fn destructor_sees_every_released_element_once() {
    init_tracing();
    let released = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&released);
    let mut list = Sll::with_destructor(move |_: i32| counter.set(counter.get() + 1));

    for value in [1, 1, 2, 3, 3, 3, 4] {
        list.append(value).unwrap();
    }

    // Moved out to the caller, never destroyed by the list
    assert_eq!(list.pop(), Ok(1));
    assert_eq!(list.remove_ith(0), Ok(1));
    assert_eq!(released.get(), 0);

    assert_eq!(list.remove_duplicates(cmp_int), 2);
    assert_eq!(released.get(), 2);

    list.free();
    assert_eq!(released.get(), 5);
}

#[test]
fn list_of_lists_drops_inner_lists() {
    init_tracing();
    let released = Rc::new(Cell::new(0usize));

    let mut outer: Sll<Sll<i32>> = Sll::new();
    for _ in 0..3 {
        let counter = Rc::clone(&released);
        let mut inner = Sll::with_destructor(move |_: i32| counter.set(counter.get() + 1));
        for value in 0..4 {
            inner.push(value).unwrap();
        }
        outer.push(inner).unwrap();
    }

    drop(outer);
    assert_eq!(released.get(), 12);
}

// =============================================================================
// Algorithm walkthroughs
// =============================================================================

#[test]
fn split_sort_merge_round_trip() {
    init_tracing();
    let mut list: Sll<i32> = Sll::new();
    for value in [7, 3, 9, 1, 8, 2, 6, 4, 5, 0] {
        list.push(value).unwrap();
    }

    let mut front = Sll::new();
    let mut back = Sll::new();
    list.front_back_split(&mut front, &mut back).unwrap();
    assert_eq!(front.length(), 5);
    assert_eq!(back.length(), 5);

    front.insert_sort(cmp_int);
    back.bubble_sort(cmp_int);
    front.sorted_merge(&mut back, cmp_int).unwrap();

    assert!(verify_int_list(&front, 0, 10));
    assert!(back.is_empty());
}

#[test]
fn intersect_after_dedup() {
    init_tracing();
    let mut evens = Sll::new();
    let mut threes = Sll::new();
    for value in (0..30).rev() {
        if value % 2 == 0 {
            evens.push(value).unwrap();
            evens.push(value).unwrap();
        }
        if value % 3 == 0 {
            threes.push(value).unwrap();
        }
    }

    evens.remove_duplicates(cmp_int);
    assert_eq!(evens.length(), 15);

    let sixes = evens.sorted_intersect(&threes, cmp_int).unwrap();
    assert_eq!(
        sixes.iter().copied().collect::<Vec<_>>(),
        vec![0, 6, 12, 18, 24]
    );
}

#[test]
fn alternating_split_then_shuffle_merge_restores_reversed_pairs() {
    init_tracing();
    let mut list = build_int_list(0, 6);
    let mut a = Sll::new();
    let mut b = Sll::new();
    list.alternating_split(&mut a, &mut b).unwrap();

    assert_eq!(a.iter().copied().collect::<Vec<_>>(), vec![4, 2, 0]);
    assert_eq!(b.iter().copied().collect::<Vec<_>>(), vec![5, 3, 1]);

    b.shuffle_merge(&mut a).unwrap();
    assert_eq!(
        b.iter().copied().collect::<Vec<_>>(),
        vec![5, 4, 3, 2, 1, 0]
    );
}

#[test]
fn bounded_list_reports_out_of_memory() {
    init_tracing();
    let mut list: Sll<i32> = Sll::bounded(3);
    for value in 0..3 {
        list.append(value).unwrap();
    }

    assert_eq!(list.append(3), Err(Error::OutOfMemory));
    assert_eq!(list.push(3), Err(Error::OutOfMemory));
    assert!(verify_int_list(&list, 0, 3));

    // A freed slot is usable again
    list.pop().unwrap();
    list.append(3).unwrap();
    assert!(verify_int_list(&list, 1, 4));
}

#[test]
fn narrow_index_type() {
    init_tracing();
    // u8 links: 255 is the sentinel, so 255 nodes fit
    let mut list: Sll<u16, u8> = Sll::default();
    for value in 0..255 {
        list.push(value).unwrap();
    }
    assert_eq!(list.push(255), Err(Error::OutOfMemory));

    list.reverse();
    assert_eq!(list.ith(254), Ok(&254));
}
