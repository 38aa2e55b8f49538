use indexed_skiplist::*;

use rand::{Rng, SeedableRng};

#[test]
fn iter_empty() {
    let list: SkipList<i32> = Default::default();
    let mut iter = list.iter();
    assert!(iter.next().is_none());
}

#[test]
fn iter_single() {
    let key = 55;
    let mut list: SkipList<i32> = Default::default();
    list.insert(key);
    let mut iter = list.iter();

    assert_eq!(iter.next(), Some(&key));
    assert!(iter.next().is_none());
}

#[test]
fn iter_two() {
    let key_1 = 687;
    let key_2 = 55;

    let mut list: SkipList<i32> = Default::default();
    list.insert(key_1);
    list.insert(key_2);
    let mut iter = list.iter();

    assert_eq!(iter.next(), Some(&key_2));
    assert_eq!(iter.next(), Some(&key_1));
    assert!(iter.next().is_none());
}

#[test]
fn iter_in_order() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(1000);

    let mut list: SkipList<u32> = Default::default();
    let mut iteration_order = std::collections::BTreeSet::new();

    for _i in 0..1000 {
        let element = rng.gen::<u32>();
        list.insert(element);
        iteration_order.insert(element);
    }

    assert_eq!(list.len(), iteration_order.len());
    let mut number_of_elements_iterated = 0;
    for (key, set_element) in list.iter().zip(iteration_order.iter()) {
        assert_eq!(key, set_element);
        number_of_elements_iterated += 1;
    }
    assert_eq!(number_of_elements_iterated, iteration_order.len());
}

#[test]
fn iter_is_restartable() {
    let list: SkipList<u32> = (0..20).rev().collect();
    let first: Vec<&u32> = list.iter().collect();
    let second: Vec<&u32> = (&list).into_iter().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 20);
}

#[test]
fn iter_after_removals_and_rebuild() {
    let mut list: SkipList<u32> = (0..50).collect();
    for key in (0..50).filter(|k| k % 3 == 0) {
        list.remove(&key);
    }
    list.rebuild();

    let expected: Vec<u32> = (0..50).filter(|k| k % 3 != 0).collect();
    assert_eq!(list.iter().cloned().collect::<Vec<_>>(), expected);
    assert_eq!(list.into_iter().collect::<Vec<_>>(), expected);
}

#[test]
fn iter_remove_fails_loudly() {
    let list: SkipList<u32> = (0..5).collect();
    let mut iter = list.iter();
    assert_eq!(iter.next(), Some(&0));

    let error = iter.remove().unwrap_err();
    assert_eq!(error, Error::UnsupportedOperation("remove through an iterator"));
    assert_eq!(error.to_string(), "unsupported operation: remove through an iterator");
    assert_eq!(list.len(), 5);
}
