use super::*;

#[test]
fn reference_pool_has_nine_items_in_order() {
    let pool = Pool::reference();
    assert_eq!(pool.len(), 9);
    assert_eq!(pool.get(0).map(|item| item.label.as_str()), Some("Alpha"));
    assert_eq!(pool.get(8).map(|item| item.label.as_str()), Some("India"));
    assert_eq!(pool.full_mask(), 0b1_1111_1111);
}

#[test]
fn reference_pool_passes_validation() {
    let items: Vec<PoolItem> = Pool::reference().iter().cloned().collect();
    assert_eq!(Pool::new(items).unwrap(), Pool::reference());
}

#[test]
fn from_label_derives_slug_id() {
    let item = PoolItem::from_label("  Secret Santa #1 ");
    assert_eq!(item.label, "Secret Santa #1");
    assert_eq!(item.id, "secret-santa-1");
}

#[test]
fn new_rejects_empty_pool() {
    assert_eq!(Pool::new(Vec::new()).unwrap_err(), PoolError::Empty);
}

#[test]
fn new_rejects_more_than_mask_width() {
    let labels: Vec<String> = (0..33).map(|i| format!("item {i}")).collect();
    let err = Pool::from_labels(labels.as_slice()).unwrap_err();
    assert_eq!(err, PoolError::TooLarge(33));
}

#[test]
fn thirty_two_items_use_the_whole_mask() {
    let labels: Vec<String> = (0..32).map(|i| format!("item {i}")).collect();
    let pool = Pool::from_labels(labels.as_slice()).unwrap();
    assert_eq!(pool.full_mask(), u32::MAX);
}

#[test]
fn new_rejects_duplicate_labels() {
    let err = Pool::from_labels(&["a", "b", "a"]).unwrap_err();
    assert_eq!(err, PoolError::Duplicate("a".to_owned()));
}

#[test]
fn new_rejects_id_colliding_with_other_label() {
    let items = vec![PoolItem::new("x", "Left"), PoolItem::new("Left", "Right")];
    let err = Pool::new(items).unwrap_err();
    assert_eq!(err, PoolError::Duplicate("Left".to_owned()));
}

#[test]
fn new_rejects_blank_label() {
    let items = vec![PoolItem::new("a", "A"), PoolItem::new("b", "   ")];
    let err = Pool::new(items).unwrap_err();
    assert_eq!(err, PoolError::BlankLabel(1));
}

#[test]
fn from_labels_rejects_label_without_letters_or_digits() {
    let err = Pool::from_labels(&["ok", "!!!", "???"]).unwrap_err();
    assert_eq!(err, PoolError::BlankId(1));
    assert!(err.to_string().contains("pool item 1"));
}

#[test]
fn new_rejects_blank_id() {
    let err = Pool::new(vec![PoolItem::new(" ", "Named")]).unwrap_err();
    assert_eq!(err, PoolError::BlankId(0));
}

#[test]
fn parse_list_trims_segments() {
    let pool = Pool::parse_list(" red, green ,blue ").unwrap();
    let labels: Vec<&str> = pool.iter().map(|item| item.label.as_str()).collect();
    assert_eq!(labels, ["red", "green", "blue"]);
}

#[test]
fn parse_list_rejects_empty_input_and_empty_segments() {
    assert_eq!(Pool::parse_list("  ").unwrap_err(), PoolError::Empty);
    assert_eq!(Pool::parse_list("a,,b").unwrap_err(), PoolError::BlankLabel(1));
}

#[test]
fn index_of_matches_id_or_label() {
    let pool = Pool::reference();
    assert_eq!(pool.index_of("Charlie"), Some(2));
    assert_eq!(pool.index_of("charlie"), Some(2));
    assert_eq!(pool.index_of("Zulu"), None);
}

#[test]
fn items_in_yields_set_bits_in_pool_order() {
    let pool = Pool::reference();
    let picked: Vec<usize> = pool
        .items_in(0b1_0010_0100)
        .map(|(index, _)| index)
        .collect();
    assert_eq!(picked, [2, 5, 8]);
}
