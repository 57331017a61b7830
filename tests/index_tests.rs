//! Tests for Index
//!
//! These tests verify:
//! - Lookup precedence (tax id over name)
//! - Missing and unknown keys
//! - Lockstep put/remove of both keys

use compdir::{DirError, Index};

#[test]
fn test_lookup_by_tax_id() {
    let mut index = Index::new();
    index.put("123456789000", "Acme", 0);
    index.put("123456789001", "Globex", 417);

    assert_eq!(index.lookup(Some("123456789001"), None).unwrap(), 417);
}

#[test]
fn test_lookup_by_name() {
    let mut index = Index::new();
    index.put("123456789000", "Acme", 0);
    index.put("123456789001", "Globex", 417);

    assert_eq!(index.lookup(None, Some("Globex")).unwrap(), 417);
}

#[test]
fn test_lookup_tax_id_takes_precedence() {
    let mut index = Index::new();
    index.put("123456789000", "Acme", 0);
    index.put("123456789001", "Globex", 417);

    // Name would resolve elsewhere, but the tax id wins
    assert_eq!(index.lookup(Some("123456789000"), Some("Globex")).unwrap(), 0);

    // An unknown tax id does not fall back to the name
    assert!(matches!(
        index.lookup(Some("999999999999"), Some("Globex")),
        Err(DirError::NotFound)
    ));
}

#[test]
fn test_lookup_missing_key() {
    let index = Index::new();

    assert!(matches!(index.lookup(None, None), Err(DirError::MissingKey)));
    assert!(matches!(index.lookup(Some(""), Some("")), Err(DirError::MissingKey)));
}

#[test]
fn test_lookup_empty_tax_id_falls_back_to_name() {
    let mut index = Index::new();
    index.put("123456789000", "Acme", 834);

    assert_eq!(index.lookup(Some(""), Some("Acme")).unwrap(), 834);
}

#[test]
fn test_lookup_not_found() {
    let index = Index::new();

    assert!(matches!(index.lookup(Some("123456789000"), None), Err(DirError::NotFound)));
    assert!(matches!(index.lookup(None, Some("Acme")), Err(DirError::NotFound)));
}

#[test]
fn test_put_overwrites_offset() {
    let mut index = Index::new();
    index.put("123456789000", "Acme", 834);
    index.put("123456789000", "Acme", 0);

    assert_eq!(index.len(), 1);
    assert_eq!(index.offset_of_tax_id("123456789000"), Some(0));
    assert_eq!(index.offset_of_name("Acme"), Some(0));
}

#[test]
fn test_empty_name_not_indexed() {
    let mut index = Index::new();
    index.put("123456789000", "", 0);

    assert_eq!(index.len(), 1);
    assert_eq!(index.offset_of_name(""), None);
}

#[test]
fn test_remove_drops_both_keys() {
    let mut index = Index::new();
    index.put("123456789000", "Acme", 0);
    index.put("123456789001", "Globex", 417);

    index.remove("123456789000", "Acme");

    assert_eq!(index.len(), 1);
    assert_eq!(index.offset_of_tax_id("123456789000"), None);
    assert_eq!(index.offset_of_name("Acme"), None);
    assert_eq!(index.offsets(), vec![417]);
}

#[test]
fn test_remove_keeps_name_owned_by_other_row() {
    let mut index = Index::new();
    index.put("123456789000", "Acme", 0);
    index.put("123456789001", "Globex", 417);

    // Name belongs to a different row; only the tax id goes
    index.remove("123456789000", "Globex");

    assert_eq!(index.offset_of_name("Globex"), Some(417));
    assert_eq!(index.offset_of_name("Acme"), Some(0));
    assert_eq!(index.offset_of_tax_id("123456789000"), None);
}

#[test]
fn test_remove_unknown_is_noop() {
    let mut index = Index::new();
    index.put("123456789000", "Acme", 0);

    index.remove("999999999999", "Acme");

    assert_eq!(index.len(), 1);
    assert_eq!(index.offset_of_name("Acme"), Some(0));
}

#[test]
fn test_offsets_sorted() {
    let mut index = Index::new();
    index.put("123456789002", "C", 834);
    index.put("123456789000", "A", 0);
    index.put("123456789001", "B", 417);

    assert_eq!(index.offsets(), vec![0, 417, 834]);
    assert!(!index.is_empty());

    index.clear();
    assert!(index.is_empty());
    assert!(index.offsets().is_empty());
}
