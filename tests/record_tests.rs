//! Record Codec Tests
//!
//! These tests verify:
//! - Fixed-width row layout
//! - Decoding and padding removal
//! - Validation of key length, field size and forbidden characters

use compdir::record::{decode_row, encode_row, Company, MAX_FIELD_SIZE, RECORD_SIZE};
use compdir::DirError;

// =============================================================================
// Helper Functions
// =============================================================================

fn sample(tax_id: &str, name: &str) -> Company {
    Company::new(tax_id, name, "+7 495 000-00-00", "Moscow Tverskaya 1", "Ivan Petrov")
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_record_size_constant() {
    assert_eq!(RECORD_SIZE, 417);
}

#[test]
fn test_encode_row_is_fixed_width() {
    let row = encode_row(&sample("123456789000", "Acme")).unwrap();
    assert_eq!(row.len(), RECORD_SIZE);

    let empty = encode_row(&Company::new("000000000000", "", "", "", "")).unwrap();
    assert_eq!(empty.len(), RECORD_SIZE);
}

#[test]
fn test_encode_row_layout() {
    let row = encode_row(&sample("123456789000", "Acme")).unwrap();

    assert_eq!(&row[..12], b"123456789000");
    assert_eq!(row[12], b',');
    assert_eq!(&row[13..17], b"Acme");
    assert!(row[17..113].iter().all(|&b| b == b' '));
    assert_eq!(row[113], b',');
    assert_eq!(row[214], b',');
    assert_eq!(row[315], b',');
    assert_eq!(row[RECORD_SIZE - 1], b'\n');
}

#[test]
fn test_encode_row_matches_legacy_file_format() {
    let company = Company::new(
        "123456789000",
        "Name123456789000",
        "Phone123456789000",
        "Address123456789000",
        "IndividualSomethingBigMore123456789000",
    );

    let expected = format!(
        "123456789000,{:<100},{:<100},{:<100},{:<100}\n",
        "Name123456789000",
        "Phone123456789000",
        "Address123456789000",
        "IndividualSomethingBigMore123456789000"
    );

    assert_eq!(&encode_row(&company).unwrap()[..], expected.as_bytes());
}

#[test]
fn test_encode_row_accepts_max_field_size() {
    let long = "x".repeat(MAX_FIELD_SIZE);
    let company = Company::new("123456789000", &long, &long, &long, &long);

    let row = encode_row(&company).unwrap();
    assert_eq!(row.len(), RECORD_SIZE);
    assert_eq!(decode_row(&row).unwrap(), company);
}

#[test]
fn test_encode_row_multibyte_name() {
    // 2 bytes per char: 50 chars is exactly 100 bytes
    let name = "Ж".repeat(50);
    let company = Company::new("123456789000", &name, "", "", "");

    let row = encode_row(&company).unwrap();
    assert_eq!(row.len(), RECORD_SIZE);
    assert_eq!(decode_row(&row).unwrap().name, name);
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_validate_rejects_short_tax_id() {
    let result = encode_row(&sample("12345", "Acme"));
    assert!(matches!(result, Err(DirError::Validation(_))));
}

#[test]
fn test_validate_rejects_long_tax_id() {
    let result = encode_row(&sample("1234567890001", "Acme"));
    assert!(matches!(result, Err(DirError::Validation(_))));
}

#[test]
fn test_validate_rejects_non_numeric_tax_id() {
    let result = encode_row(&sample("12345678900a", "Acme"));
    assert!(matches!(result, Err(DirError::Validation(_))));
}

#[test]
fn test_validate_rejects_oversized_field() {
    let long = "x".repeat(MAX_FIELD_SIZE + 1);

    let mut company = sample("123456789000", "Acme");
    company.representative = long.clone();
    assert!(matches!(encode_row(&company), Err(DirError::Validation(_))));

    let company = sample("123456789000", &long);
    assert!(matches!(encode_row(&company), Err(DirError::Validation(_))));
}

#[test]
fn test_validate_rejects_multibyte_overflow() {
    // 51 two-byte chars = 102 bytes
    let company = sample("123456789000", &"Ж".repeat(51));
    assert!(matches!(company.validate(), Err(DirError::Validation(_))));
}

#[test]
fn test_validate_rejects_forbidden_characters() {
    for bad in ["Acme, Inc", "Acme \"Best\"", "Acme\nInc", "Acme\rInc"] {
        let company = sample("123456789000", bad);
        assert!(
            matches!(company.validate(), Err(DirError::Validation(_))),
            "{:?} should be rejected",
            bad
        );
    }
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_decode_round_trip() {
    let company = sample("123456789000", "Acme");
    let row = encode_row(&company).unwrap();

    assert_eq!(decode_row(&row).unwrap(), company);
}

#[test]
fn test_decode_strips_trailing_spaces_from_input() {
    // Trailing spaces are indistinguishable from padding
    let company = Company::new("123456789000", "Acme   ", "", "", "");
    let row = encode_row(&company).unwrap();

    assert_eq!(decode_row(&row).unwrap().name, "Acme");
}

#[test]
fn test_decode_keeps_leading_and_inner_spaces() {
    let company = Company::new("123456789000", "  Acme  Corp", "", "", "");
    let row = encode_row(&company).unwrap();

    assert_eq!(decode_row(&row).unwrap().name, "  Acme  Corp");
}

#[test]
fn test_decode_rejects_wrong_length() {
    let row = encode_row(&sample("123456789000", "Acme")).unwrap();

    let result = decode_row(&row[..RECORD_SIZE - 1]);
    assert!(matches!(result, Err(DirError::Decode(_))));
}

#[test]
fn test_decode_rejects_missing_terminator() {
    let mut row = encode_row(&sample("123456789000", "Acme")).unwrap().to_vec();
    row[RECORD_SIZE - 1] = b' ';

    assert!(matches!(decode_row(&row), Err(DirError::Decode(_))));
}

#[test]
fn test_decode_rejects_wrong_field_count() {
    let mut row = encode_row(&sample("123456789000", "Acme")).unwrap().to_vec();
    // Turn padding into an extra delimiter
    row[50] = b',';

    match decode_row(&row) {
        Err(DirError::Decode(msg)) => assert!(msg.contains("expected 5, got 6"), "{}", msg),
        other => panic!("Expected Decode error, got {:?}", other),
    }
}

#[test]
fn test_decode_rejects_invalid_stored_key() {
    let mut row = encode_row(&sample("123456789000", "Acme")).unwrap().to_vec();
    row[0] = b'X';

    assert!(matches!(decode_row(&row), Err(DirError::Decode(_))));
}

#[test]
fn test_decode_rejects_invalid_utf8() {
    let mut row = encode_row(&sample("123456789000", "Acme")).unwrap().to_vec();
    row[20] = 0xFF;

    assert!(matches!(decode_row(&row), Err(DirError::Decode(_))));
}

#[test]
fn test_from_fields_wrong_count() {
    match Company::from_fields(&["123456789000", "Acme"]) {
        Err(DirError::Decode(msg)) => assert!(msg.contains("expected 5, got 2"), "{}", msg),
        other => panic!("Expected Decode error, got {:?}", other),
    }
}
