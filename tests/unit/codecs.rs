//! Exact-layout tests for the VByte and Elias-γ codecs.

use lince::codecs::{
    compute_dgaps, gamma_decode, gamma_encode, restore_dgaps, vbyte_decode, vbyte_encode,
};

// ============================================================================
// VBYTE
// ============================================================================

#[test]
fn vbyte_small_values_take_one_byte() {
    // Terminator = high bit on the (single) byte
    assert_eq!(vbyte_encode(&[0]), vec![0x80]);
    assert_eq!(vbyte_encode(&[1]), vec![0x81]);
    assert_eq!(vbyte_encode(&[127]), vec![0xFF]);
}

#[test]
fn vbyte_emits_low_groups_first() {
    // 300 = 0b10_0101100 → groups 0101100, 10; terminator on the last
    assert_eq!(vbyte_encode(&[300]), vec![0x2C, 0x82]);
    assert_eq!(vbyte_decode(&[0x2C, 0x82]).unwrap(), vec![300]);
}

#[test]
fn vbyte_handles_u32_max() {
    let encoded = vbyte_encode(&[u32::MAX]);
    assert_eq!(encoded.len(), 5);
    assert_eq!(vbyte_decode(&encoded).unwrap(), vec![u32::MAX]);
}

#[test]
fn vbyte_concatenation_is_a_stream() {
    let values = vec![0, 1, 127, 128, 300, 16384, u32::MAX];
    assert_eq!(vbyte_decode(&vbyte_encode(&values)).unwrap(), values);
}

#[test]
fn vbyte_rejects_unterminated_tail() {
    let mut bytes = vbyte_encode(&[300]);
    bytes.push(0x01); // opens a value that never terminates
    assert!(vbyte_decode(&bytes).is_err());
}

// ============================================================================
// ELIAS-GAMMA
// ============================================================================

#[test]
fn gamma_known_codewords() {
    // 1 → "1", 2 → "010", 5 → "00101"
    assert_eq!(gamma_encode(&[1]).unwrap().into_bytes(), vec![0b1000_0000]);
    assert_eq!(gamma_encode(&[2]).unwrap().into_bytes(), vec![0b0100_0000]);
    assert_eq!(gamma_encode(&[5]).unwrap().into_bytes(), vec![0b0010_1000]);
}

#[test]
fn gamma_stream_is_tightly_packed() {
    // "1" + "010" + "00101" = 9 bits → two bytes
    let w = gamma_encode(&[1, 2, 5]).unwrap();
    assert_eq!(w.bit_len(), 9);
    let bytes = w.into_bytes();
    assert_eq!(bytes.len(), 2);
    assert_eq!(gamma_decode(&bytes, 3).unwrap(), vec![1, 2, 5]);
}

#[test]
fn gamma_count_stops_before_padding() {
    // A count smaller than what the pad bits could fake must truncate
    let bytes = gamma_encode(&[1, 1, 1]).unwrap().into_bytes();
    assert_eq!(gamma_decode(&bytes, 2).unwrap(), vec![1, 1]);
}

#[test]
fn gamma_large_values_roundtrip() {
    let values = vec![1, 2, 3, 255, 256, 1 << 20, u32::MAX];
    let bytes = gamma_encode(&values).unwrap().into_bytes();
    assert_eq!(gamma_decode(&bytes, values.len()).unwrap(), values);
}

#[test]
fn gamma_asking_past_the_stream_fails() {
    let bytes = gamma_encode(&[7]).unwrap().into_bytes();
    assert!(gamma_decode(&bytes, 5).is_err());
}

// ============================================================================
// D-GAPS
// ============================================================================

#[test]
fn dgaps_keep_the_first_element() {
    assert_eq!(compute_dgaps(&[10, 11, 15]), vec![10, 1, 4]);
    assert_eq!(restore_dgaps(&[10, 1, 4]), vec![10, 11, 15]);
    assert_eq!(compute_dgaps(&[]), Vec::<u32>::new());
}
