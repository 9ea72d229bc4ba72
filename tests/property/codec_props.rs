//! Codec and tokeniser properties: every encode∘decode is the identity on
//! its legal domain.

use proptest::prelude::*;

use lince::codecs::{
    compute_dgaps, gamma_decode, gamma_encode, restore_dgaps, vbyte_decode, vbyte_encode,
};
use lince::{Tokenizer, TokenizerConfig};

fn sorted_strictly_increasing() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::btree_set(1u32..1_000_000, 1..200)
        .prop_map(|set| set.into_iter().collect())
}

proptest! {
    #[test]
    fn vbyte_roundtrips_any_u32_list(values in prop::collection::vec(any::<u32>(), 0..300)) {
        prop_assert_eq!(vbyte_decode(&vbyte_encode(&values)).unwrap(), values);
    }

    #[test]
    fn gamma_roundtrips_any_positive_list(values in prop::collection::vec(1u32.., 0..300)) {
        let bytes = gamma_encode(&values).unwrap().into_bytes();
        prop_assert_eq!(gamma_decode(&bytes, values.len()).unwrap(), values);
    }

    #[test]
    fn dgaps_roundtrip_strictly_increasing(values in sorted_strictly_increasing()) {
        let gaps = compute_dgaps(&values);
        prop_assert!(gaps.iter().skip(1).all(|&g| g >= 1));
        prop_assert_eq!(restore_dgaps(&gaps), values);
    }

    #[test]
    fn dgapped_vbyte_roundtrips(values in sorted_strictly_increasing()) {
        let encoded = vbyte_encode(&compute_dgaps(&values));
        prop_assert_eq!(restore_dgaps(&vbyte_decode(&encoded).unwrap()), values);
    }

    /// With filters disabled, tokenising already-normalised words is
    /// idempotent under join-with-space.
    #[test]
    fn tokenizer_idempotent_on_normalised_words(
        words in prop::collection::vec("[a-zñáéíóú]{1,12}", 1..20)
    ) {
        let config = TokenizerConfig {
            min_len: 1,
            max_len: usize::MAX,
            ..Default::default()
        };
        let tokenizer = Tokenizer::new(config);
        let once = tokenizer.tokenize(&words.join(" "));
        let twice = tokenizer.tokenize(&once.join(" "));
        prop_assert_eq!(once, twice);
    }
}
