//! Property tests for digest stability and the derived-edge rules.

use proptest::prelude::*;
use rectveil_core::{DomRect, rect_digest, scalar_digest};

proptest! {
    #[test]
    fn rect_digest_is_a_pure_function_of_components(
        x in -1.0e9f64..1.0e9,
        y in -1.0e9f64..1.0e9,
        w in -1.0e9f64..1.0e9,
        h in -1.0e9f64..1.0e9,
    ) {
        let mutable = DomRect::mutable(x, y, w, h);
        let read_only = DomRect::read_only(x, y, w, h);
        prop_assert_eq!(rect_digest(&mutable), rect_digest(&mutable));
        prop_assert_eq!(rect_digest(&mutable), rect_digest(&read_only));
    }

    #[test]
    fn scalar_digests_agree_exactly_on_f32_buckets(
        value in -1.0e9f64..1.0e9,
        other in -1.0e9f64..1.0e9,
    ) {
        let same_bucket = (value as f32).to_bits() == (other as f32).to_bits();
        prop_assert_eq!(scalar_digest(value) == scalar_digest(other), same_bucket);
    }

    #[test]
    fn sub_ulp_noise_shares_a_scalar_bucket(value in -1.0e6f64..1.0e6) {
        let noisy = value + value.abs() * 1.0e-12;
        prop_assume!(noisy as f32 == value as f32);
        prop_assert_eq!(scalar_digest(noisy), scalar_digest(value));
    }

    #[test]
    fn derived_edges_are_ordered(
        x in -1.0e9f64..1.0e9,
        y in -1.0e9f64..1.0e9,
        w in -1.0e9f64..1.0e9,
        h in -1.0e9f64..1.0e9,
    ) {
        let rect = DomRect::mutable(x, y, w, h);
        prop_assert!(rect.left() <= rect.right());
        prop_assert!(rect.top() <= rect.bottom());
    }
}
