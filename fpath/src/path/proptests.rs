//! Property-based tests for path values.
//!
//! Note: The normalize module already has property tests for normalization.
//! This module focuses on concatenation, slicing and rendering.

use super::{Normalizer, PathValue, Platform};
use proptest::prelude::*;

fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,12}(\\.[a-z]{1,4})?"
}

fn posix_path_strategy() -> impl Strategy<Value = PathValue> {
    (any::<bool>(), prop::collection::vec(segment_strategy(), 0..8)).prop_map(
        |(absolute, parts)| {
            let raw = format!("{}{}", if absolute { "/" } else { "" }, parts.join("/"));
            PathValue::parse(&raw, Platform::Posix).unwrap()
        },
    )
}

fn platform_strategy() -> impl Strategy<Value = Platform> {
    prop_oneof![
        Just(Platform::Posix),
        Just(Platform::Windows),
        Just(Platform::Mac),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // The receiver is a prefix of every concatenation
    #[test]
    fn concatenate_keeps_prefix(
        base in posix_path_strategy(),
        tail in prop::collection::vec(segment_strategy(), 0..6),
    ) {
        let joined = base.concatenate(tail.clone()).unwrap();
        let prefix_len = isize::try_from(base.len()).unwrap();
        prop_assert_eq!(joined.slice(..prefix_len), base.clone());
        prop_assert_eq!(joined.len(), base.len() + tail.len());
        prop_assert_eq!(joined.root(), base.root());
    }

    // The last element of a one-segment tail slice is the last index
    #[test]
    fn tail_slice_matches_last_index(path in posix_path_strategy()) {
        let tail = path.slice(-1..);
        match path.index(-1) {
            Ok(last) => prop_assert_eq!(tail.segments(), [last.to_string()]),
            Err(_) => prop_assert!(path.is_empty() && tail.is_empty()),
        }
    }

    // Slicing with any bounds never panics and never grows the path
    #[test]
    fn slice_is_total(path in posix_path_strategy(), start in -12isize..12, end in -12isize..12) {
        let sliced = path.slice(start..end);
        prop_assert!(sliced.len() <= path.len());
    }

    // Rendering with the value's own platform parses back to the same value
    #[test]
    fn render_round_trip(
        platform in platform_strategy(),
        absolute in any::<bool>(),
        parts in prop::collection::vec(segment_strategy(), 1..8),
    ) {
        let raw = match (platform, absolute) {
            (Platform::Posix, true) => format!("/{}", parts.join("/")),
            (Platform::Windows, true) => format!("C:\\{}", parts.join("\\")),
            (Platform::Mac, true) => format!("{}:", parts.join(":")),
            (Platform::Mac, false) => format!(":{}", parts.join(":")),
            (_, false) => parts.join("/"),
        };
        let path = PathValue::parse(&raw, platform).unwrap();
        let again = PathValue::parse(&path.render(platform), platform).unwrap();
        prop_assert_eq!(again, path);
    }

    // Normalizing a normalized value changes nothing on every platform
    #[test]
    fn normalized_values_are_fixed_points(
        platform in platform_strategy(),
        parts in prop::collection::vec(prop_oneof![segment_strategy(), Just("..".to_string())], 0..8),
    ) {
        let normalizer = Normalizer::new().with_platform(platform).with_user_expansion(false);
        let once = normalizer
            .normalize_path(&PathValue::from_segments(&parts, platform).unwrap())
            .unwrap();
        let twice = normalizer.normalize_path(&once).unwrap();
        prop_assert_eq!(once, twice);
    }
}
