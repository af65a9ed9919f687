//! Cross-effect contract tests: every registered effect honors the
//! factory, endpoint and determinism contracts.

use morphcut_core::Frame;
use morphcut_effects::{Factory, FrameCtx, Registry};
use serde_json::Map;

/// Effects whose first/last frames must be pixel-exact copies of the
/// sources. The randomized effects (explosion, shake) and the hard-cut
/// blink are allowed an effect-specific look instead.
const ENDPOINT_EXACT: [&str; 6] = [
    "crossfade",
    "blinds",
    "checkerboard",
    "warp",
    "page_turn",
    "flip3d",
];

fn sources() -> (Frame, Frame) {
    (
        Frame::test_pattern(64, 48),
        Frame::solid(64, 48, [30, 90, 180, 255]),
    )
}

#[test]
fn every_effect_builds_with_defaults() {
    let registry = Registry::builtin().unwrap();
    for name in registry.names() {
        let (_, values) = Factory::build(&registry, name, &Map::new())
            .unwrap_or_else(|e| panic!("defaults rejected for {name}: {e}"));
        let (descriptor, _) = registry.lookup(name).unwrap();
        for spec in &descriptor.params {
            assert!(
                values.get(&spec.name).is_some(),
                "{name} missing default for {}",
                spec.name
            );
        }
    }
}

#[test]
fn every_effect_renders_with_defaults() {
    let registry = Registry::builtin().unwrap();
    let (a, b) = sources();
    for name in registry.names() {
        let (effect, values) = Factory::build(&registry, name, &Map::new()).unwrap();
        for index in [0, 3, 7] {
            let ctx = FrameCtx::new(index, 8);
            let out = effect
                .apply(&a, &b, &ctx, &values)
                .unwrap_or_else(|e| panic!("{name} failed at frame {index}: {e}"));
            assert_eq!((out.width, out.height), (64, 48), "{name} resized output");
        }
    }
}

#[test]
fn endpoint_identity_contract() {
    let registry = Registry::builtin().unwrap();
    let (a, b) = sources();
    for name in ENDPOINT_EXACT {
        let (effect, values) = Factory::build(&registry, name, &Map::new()).unwrap();
        let start = effect.apply(&a, &b, &FrameCtx::new(0, 16), &values).unwrap();
        let end = effect.apply(&a, &b, &FrameCtx::new(15, 16), &values).unwrap();
        assert_eq!(start, a, "{name} at progress 0 is not A");
        assert_eq!(end, b, "{name} at progress 1 is not B");
    }
}

#[test]
fn every_effect_is_deterministic() {
    let registry = Registry::builtin().unwrap();
    let (a, b) = sources();
    for name in registry.names() {
        let (effect, values) = Factory::build(&registry, name, &Map::new()).unwrap();
        let ctx = FrameCtx::new(5, 12);
        let first = effect.apply(&a, &b, &ctx, &values).unwrap();
        let second = effect.apply(&a, &b, &ctx, &values).unwrap();
        assert_eq!(first.data, second.data, "{name} is not deterministic");
    }
}

#[test]
fn seeded_effects_diverge_across_seeds() {
    let registry = Registry::builtin().unwrap();
    let (a, b) = sources();
    for name in ["explosion", "shake"] {
        let seed_of = |seed: i64| {
            serde_json::json!({ "seed": seed })
                .as_object()
                .cloned()
                .unwrap()
        };
        let (effect, one) = Factory::build(&registry, name, &seed_of(1)).unwrap();
        let (_, two) = Factory::build(&registry, name, &seed_of(2)).unwrap();
        let ctx = FrameCtx::new(5, 12);
        let out_one = effect.apply(&a, &b, &ctx, &one).unwrap();
        let out_two = effect.apply(&a, &b, &ctx, &two).unwrap();
        assert_ne!(out_one.data, out_two.data, "{name} ignored its seed");
    }
}

#[test]
fn dimension_mismatch_is_rejected_by_every_effect() {
    let registry = Registry::builtin().unwrap();
    let a = Frame::new(64, 48);
    let b = Frame::new(32, 48);
    for name in registry.names() {
        let (effect, values) = Factory::build(&registry, name, &Map::new()).unwrap();
        let err = effect
            .apply(&a, &b, &FrameCtx::new(0, 4), &values)
            .unwrap_err();
        assert!(
            matches!(err, morphcut_core::MorphcutError::DimensionMismatch { .. }),
            "{name} accepted mismatched frames"
        );
    }
}

#[test]
fn descriptors_serialize_for_discovery() {
    let registry = Registry::builtin().unwrap();
    let json = serde_json::to_value(registry.descriptors()).unwrap();
    let listing = json.as_array().unwrap();
    assert_eq!(listing.len(), 9);
    assert_eq!(listing[0]["name"], "crossfade");
    assert!(listing[0]["params"]
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p["name"] == "mode"));
}
