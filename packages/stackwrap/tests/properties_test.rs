//! Property tests over arbitrary messages and chain shapes

use proptest::prelude::*;
use stackwrap::{cause, new, with_stack, wrap, Error, Verb};
use std::error::Error as StdError;

/// One layer added on top of an existing error
#[derive(Debug, Clone)]
enum Layer {
    Stack,
    Wrap(String),
}

fn layer() -> impl Strategy<Value = Layer> {
    prop_oneof![
        Just(Layer::Stack),
        "[a-z ]{0,12}".prop_map(Layer::Wrap),
    ]
}

fn build(root: &str, layers: &[Layer]) -> Error {
    let mut err = new(root);
    for layer in layers {
        let next = match layer {
            Layer::Stack => with_stack(Some(err)),
            Layer::Wrap(message) => wrap(Some(err), message.as_str()),
        };
        err = match next {
            Some(next) => next,
            None => unreachable!("wrapping an error never yields nothing"),
        };
    }
    err
}

fn expected_text(root: &str, layers: &[Layer]) -> String {
    layers.iter().fold(root.to_string(), |text, layer| match layer {
        Layer::Stack => text,
        Layer::Wrap(message) => format!("{message}: {text}"),
    })
}

proptest! {
    #[test]
    fn prop_wrap_composes_text(root in "[a-zA-Z0-9 ]{1,16}", message in "[a-zA-Z0-9 ]{0,16}") {
        let err = wrap(Some(new(root.as_str())), message.as_str());
        let err = err.map(|e| e.to_string());
        prop_assert_eq!(err, Some(format!("{message}: {root}")));
    }

    #[test]
    fn prop_absent_stays_absent(message in ".*") {
        prop_assert!(wrap(None::<Error>, message.as_str()).is_none());
        prop_assert!(with_stack(None::<Error>).is_none());
    }

    #[test]
    fn prop_plain_text_matches_layers(
        root in "[a-z]{1,8}",
        layers in prop::collection::vec(layer(), 0..8),
    ) {
        let err = build(&root, &layers);
        prop_assert_eq!(err.render(Verb::Plain), expected_text(&root, &layers));
        prop_assert_eq!(err.render(Verb::Quoted), format!("{:?}", expected_text(&root, &layers)));
    }

    #[test]
    fn prop_cause_is_a_fixed_point(
        root in "[a-z]{1,8}",
        layers in prop::collection::vec(layer(), 0..8),
    ) {
        let err = build(&root, &layers);
        let once = cause(&err);
        let twice = cause(once);
        prop_assert!(std::ptr::addr_eq(once, twice));
        prop_assert_eq!(once.to_string(), root);
        prop_assert!(once.source().is_none());
    }

    #[test]
    fn prop_extended_starts_with_root_and_has_every_stack(
        root in "[a-z]{1,8}",
        layers in prop::collection::vec(layer(), 0..8),
    ) {
        let err = build(&root, &layers);
        let extended = err.render(Verb::Extended);
        let frames: usize = err
            .chain()
            .filter_map(stackwrap::stack_trace)
            .map(|stack| stack.iter().filter(|f| f.is_resolved()).count())
            .sum();

        prop_assert_eq!(extended.lines().next(), Some(root.as_str()));
        prop_assert_eq!(extended.lines().filter(|l| l.starts_with('\t')).count(), frames);
    }
}
