//! Extraction of utterance sequences and training pairs from episodes.
//!
//! All functions here are pure: they read an episode's events and never
//! mutate it. The `preprocess` function is applied independently to every
//! returned text and never influences which events are selected or paired.

use crate::episode::Episode;
use crate::event::Event;

/// Preprocess function that returns its input unchanged.
pub fn identity(text: &str) -> String {
    text.to_string()
}

/// Normalize an utterance for lookup: lowercase, collapse whitespace, and
/// drop surrounding punctuation.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .to_lowercase()
}

/// Utterance texts of `episode`, in order.
///
/// With `keep_holes`, the output has one slot per event and non-utterance
/// events yield `None`; otherwise only utterances are returned.
pub fn extract_utterances<F>(episode: &Episode, preprocess: F, keep_holes: bool) -> Vec<Option<String>>
where
    F: Fn(&str) -> String,
{
    episode
        .events()
        .iter()
        .filter_map(|event| match event.text() {
            Some(text) => Some(Some(preprocess(text))),
            None if keep_holes => Some(None),
            None => None,
        })
        .collect()
}

/// Utterance texts of `episode`, without holes.
pub fn extract_utterance_texts<F>(episode: &Episode, preprocess: F) -> Vec<String>
where
    F: Fn(&str) -> String,
{
    utterances(episode).map(|(_, text)| preprocess(text)).collect()
}

/// Input/output training pairs from consecutive utterances by different
/// speakers.
///
/// Non-utterance events are skipped entirely. Each utterance pairs with the
/// utterance immediately before it when the speaker changed, so a run of
/// same-speaker utterances contributes only its last one as an input.
/// The two returned vectors are index-aligned.
pub fn extract_utterance_pairs<F>(episode: &Episode, preprocess: F) -> (Vec<String>, Vec<String>)
where
    F: Fn(&str) -> String,
{
    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    let mut previous: Option<(&Event, &str)> = None;

    for (event, text) in utterances(episode) {
        if let Some((prev_event, prev_text)) = previous {
            if prev_event.agent() != event.agent() {
                inputs.push(preprocess(prev_text));
                outputs.push(preprocess(text));
            }
        }
        previous = Some((event, text));
    }

    (inputs, outputs)
}

fn utterances(episode: &Episode) -> impl Iterator<Item = (&Event, &str)> {
    episode
        .events()
        .iter()
        .filter_map(|event| event.text().map(|text| (event, text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use proptest::prelude::*;

    use crate::action::LogAction;
    use crate::agent::{AgentDirectory, NullAgent};

    /// Speaker/text script; `None` text means an action event.
    fn episode_from(script: &[(&str, Option<&str>)]) -> Episode {
        let directory = AgentDirectory::new();
        directory.register(Arc::new(NullAgent::new("a"))).unwrap();
        directory.register(Arc::new(NullAgent::new("b"))).unwrap();
        let mut episode = Episode::new("a", "b");
        for (agent, text) in script {
            let event = match text {
                Some(text) => Event::utterance(*agent, *text),
                None => Event::action(*agent, Arc::new(LogAction::new("noop"))),
            };
            episode.add_event(&directory, event).unwrap();
        }
        episode
    }

    fn utterance_script(speakers: [&'static str; 4]) -> Episode {
        let texts = ["aaa", "bbb", "ccc", "ddd"];
        let script: Vec<_> = speakers
            .iter()
            .zip(texts)
            .map(|(s, t)| (*s, Some(t)))
            .collect();
        episode_from(&script)
    }

    fn upper(text: &str) -> String {
        text.to_uppercase()
    }

    #[test]
    fn utterances_only() {
        let e = utterance_script(["a", "b", "a", "b"]);
        assert_eq!(
            extract_utterance_texts(&e, identity),
            vec!["aaa", "bbb", "ccc", "ddd"]
        );
        assert_eq!(
            extract_utterance_texts(&e, upper),
            vec!["AAA", "BBB", "CCC", "DDD"]
        );
        assert_eq!(
            extract_utterances(&e, identity, false),
            vec![
                Some("aaa".to_string()),
                Some("bbb".to_string()),
                Some("ccc".to_string()),
                Some("ddd".to_string()),
            ]
        );
    }

    #[test]
    fn no_holes_drops_actions() {
        let e = episode_from(&[("a", Some("aaa")), ("b", None), ("a", Some("ccc")), ("b", Some("ddd"))]);
        assert_eq!(extract_utterance_texts(&e, identity), vec!["aaa", "ccc", "ddd"]);
        assert_eq!(
            extract_utterances(&e, upper, false),
            vec![Some("AAA".to_string()), Some("CCC".to_string()), Some("DDD".to_string())]
        );
    }

    #[test]
    fn keep_holes_marks_actions() {
        let e = episode_from(&[("a", Some("aaa")), ("b", None), ("a", Some("ccc")), ("b", Some("ddd"))]);
        assert_eq!(
            extract_utterances(&e, identity, true),
            vec![
                Some("aaa".to_string()),
                None,
                Some("ccc".to_string()),
                Some("ddd".to_string()),
            ]
        );
        assert_eq!(
            extract_utterances(&e, upper, true),
            vec![
                Some("AAA".to_string()),
                None,
                Some("CCC".to_string()),
                Some("DDD".to_string()),
            ]
        );
    }

    #[test]
    fn pairs_alternate() {
        let (x, y) = extract_utterance_pairs(&utterance_script(["a", "b", "a", "b"]), identity);
        assert_eq!(x, vec!["aaa", "bbb", "ccc"]);
        assert_eq!(y, vec!["bbb", "ccc", "ddd"]);
    }

    #[test]
    fn pairs_repeated_speakers() {
        let (x, y) = extract_utterance_pairs(&utterance_script(["a", "a", "a", "b"]), identity);
        assert_eq!(x, vec!["ccc"]);
        assert_eq!(y, vec!["ddd"]);

        let (x, y) = extract_utterance_pairs(&utterance_script(["a", "b", "b", "b"]), identity);
        assert_eq!(x, vec!["aaa"]);
        assert_eq!(y, vec!["bbb"]);

        let (x, y) = extract_utterance_pairs(&utterance_script(["a", "b", "b", "a"]), identity);
        assert_eq!(x, vec!["aaa", "ccc"]);
        assert_eq!(y, vec!["bbb", "ddd"]);

        let (x, y) = extract_utterance_pairs(&utterance_script(["a", "a", "b", "b"]), identity);
        assert_eq!(x, vec!["bbb"]);
        assert_eq!(y, vec!["ccc"]);
    }

    #[test]
    fn pairs_ignore_non_utterances() {
        let e = episode_from(&[("a", Some("aaa")), ("b", None), ("b", Some("bbb")), ("a", None)]);
        let (x, y) = extract_utterance_pairs(&e, identity);
        assert_eq!(x, vec!["aaa"]);
        assert_eq!(y, vec!["bbb"]);
    }

    #[test]
    fn pairs_preprocess() {
        let e = episode_from(&[
            ("a", Some("AaA")),
            ("b", Some("BBB")),
            ("a", Some("Ccc")),
            ("b", Some("ddd")),
        ]);
        let (x, y) = extract_utterance_pairs(&e, |t| t.to_lowercase());
        assert_eq!(x, vec!["aaa", "bbb", "ccc"]);
        assert_eq!(y, vec!["bbb", "ccc", "ddd"]);
    }

    #[test]
    fn empty_episode_extracts_nothing() {
        let e = Episode::new("a", "b");
        assert!(extract_utterances(&e, identity, true).is_empty());
        let (x, y) = extract_utterance_pairs(&e, identity);
        assert!(x.is_empty() && y.is_empty());
    }

    #[test]
    fn normalize_collapses_case_space_and_punctuation() {
        assert_eq!(normalize("  Hello,   World!  "), "hello, world");
        assert_eq!(normalize("How are you?"), "how are you");
        assert_eq!(normalize("..."), "");
    }

    proptest! {
        #[test]
        fn prop_preprocess_does_not_change_selection(
            script in prop::collection::vec((any::<bool>(), prop::option::of("[a-z]{1,6}")), 0..20)
        ) {
            let owned: Vec<(&str, Option<&str>)> = script
                .iter()
                .map(|(by_a, text)| (if *by_a { "a" } else { "b" }, text.as_deref()))
                .collect();
            let e = episode_from(&owned);

            let plain = extract_utterances(&e, identity, true);
            let shouted = extract_utterances(&e, upper, true);
            prop_assert_eq!(plain.len(), e.len());
            prop_assert_eq!(
                plain.iter().map(|t| t.as_deref().map(upper)).collect::<Vec<_>>(),
                shouted
            );

            let (x, y) = extract_utterance_pairs(&e, identity);
            let (xu, yu) = extract_utterance_pairs(&e, upper);
            prop_assert_eq!(x.len(), y.len());
            prop_assert_eq!(x.iter().map(|t| upper(t)).collect::<Vec<_>>(), xu);
            prop_assert_eq!(y.iter().map(|t| upper(t)).collect::<Vec<_>>(), yu);

            let utterance_count = owned.iter().filter(|(_, t)| t.is_some()).count();
            prop_assert!(x.len() <= utterance_count.saturating_sub(1));
        }
    }
}
