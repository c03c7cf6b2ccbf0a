use std::collections::BTreeSet;
use std::path::Path;

use crate::aggregate::{Observation, PageObservations, TokenAggregator, TokenRecord};
use crate::config::AnimationOptions;
use crate::convert::{easing_label, first_entry, parse_duration, parse_easing, parse_transition};
use crate::naming::{assign_names, bucket, value_slug, NameRequest};
use crate::types::values::round_to;
use crate::types::{CubicBezierValue, DurationValue, ElementStyle, PageStyles, TransitionValue};
use crate::Result;

use super::stats::{count_category, AnimationStats, CategoryStats, PageStats};
use super::{Extraction, Extractor, ExtractorKind};

pub const TRANSITION: &str = "transition";
pub const ANIMATION: &str = "animation";

const SELECTORS: &[&str] = &[
    "a", "button", "input", "select", "textarea", "nav", "header", "div", "span", "li", "img",
    "svg", "section", "article",
];

const TRANSITION_PROPERTIES: &[&str] = &[
    "transition",
    "transition-property",
    "transition-duration",
    "transition-timing-function",
    "transition-delay",
];

const ANIMATION_PROPERTIES: &[&str] = &[
    "animation-name",
    "animation-duration",
    "animation-timing-function",
    "animation-delay",
];

/// Collects transitions and keyframe animations as transition tokens.
///
/// Both sub-categories share one aggregator but their keys are scoped, so a
/// transition and an animation with the same timing stay separate tokens.
#[derive(Debug, Clone)]
pub struct AnimationExtractor {
    options: AnimationOptions,
}

impl AnimationExtractor {
    pub fn new(options: AnimationOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    fn observe(
        &self,
        page: &PageStyles,
        keyframes: &mut BTreeSet<String>,
    ) -> PageObservations<TransitionValue> {
        let mut observations = PageObservations::new(page.url.as_str());
        for selector in SELECTORS {
            for element in page.elements_for(selector) {
                if self.options.include_transitions {
                    if let Some((property, value)) = element_transition(element) {
                        observations.push(
                            Observation::new(value, TRANSITION)
                                .scoped(TRANSITION)
                                .describe(format!("Transition on {property}")),
                        );
                    }
                }
                if self.options.include_animations {
                    if let Some((name, value)) = element_animation(element) {
                        observations.push(
                            Observation::new(value, ANIMATION)
                                .scoped(ANIMATION)
                                .describe(format!("Keyframes {name}")),
                        );
                        keyframes.insert(name);
                    }
                }
            }
        }
        observations
    }
}

impl Extractor for AnimationExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Animation
    }

    fn selectors(&self) -> Vec<&'static str> {
        SELECTORS.to_vec()
    }

    fn properties(&self) -> Vec<&'static str> {
        let mut properties = Vec::new();
        if self.options.include_transitions {
            properties.extend_from_slice(TRANSITION_PROPERTIES);
        }
        if self.options.include_animations {
            properties.extend_from_slice(ANIMATION_PROPERTIES);
        }
        properties
    }

    fn output_dir(&self) -> Option<&Path> {
        self.options.output_dir.as_deref()
    }

    fn extract(&self, pages: &[PageStyles]) -> Extraction {
        let (page_stats, usable) = PageStats::partition(pages);
        let mut aggregator = TokenAggregator::new();
        let mut keyframes = BTreeSet::new();
        for page in usable {
            aggregator.merge(self.observe(page, &mut keyframes));
        }

        let total_values = aggregator.observations();
        let tokens = aggregator.finalize(self.options.minimum_occurrences, name_motions);

        let stats = AnimationStats {
            total_values,
            unique_values: tokens.len(),
            transitions: count_category(&tokens, TRANSITION),
            animations: count_category(&tokens, ANIMATION),
            keyframes: keyframes.len(),
            pages: page_stats,
        };

        Extraction {
            kind: ExtractorKind::Animation,
            tokens,
            stats: CategoryStats::Animation(stats),
        }
    }
}

/// First transition of an element from the shorthand, or from the longhands
/// when the shorthand is missing or unreadable. Zero durations are dropped.
pub(crate) fn element_transition(element: &ElementStyle) -> Option<(String, TransitionValue)> {
    if let Some(parsed) = element.style("transition").and_then(parse_transition) {
        if parsed.value.duration.is_zero() {
            return None;
        }
        let property = parsed.property.unwrap_or_else(|| "all".to_string());
        return Some((property, parsed.value));
    }

    let duration = first_longhand(element, "transition-duration").and_then(|d| parse_duration(&d))?;
    if duration.is_zero() {
        return None;
    }
    let property =
        first_longhand(element, "transition-property").unwrap_or_else(|| "all".to_string());
    Some((
        property,
        TransitionValue {
            duration,
            delay: longhand_delay(element, "transition-delay"),
            timing_function: longhand_easing(element, "transition-timing-function"),
        },
    ))
}

/// First keyframe animation of an element, with its keyframes name.
pub(crate) fn element_animation(element: &ElementStyle) -> Option<(String, TransitionValue)> {
    let name = first_longhand(element, "animation-name")?;
    if name.eq_ignore_ascii_case("none") {
        return None;
    }
    let duration = first_longhand(element, "animation-duration").and_then(|d| parse_duration(&d))?;
    if duration.is_zero() {
        return None;
    }
    Some((
        name,
        TransitionValue {
            duration,
            delay: longhand_delay(element, "animation-delay"),
            timing_function: longhand_easing(element, "animation-timing-function"),
        },
    ))
}

fn first_longhand(element: &ElementStyle, property: &str) -> Option<String> {
    element
        .style(property)
        .and_then(first_entry)
        .filter(|entry| !entry.is_empty())
}

fn longhand_delay(element: &ElementStyle, property: &str) -> DurationValue {
    first_longhand(element, property)
        .and_then(|d| parse_duration(&d))
        .unwrap_or_else(|| DurationValue::seconds(0.0))
}

fn longhand_easing(element: &ElementStyle, property: &str) -> CubicBezierValue {
    first_longhand(element, property)
        .map(|e| parse_easing(&e))
        .unwrap_or(CubicBezierValue::EASE)
}

pub(crate) fn speed_label(duration: &DurationValue) -> &'static str {
    bucket(
        round_to(duration.to_millis(), 4),
        &[(100.0, "instant"), (200.0, "fast"), (500.0, "normal")],
        "slow",
    )
}

fn duration_slug(duration: &DurationValue) -> String {
    value_slug(duration.value, duration.unit.as_str())
}

fn name_motions(records: &[TokenRecord<TransitionValue>]) -> Vec<String> {
    assign_names(
        records,
        |record| record.value.duration.to_millis(),
        |record| {
            let value = &record.value;
            let base = format!(
                "{}-{}-{}",
                record.category,
                speed_label(&value.duration),
                easing_label(&value.timing_function)
            );
            let qualifier = if value.delay.is_zero() {
                duration_slug(&value.duration)
            } else {
                format!(
                    "{}-{}",
                    duration_slug(&value.duration),
                    duration_slug(&value.delay)
                )
            };
            NameRequest::new(base, qualifier)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    fn element(styles: &[(&str, &str)]) -> ElementStyle {
        ElementStyle {
            styles: styles
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
            ..ElementStyle::default()
        }
    }

    fn page(url: &str, elements: Vec<ElementStyle>) -> PageStyles {
        PageStyles {
            url: url.to_string(),
            status: Some(200),
            elements: BTreeMap::from([("button".to_string(), elements)]),
            ..PageStyles::default()
        }
    }

    #[test]
    fn shorthand_transition_is_decomposed() {
        let (property, value) =
            element_transition(&element(&[("transition", "opacity 0.3s ease-in-out")])).unwrap();
        assert_eq!(property, "opacity");
        assert_eq!(value.duration, DurationValue::seconds(0.3));
        assert_eq!(value.delay, DurationValue::seconds(0.0));
        assert_eq!(value.timing_function, CubicBezierValue::EASE_IN_OUT);
    }

    #[test]
    fn longhands_fill_in_for_missing_shorthand() {
        let (property, value) = element_transition(&element(&[
            ("transition-property", "color, background-color"),
            ("transition-duration", "150ms, 300ms"),
            ("transition-timing-function", "cubic-bezier(0.4, 0, 0.2, 1)"),
            ("transition-delay", "0s"),
        ]))
        .unwrap();
        assert_eq!(property, "color");
        assert_eq!(value.duration, DurationValue::millis(150.0));
        assert_eq!(value.timing_function, CubicBezierValue([0.4, 0.0, 0.2, 1.0]));
    }

    #[test]
    fn zero_durations_and_none_are_skipped() {
        assert!(element_transition(&element(&[("transition", "all 0s ease 0s")])).is_none());
        assert!(element_animation(&element(&[
            ("animation-name", "none"),
            ("animation-duration", "1s"),
        ]))
        .is_none());
        assert!(element_animation(&element(&[
            ("animation-name", "spin"),
            ("animation-duration", "0s"),
        ]))
        .is_none());
    }

    #[test]
    fn speed_labels_bucket_milliseconds() {
        assert_eq!(speed_label(&DurationValue::millis(100.0)), "instant");
        assert_eq!(speed_label(&DurationValue::millis(150.0)), "fast");
        assert_eq!(speed_label(&DurationValue::seconds(0.3)), "normal");
        assert_eq!(speed_label(&DurationValue::seconds(1.0)), "slow");
    }

    #[test]
    fn names_combine_category_speed_and_easing() {
        let extractor = AnimationExtractor::new(AnimationOptions::default()).unwrap();
        let pages = vec![page(
            "https://a.test/",
            vec![
                element(&[("transition", "opacity 0.3s ease-in-out")]),
                element(&[("transition", "transform 0.4s ease-in-out")]),
                element(&[("transition", "color 150ms cubic-bezier(0.4, 0, 0.2, 1)")]),
                element(&[
                    ("animation-name", "spin"),
                    ("animation-duration", "1s"),
                    ("animation-timing-function", "linear"),
                ]),
            ],
        )];
        let extraction = extractor.extract(&pages);
        let mut names: Vec<&str> = extraction.tokens.iter().map(|t| t.name.as_str()).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "animation-slow-linear",
                "transition-fast-custom",
                "transition-normal-ease-in-out",
                "transition-normal-ease-in-out-0-4s",
            ]
        );

        let spin = extraction
            .tokens
            .iter()
            .find(|t| t.category == ANIMATION)
            .unwrap();
        assert_eq!(spin.description.as_deref(), Some("Keyframes spin"));

        match extraction.stats {
            CategoryStats::Animation(stats) => {
                assert_eq!(stats.transitions, 3);
                assert_eq!(stats.animations, 1);
                assert_eq!(stats.keyframes, 1);
            }
            other => panic!("unexpected stats {other:?}"),
        }
    }

    #[test]
    fn same_timing_stays_separate_per_sub_category() {
        let extractor = AnimationExtractor::new(AnimationOptions::default()).unwrap();
        let pages = vec![page(
            "https://a.test/",
            vec![element(&[
                ("transition", "opacity 0.2s ease 0s"),
                ("animation-name", "fade"),
                ("animation-duration", "0.2s"),
                ("animation-timing-function", "ease"),
            ])],
        )];
        let extraction = extractor.extract(&pages);
        assert_eq!(extraction.tokens.len(), 2);
        let mut names: Vec<&str> = extraction.tokens.iter().map(|t| t.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["animation-fast-ease", "transition-fast-ease"]);
    }

    #[test]
    fn disabled_animations_are_not_read() {
        let extractor = AnimationExtractor::new(AnimationOptions {
            include_animations: false,
            ..AnimationOptions::default()
        })
        .unwrap();
        assert!(!extractor.properties().contains(&"animation-name"));
        let pages = vec![page(
            "https://a.test/",
            vec![element(&[("animation-name", "pulse"), ("animation-duration", "2s")])],
        )];
        assert!(extractor.extract(&pages).tokens.is_empty());
    }
}
