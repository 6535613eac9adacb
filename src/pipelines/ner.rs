// Copyright 2024 The NLP Genie Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Named Entity Recognition pipeline
//! Extracts entities (Person, Location, Organization, Miscellaneous) from text and renders them
//! with their labels, both as a list and highlighted in place in the original text.
//!
//! Output for `"My name is Amy. I live in Paris."`: \
//! ```no_run
//! # use nlp_genie::pipelines::ner::EntitySpan;
//! # let output =
//! [
//!     EntitySpan {
//!         word: String::from("Amy"),
//!         score: 0.9986,
//!         label: String::from("PER"),
//!         start: Some(11),
//!         end: Some(14),
//!     },
//!     EntitySpan {
//!         word: String::from("Paris"),
//!         score: 0.9985,
//!         label: String::from("LOC"),
//!         start: Some(26),
//!         end: Some(31),
//!     },
//! ]
//! # ;
//! ```

use crate::backends::NlpBackend;
use crate::common::error::GenieError;
use crate::pipelines::common::provided;
use serde::{Deserialize, Serialize};

pub const PLACEHOLDER: &str = "Enter Text Here";

pub const TITLE: &str = "List of Entities";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// # Entity extracted from a text
pub struct EntitySpan {
    /// Surface form of the entity
    pub word: String,
    /// Confidence score
    pub score: f64,
    /// Entity label (e.g. `PER`, `LOC`)
    pub label: String,
    /// Character offset of the first character, when the model reports it
    pub start: Option<usize>,
    /// Character offset one past the last character, when the model reports it
    pub end: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// # Entities found in a text, ready for display
pub struct EntityReport {
    /// Text the entities were extracted from
    pub text: String,
    pub entities: Vec<EntitySpan>,
    /// Distinct labels present, in order of first appearance
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
/// # Piece of text rendered either plain or as a labelled entity
pub enum Segment<'a> {
    Plain(&'a str),
    Entity { text: &'a str, label: &'a str },
}

/// Guard: returns the text to analyse if it was provided and differs from the placeholder.
pub fn guard(text: Option<&str>) -> Option<&str> {
    provided(text, Some(PLACEHOLDER))
}

/// Removes the IOB prefix of a token label: `I-PER` and `B-PER` both become `PER`.
pub fn normalize_label(label: &str) -> &str {
    match label.split_once('-') {
        Some((prefix, rest)) if matches!(prefix, "B" | "I" | "E" | "S") && !rest.is_empty() => {
            rest
        }
        _ => label,
    }
}

/// Runs entity extraction and collects the labels found.
pub async fn extract(backend: &dyn NlpBackend, text: &str) -> Result<EntityReport, GenieError> {
    let entities = backend
        .extract_entities(text)
        .await?
        .into_iter()
        .map(|entity| EntitySpan {
            label: normalize_label(&entity.label).to_string(),
            ..entity
        })
        .collect::<Vec<EntitySpan>>();

    let mut labels: Vec<String> = Vec::new();
    for entity in &entities {
        if !labels.contains(&entity.label) {
            labels.push(entity.label.clone());
        }
    }

    Ok(EntityReport {
        text: text.to_string(),
        entities,
        labels,
    })
}

/// Splits `text` into plain and entity segments using the entity character offsets.
///
/// Entities without offsets, with offsets outside of the text, or overlapping an earlier entity
/// are skipped. Segments always cover the whole text.
pub fn highlight<'a>(text: &'a str, entities: &'a [EntitySpan]) -> Vec<Segment<'a>> {
    let char_count = text.chars().count();
    let mut spans: Vec<(usize, usize, &str)> = entities
        .iter()
        .filter_map(|entity| match (entity.start, entity.end) {
            (Some(start), Some(end)) if start < end && end <= char_count => {
                Some((start, end, entity.label.as_str()))
            }
            _ => None,
        })
        .collect();
    spans.sort_by_key(|(start, end, _)| (*start, *end));

    let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;
    for (start, end, label) in spans {
        if start < cursor {
            continue;
        }
        if start > cursor {
            segments.push(Segment::Plain(char_slice(text, cursor, start)));
        }
        segments.push(Segment::Entity {
            text: char_slice(text, start, end),
            label,
        });
        cursor = end;
    }
    if cursor < char_count {
        segments.push(Segment::Plain(char_slice(text, cursor, char_count)));
    }
    segments
}

fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let byte_index = |position: usize| {
        text.char_indices()
            .nth(position)
            .map(|(index, _)| index)
            .unwrap_or(text.len())
    };
    &text[byte_index(start)..byte_index(end)]
}

pub fn display(report: &EntityReport) -> String {
    let mut output = String::from(TITLE);
    for entity in &report.entities {
        output.push_str(&format!("\n- {} ({})", entity.word, entity.label));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(word: &str, label: &str, start: usize, end: usize) -> EntitySpan {
        EntitySpan {
            word: word.to_string(),
            score: 0.99,
            label: label.to_string(),
            start: Some(start),
            end: Some(end),
        }
    }

    #[test]
    fn guard_rejects_placeholder() {
        assert_eq!(guard(Some(PLACEHOLDER)), None);
        assert_eq!(guard(Some("")), None);
        assert_eq!(guard(Some("Amy lives in Paris")), Some("Amy lives in Paris"));
    }

    #[test]
    fn normalizes_iob_labels() {
        assert_eq!(normalize_label("I-PER"), "PER");
        assert_eq!(normalize_label("B-LOC"), "LOC");
        assert_eq!(normalize_label("ORG"), "ORG");
        assert_eq!(normalize_label("WORK_OF-ART"), "WORK_OF-ART");
        assert_eq!(normalize_label("I-"), "I-");
    }

    #[test]
    fn highlights_entities_in_place() {
        let text = "My name is Amy. I live in Paris.";
        let entities = vec![entity("Paris", "LOC", 26, 31), entity("Amy", "PER", 11, 14)];
        let segments = highlight(text, &entities);
        assert_eq!(
            segments,
            vec![
                Segment::Plain("My name is "),
                Segment::Entity {
                    text: "Amy",
                    label: "PER"
                },
                Segment::Plain(". I live in "),
                Segment::Entity {
                    text: "Paris",
                    label: "LOC"
                },
                Segment::Plain("."),
            ]
        );
    }

    #[test]
    fn highlight_uses_character_offsets() {
        let text = "Zoë visited Łódź";
        let entities = vec![entity("Łódź", "LOC", 12, 16)];
        let segments = highlight(text, &entities);
        assert_eq!(
            segments,
            vec![
                Segment::Plain("Zoë visited "),
                Segment::Entity {
                    text: "Łódź",
                    label: "LOC"
                },
            ]
        );
    }

    #[test]
    fn highlight_skips_invalid_spans() {
        let text = "Paris";
        let mut no_offsets = entity("Paris", "LOC", 0, 5);
        no_offsets.start = None;
        let entities = vec![
            entity("Paris", "LOC", 0, 5),
            entity("aris", "PER", 1, 5),
            entity("Paris", "LOC", 0, 50),
            entity("", "LOC", 3, 3),
            no_offsets,
        ];
        assert_eq!(
            highlight(text, &entities),
            vec![Segment::Entity {
                text: "Paris",
                label: "LOC"
            }]
        );
        assert_eq!(highlight("plain", &[]), vec![Segment::Plain("plain")]);
        assert!(highlight("", &[]).is_empty());
    }

    #[test]
    fn display_lists_entities_with_labels() {
        let report = EntityReport {
            text: "Amy lives in Paris".to_string(),
            entities: vec![entity("Amy", "PER", 0, 3), entity("Paris", "LOC", 13, 18)],
            labels: vec!["PER".to_string(), "LOC".to_string()],
        };
        assert_eq!(display(&report), "List of Entities\n- Amy (PER)\n- Paris (LOC)");
    }
}
