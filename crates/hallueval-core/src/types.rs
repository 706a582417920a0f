//! Evaluation record types shared across backends.

use serde::{Deserialize, Serialize};

/// One news item from the evaluation dataset.
///
/// Field names deserialize directly from the dataset JSON, which uses
/// camelCase keys (`headLine`, `broadcastDate`, ...). All fields are plain
/// strings; `broadcast_date` is ISO-like and only its first ten characters
/// (the date part) are used when composing prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    /// Headline of the news article.
    pub head_line: String,

    /// Broadcast timestamp, ISO-like (e.g. "2024-03-01 08:00:00").
    pub broadcast_date: String,

    /// The beginning of the article, the part the model continues from.
    pub news_beginning: String,

    /// A candidate continuation under judgment, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation: Option<String>,

    /// A pre-generated hallucinated continuation, used by the
    /// keyword-level judgment prompt.
    #[serde(default)]
    pub hallucinated_continuation: String,
}

impl NewsItem {
    /// Date-only part of the broadcast timestamp (first ten characters).
    ///
    /// Shorter timestamps are returned whole.
    pub fn broadcast_day(&self) -> &str {
        match self.broadcast_date.char_indices().nth(10) {
            Some((idx, _)) => &self.broadcast_date[..idx],
            None => &self.broadcast_date,
        }
    }
}

/// Outcome of a hallucination judgment.
///
/// The wire values (0, 1, -1) match what the evaluation harness stores:
/// parse failures and backend failures both surface as `Indeterminate`,
/// never as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Judgment {
    /// The text matches reality (wire value 0).
    Factual,
    /// The text contradicts reality (wire value 1).
    Hallucinated,
    /// The response could not be classified (wire value -1).
    Indeterminate,
}

impl Judgment {
    /// Wire value used by the harness: 0, 1, or -1.
    pub fn as_i8(self) -> i8 {
        match self {
            Judgment::Factual => 0,
            Judgment::Hallucinated => 1,
            Judgment::Indeterminate => -1,
        }
    }

    /// Parse a wire value back into a judgment.
    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            0 => Some(Judgment::Factual),
            1 => Some(Judgment::Hallucinated),
            -1 => Some(Judgment::Indeterminate),
            _ => None,
        }
    }
}

/// Outcome of a pairwise continuation comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// The first candidate is preferred (wire value 1).
    First,
    /// The second candidate is preferred (wire value 2).
    Second,
    /// The response could not be classified (wire value -1).
    Indeterminate,
}

impl Comparison {
    /// Wire value used by the harness: 1, 2, or -1.
    pub fn as_i8(self) -> i8 {
        match self {
            Comparison::First => 1,
            Comparison::Second => 2,
            Comparison::Indeterminate => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn news_item_deserializes_camel_case() {
        let json = r#"{
            "headLine": "台风预警",
            "broadcastDate": "2024-03-01 08:00:00",
            "newsBeginning": "今日凌晨",
            "hallucinatedContinuation": "风速达到每秒一百米。"
        }"#;
        let item: NewsItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.head_line, "台风预警");
        assert_eq!(item.broadcast_day(), "2024-03-01");
        assert!(item.continuation.is_none());
    }

    #[test]
    fn broadcast_day_handles_short_dates() {
        let item = NewsItem {
            broadcast_date: "2024".to_string(),
            ..Default::default()
        };
        assert_eq!(item.broadcast_day(), "2024");
    }

    #[test]
    fn broadcast_day_respects_char_boundaries() {
        let item = NewsItem {
            broadcast_date: "二〇二四年三月一日早间八点".to_string(),
            ..Default::default()
        };
        // Ten characters, not ten bytes.
        assert_eq!(item.broadcast_day(), "二〇二四年三月一日早");
    }

    #[test]
    fn judgment_wire_values_round_trip() {
        for j in [
            Judgment::Factual,
            Judgment::Hallucinated,
            Judgment::Indeterminate,
        ] {
            assert_eq!(Judgment::from_i8(j.as_i8()), Some(j));
        }
        assert_eq!(Judgment::from_i8(7), None);
    }

    #[test]
    fn comparison_wire_values() {
        assert_eq!(Comparison::First.as_i8(), 1);
        assert_eq!(Comparison::Second.as_i8(), 2);
        assert_eq!(Comparison::Indeterminate.as_i8(), -1);
    }
}
