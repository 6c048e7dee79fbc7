// src/models/answer.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::fields::{blank, string_or_number};

/// One of the five option letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
    E,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; 5] = [
        OptionLetter::A,
        OptionLetter::B,
        OptionLetter::C,
        OptionLetter::D,
        OptionLetter::E,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OptionLetter::A => "A",
            OptionLetter::B => "B",
            OptionLetter::C => "C",
            OptionLetter::D => "D",
            OptionLetter::E => "E",
        }
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionLetter {
    type Err = ParseAnswerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(OptionLetter::A),
            "B" => Ok(OptionLetter::B),
            "C" => Ok(OptionLetter::C),
            "D" => Ok(OptionLetter::D),
            "E" => Ok(OptionLetter::E),
            _ => Err(ParseAnswerError::Option(s.to_string())),
        }
    }
}

/// Participant's self-reported certainty about an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Confidence {
    VeryConfident,
    Unsure,
    DontKnow,
}

impl Confidence {
    pub const ALL: [Confidence; 3] = [
        Confidence::VeryConfident,
        Confidence::Unsure,
        Confidence::DontKnow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::VeryConfident => "very-confident",
            Confidence::Unsure => "unsure",
            Confidence::DontKnow => "dont-know",
        }
    }

    /// Human-readable label used by the result view.
    pub fn label(self) -> &'static str {
        match self {
            Confidence::VeryConfident => "Very Confident",
            Confidence::Unsure => "Unsure",
            Confidence::DontKnow => "Don't Know",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Confidence {
    type Err = ParseAnswerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "very-confident" => Ok(Confidence::VeryConfident),
            "unsure" => Ok(Confidence::Unsure),
            "dont-know" => Ok(Confidence::DontKnow),
            _ => Err(ParseAnswerError::Confidence(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAnswerError {
    #[error("'{0}' is not one of the options A-E")]
    Option(String),
    #[error("'{0}' is not a confidence level (very-confident, unsure, dont-know)")]
    Confidence(String),
}

/// The participant's response to one question during a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Answer {
    pub option: Option<OptionLetter>,
    pub confidence: Option<Confidence>,
}

impl Answer {
    pub fn is_blank(&self) -> bool {
        self.option.is_none() && self.confidence.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.option.is_some() && self.confidence.is_some()
    }

    /// Exactly one of option/confidence is set.
    pub fn is_partial(&self) -> bool {
        self.option.is_some() != self.confidence.is_some()
    }
}

/// One answer as it arrives in a `POST /submit-test` body.
///
/// Fields stay as raw strings here; the submission store validates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    #[serde(deserialize_with = "string_or_number")]
    pub question_id: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub confidence: String,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub subtopic_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub competence: String,
}

/// Persisted row of `answers.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub user_id: String,
    #[serde(default)]
    pub test_code: String,
    pub question_id: String,
    #[serde(with = "blank", default)]
    pub answer: Option<OptionLetter>,
    #[serde(with = "blank", default)]
    pub confidence: Option<Confidence>,
    pub correct_answer: String,
    pub subtopic_id: String,
    pub competence: String,
}

impl AnswerRecord {
    /// Unanswered questions are never correct, even against a blank key.
    pub fn is_correct(&self) -> bool {
        match self.answer {
            Some(letter) => self
                .correct_answer
                .trim()
                .eq_ignore_ascii_case(letter.as_str()),
            None => false,
        }
    }
}
