// src/models/question.rs

use serde::{Deserialize, Serialize};

use crate::models::{answer::OptionLetter, fields::string_or_number};

/// A single multiple-choice question from a packaged test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Context paragraph shown above the prompt.
    #[serde(default)]
    pub scenario: String,

    /// The prompt itself.
    pub question: String,

    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub option_e: String,

    /// Letter of the correct option ("A".."E").
    pub correct_answer: String,

    /// Optional illustration, served from the static directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(deserialize_with = "string_or_number")]
    pub subtopic_id: String,

    #[serde(deserialize_with = "string_or_number")]
    pub competence: String,
}

impl Question {
    /// Text of the given option.
    pub fn option_text(&self, letter: OptionLetter) -> &str {
        match letter {
            OptionLetter::A => &self.option_a,
            OptionLetter::B => &self.option_b,
            OptionLetter::C => &self.option_c,
            OptionLetter::D => &self.option_d,
            OptionLetter::E => &self.option_e,
        }
    }

    pub fn has_image(&self) -> bool {
        self.image_url.as_deref().is_some_and(|url| !url.trim().is_empty())
    }
}

/// On-disk shape of a question package.
///
/// Packages are either a plain array of questions or a database export,
/// where the questions live in the `data` of the first `"table"` entry.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PackageFile {
    Plain(Vec<Question>),
    Export(Vec<ExportEntry>),
}

#[derive(Debug, Deserialize)]
pub struct ExportEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Option<Vec<Question>>,
}

impl PackageFile {
    /// Flattens either shape into the ordered question list.
    /// Returns `None` for an export that carries no table entry.
    pub fn into_questions(self) -> Option<Vec<Question>> {
        match self {
            PackageFile::Plain(questions) => Some(questions),
            PackageFile::Export(entries) => entries
                .into_iter()
                .find(|entry| entry.kind == "table" && entry.data.is_some())
                .and_then(|entry| entry.data),
        }
    }
}
