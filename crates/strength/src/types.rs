//! Core types for password analysis

use std::fmt;

use serde::{Deserialize, Serialize};

/// Qualitative strength band derived from the score.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StrengthLevel {
    #[serde(rename = "Very Weak")]
    VeryWeak,
    Weak,
    Fair,
    Good,
    Strong,
    #[serde(rename = "Very Strong")]
    VeryStrong,
}

impl StrengthLevel {
    pub const ALL: [StrengthLevel; 6] = [
        StrengthLevel::VeryWeak,
        StrengthLevel::Weak,
        StrengthLevel::Fair,
        StrengthLevel::Good,
        StrengthLevel::Strong,
        StrengthLevel::VeryStrong,
    ];

    /// Bands are `[0,20) [20,40) [40,60) [60,80) [80,95) [95,100]`.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=19 => StrengthLevel::VeryWeak,
            20..=39 => StrengthLevel::Weak,
            40..=59 => StrengthLevel::Fair,
            60..=79 => StrengthLevel::Good,
            80..=94 => StrengthLevel::Strong,
            _ => StrengthLevel::VeryStrong,
        }
    }

    pub fn crack_time(self) -> CrackTime {
        match self {
            StrengthLevel::VeryWeak => CrackTime::Seconds,
            StrengthLevel::Weak => CrackTime::Minutes,
            StrengthLevel::Fair => CrackTime::Hours,
            StrengthLevel::Good => CrackTime::Days,
            StrengthLevel::Strong => CrackTime::Years,
            StrengthLevel::VeryStrong => CrackTime::Centuries,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StrengthLevel::VeryWeak => "Very Weak",
            StrengthLevel::Weak => "Weak",
            StrengthLevel::Fair => "Fair",
            StrengthLevel::Good => "Good",
            StrengthLevel::Strong => "Strong",
            StrengthLevel::VeryStrong => "Very Strong",
        }
    }
}

impl fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Display-only crack time label. Not a real time estimate.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CrackTime {
    Seconds,
    Minutes,
    Hours,
    Days,
    Years,
    Centuries,
}

impl fmt::Display for CrackTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CrackTime::Seconds => "Seconds",
            CrackTime::Minutes => "Minutes",
            CrackTime::Hours => "Hours",
            CrackTime::Days => "Days",
            CrackTime::Years => "Years",
            CrackTime::Centuries => "Centuries",
        };
        f.write_str(s)
    }
}

/// Informational weakness flags. Each one costs 5 points.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    OnlyLetters,
    OnlyDigits,
    RepeatedCharacter,
    FourDigitSequence,
    ContainsYear,
}

impl Pattern {
    pub fn label(self) -> &'static str {
        match self {
            Pattern::OnlyLetters => "Only letters",
            Pattern::OnlyDigits => "Only numbers",
            Pattern::RepeatedCharacter => "Repeated character",
            Pattern::FourDigitSequence => "Contains 4-digit sequence",
            Pattern::ContainsYear => "Contains year",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Strength {
    /// Clamped to `[0, 100]`.
    pub score: u8,
    pub level: StrengthLevel,
    pub crack_time: CrackTime,
    /// `length * log2(charset)`, one decimal.
    pub entropy_bits: f64,
}

/// Full analysis of one password
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Analysis {
    /// Length in Unicode scalar values.
    pub length: usize,
    pub has_lowercase: bool,
    pub has_uppercase: bool,
    pub has_digits: bool,
    pub has_symbols: bool,
    pub has_repeated_chars: bool,
    pub has_sequential_chars: bool,
    pub is_dictionary_word: bool,
    pub patterns: Vec<Pattern>,
    pub strength: Strength,
}
