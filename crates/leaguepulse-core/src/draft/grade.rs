// Letter grade bands for normalized draft totals.

use serde::{Serialize, Serializer};
use std::fmt;

/// Letter grade assigned to a normalized draft total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LetterGrade {
    A,
    AMinus,
    BPlus,
    B,
    BMinus,
    CPlus,
    C,
    CMinus,
    DPlus,
    D,
    DMinus,
}

/// Inclusive lower bounds, best band first. Anything below the last bound
/// (including NaN) is D-.
const BANDS: &[(f64, LetterGrade)] = &[
    (92.0, LetterGrade::A),
    (88.0, LetterGrade::AMinus),
    (84.0, LetterGrade::BPlus),
    (80.0, LetterGrade::B),
    (76.0, LetterGrade::BMinus),
    (72.0, LetterGrade::CPlus),
    (68.0, LetterGrade::C),
    (64.0, LetterGrade::CMinus),
    (58.0, LetterGrade::DPlus),
    (52.0, LetterGrade::D),
];

impl LetterGrade {
    /// Map a normalized total onto its band.
    pub fn from_total(total: f64) -> Self {
        BANDS
            .iter()
            .find(|(floor, _)| total >= *floor)
            .map(|(_, grade)| *grade)
            .unwrap_or(LetterGrade::DMinus)
    }

    pub fn label(&self) -> &'static str {
        match self {
            LetterGrade::A => "A",
            LetterGrade::AMinus => "A-",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::BMinus => "B-",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::CMinus => "C-",
            LetterGrade::DPlus => "D+",
            LetterGrade::D => "D",
            LetterGrade::DMinus => "D-",
        }
    }

    /// Canned one-line verdict for the band.
    pub fn note(&self) -> &'static str {
        match self {
            LetterGrade::A => "Elite haul. Set the standard for the league.",
            LetterGrade::AMinus => "Excellent draft with very few soft spots.",
            LetterGrade::BPlus => "Strong foundation with upside to spare.",
            LetterGrade::B => "Solid, well-rounded roster.",
            LetterGrade::BMinus => "Good bones, a couple of questionable reaches.",
            LetterGrade::CPlus => "Serviceable core that needs waiver help.",
            LetterGrade::C => "Middle of the pack. Plenty of work to do.",
            LetterGrade::CMinus => "Thin in places that matter.",
            LetterGrade::DPlus => "Risky build leaning on best-case outcomes.",
            LetterGrade::D => "Major holes across the lineup.",
            LetterGrade::DMinus => "Rough night. The waiver wire is your friend.",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for LetterGrade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
