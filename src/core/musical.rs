//! core/musical.rs — 12-TET notes, intervals, and the consonance tables.
//!
//! Notes are anchored at C0 = semitone 0. The consonance ordering and rank
//! table are domain constants (Schwartz et al. 2003; Bowling & Purves 2013,
//! doi:10.3389/fpsyg.2013.00264), never computed and never mutated.

use std::fmt;
use std::str::FromStr;

use crate::core::AnalysisError;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A pitch on the 12-tone equal-tempered scale, octave 0 and up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Note {
    semitone: i32,
}

impl Note {
    /// Semitone value relative to C0. Negative values are below the origin.
    pub fn from_semitone(semitone: i32) -> Result<Self, AnalysisError> {
        if semitone < 0 {
            return Err(AnalysisError::InvalidNote(format!(
                "semitone {semitone} below C0"
            )));
        }
        Ok(Self { semitone })
    }

    #[inline]
    pub fn semitone(&self) -> i32 {
        self.semitone
    }

    #[inline]
    pub fn octave(&self) -> i32 {
        self.semitone / 12
    }

    #[inline]
    pub fn pitch_class(&self) -> usize {
        (self.semitone % 12) as usize
    }

    /// The note `semitones` above this one.
    pub fn transposed(&self, semitones: i32) -> Result<Self, AnalysisError> {
        Self::from_semitone(self.semitone + semitones)
    }
}

impl FromStr for Note {
    type Err = AnalysisError;

    /// Accepts sharp and flat spellings ("C#4", "Db4"); flats canonicalize to
    /// their sharp equivalent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AnalysisError::InvalidNote(s.to_string());
        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        let mut pc: i32 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(invalid()),
        };
        let rest = chars.as_str();
        let octave_str = match rest.chars().next() {
            Some('#') => {
                pc += 1;
                &rest[1..]
            }
            Some('b') => {
                pc -= 1;
                &rest[1..]
            }
            _ => rest,
        };
        if octave_str.is_empty() {
            return Err(invalid());
        }
        let octave: i32 = octave_str.parse().map_err(|_| invalid())?;
        // pc is a signed offset, so Cb4 spells down to B3 and B#3 up to C4.
        Self::from_semitone(octave * 12 + pc).map_err(|_| invalid())
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", NOTE_NAMES[self.pitch_class()], self.octave())
    }
}

/// Canonical intervals, unison through octave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interval {
    Unison,
    MinorSecond,
    MajorSecond,
    MinorThird,
    MajorThird,
    PerfectFourth,
    Tritone,
    PerfectFifth,
    MinorSixth,
    MajorSixth,
    MinorSeventh,
    MajorSeventh,
    Octave,
}

impl Interval {
    pub const ALL: [Interval; 13] = [
        Interval::Unison,
        Interval::MinorSecond,
        Interval::MajorSecond,
        Interval::MinorThird,
        Interval::MajorThird,
        Interval::PerfectFourth,
        Interval::Tritone,
        Interval::PerfectFifth,
        Interval::MinorSixth,
        Interval::MajorSixth,
        Interval::MinorSeventh,
        Interval::MajorSeventh,
        Interval::Octave,
    ];

    #[inline]
    pub fn semitones(self) -> i32 {
        match self {
            Interval::Unison => 0,
            Interval::MinorSecond => 1,
            Interval::MajorSecond => 2,
            Interval::MinorThird => 3,
            Interval::MajorThird => 4,
            Interval::PerfectFourth => 5,
            Interval::Tritone => 6,
            Interval::PerfectFifth => 7,
            Interval::MinorSixth => 8,
            Interval::MajorSixth => 9,
            Interval::MinorSeventh => 10,
            Interval::MajorSeventh => 11,
            Interval::Octave => 12,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Interval::Unison => "U",
            Interval::MinorSecond => "m2",
            Interval::MajorSecond => "M2",
            Interval::MinorThird => "m3",
            Interval::MajorThird => "M3",
            Interval::PerfectFourth => "P4",
            Interval::Tritone => "T",
            Interval::PerfectFifth => "P5",
            Interval::MinorSixth => "m6",
            Interval::MajorSixth => "M6",
            Interval::MinorSeventh => "m7",
            Interval::MajorSeventh => "M7",
            Interval::Octave => "O",
        }
    }
}

/// Psychoacoustic consonance ordering, most consonant first (unison excluded).
pub const CONSONANCE_ORDER: [Interval; 12] = [
    Interval::Octave,
    Interval::PerfectFifth,
    Interval::PerfectFourth,
    Interval::MajorThird,
    Interval::MajorSixth,
    Interval::MinorSixth,
    Interval::MinorThird,
    Interval::Tritone,
    Interval::MinorSeventh,
    Interval::MajorSecond,
    Interval::MajorSeventh,
    Interval::MinorSecond,
];

/// Empirical consonance ranks, same order as [`CONSONANCE_ORDER`];
/// lower is more consonant (Schwartz et al. 2003).
pub const CONSONANCE_RANK: [u32; 12] = [2, 3, 4, 5, 5, 6, 7, 8, 9, 9, 11, 12];

const MIN_RANK: f64 = 1.0;
const MAX_RANK: f64 = 12.0;

/// Each canonical interval applied to `root`, in [`Interval::ALL`] order.
pub fn intervals_of(root: Note) -> Vec<(Interval, Note)> {
    Interval::ALL
        .iter()
        .map(|&iv| {
            // Offsets are non-negative, so transposition cannot fall below C0.
            (iv, Note {
                semitone: root.semitone() + iv.semitones(),
            })
        })
        .collect()
}

/// The notes of `root`'s interval set in consonance order.
pub fn consonance_ordered_notes(root: Note) -> Vec<Note> {
    CONSONANCE_ORDER
        .iter()
        .map(|&iv| Note {
            semitone: root.semitone() + iv.semitones(),
        })
        .collect()
}

/// Rank-derived probability distribution: ranks are inverted (13 − rank) and
/// normalized to sum to 1.
pub fn consonance_probabilities(ranks: &[u32]) -> Vec<f64> {
    let inverted: Vec<f64> = ranks.iter().map(|&r| 13.0 - r as f64).collect();
    let total: f64 = inverted.iter().sum();
    if total <= 0.0 {
        return vec![0.0; ranks.len()];
    }
    inverted.into_iter().map(|v| v / total).collect()
}

/// The empirical distribution the evaluator compares against.
pub fn empirical_probabilities() -> Vec<f64> {
    consonance_probabilities(&CONSONANCE_RANK)
}

/// Rank-derived scores rescaled to `[min_value, max_value]`, rounded to four
/// decimals; with `adjust_to_zero` the scores are shifted to sum to 0 (used as
/// signed weights for expectation fields).
pub fn consonance_scores(
    ranks: &[u32],
    min_value: f64,
    max_value: f64,
    adjust_to_zero: bool,
) -> Vec<f64> {
    let range = max_value - min_value;
    let mut scores: Vec<f64> = ranks
        .iter()
        .map(|&r| {
            let inverted = 13.0 - r as f64;
            let normalized = (inverted - MIN_RANK) / (MAX_RANK - MIN_RANK);
            min_value + range * normalized
        })
        .collect();
    if adjust_to_zero && !scores.is_empty() {
        let mean: f64 = scores.iter().sum::<f64>() / scores.len() as f64;
        for s in &mut scores {
            *s -= mean;
        }
    }
    scores
        .into_iter()
        .map(|s| crate::core::round_decimals(s, 4))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(s: &str) -> Note {
        s.parse().unwrap()
    }

    #[test]
    fn semitone_values_anchor_at_c0() {
        assert_eq!(note("C0").semitone(), 0);
        assert_eq!(note("C#0").semitone(), 1);
        assert_eq!(note("D0").semitone(), 2);
        assert_eq!(note("E0").semitone(), 4);
        assert_eq!(note("A2").semitone(), 33);
        assert_eq!(note("C4").semitone(), 48);
    }

    #[test]
    fn semitone_note_round_trip() {
        for s in 0..=120 {
            let n = Note::from_semitone(s).unwrap();
            assert_eq!(n.to_string().parse::<Note>().unwrap(), n);
        }
    }

    #[test]
    fn semitone_is_strictly_increasing_with_octave() {
        let mut prev = -1;
        for octave in 0..8 {
            let s = format!("C{octave}").parse::<Note>().unwrap().semitone();
            assert!(s > prev);
            prev = s;
        }
    }

    #[test]
    fn flats_canonicalize_to_sharps() {
        assert_eq!(note("Db4"), note("C#4"));
        assert_eq!(note("Ab4"), note("G#4"));
        assert_eq!(note("Gb3").to_string(), "F#3");
    }

    #[test]
    fn below_origin_is_rejected() {
        assert!("Cb0".parse::<Note>().is_err());
        assert!(Note::from_semitone(-1).is_err());
        assert!("H4".parse::<Note>().is_err());
        assert!("C".parse::<Note>().is_err());
    }

    #[test]
    fn interval_table_of_c0() {
        let table = intervals_of(note("C0"));
        let expected = [
            ("U", "C0"),
            ("m2", "C#0"),
            ("M2", "D0"),
            ("m3", "D#0"),
            ("M3", "E0"),
            ("P4", "F0"),
            ("T", "F#0"),
            ("P5", "G0"),
            ("m6", "G#0"),
            ("M6", "A0"),
            ("m7", "A#0"),
            ("M7", "B0"),
            ("O", "C1"),
        ];
        for ((iv, n), (label, name)) in table.iter().zip(expected) {
            assert_eq!(iv.label(), label);
            assert_eq!(n.to_string(), name);
        }
    }

    #[test]
    fn interval_table_crosses_octaves() {
        let table = intervals_of(note("A2"));
        let by_label = |l: &str| {
            table
                .iter()
                .find(|(iv, _)| iv.label() == l)
                .map(|(_, n)| n.to_string())
                .unwrap()
        };
        assert_eq!(by_label("m3"), "C3");
        assert_eq!(by_label("P5"), "E3");
        assert_eq!(by_label("O"), "A3");
    }

    #[test]
    fn consonance_order_starts_at_octave_ends_at_minor_second() {
        let notes = consonance_ordered_notes(note("C4"));
        assert_eq!(notes.len(), 12);
        assert_eq!(notes[0], note("C5")); // octave
        assert_eq!(notes[1], note("G4")); // fifth
        assert_eq!(notes[11], note("C#4")); // minor 2nd
    }

    #[test]
    fn empirical_probabilities_sum_to_one_and_decrease() {
        let p = empirical_probabilities();
        assert_eq!(p.len(), 12);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(p.windows(2).all(|w| w[0] >= w[1]));
        assert!((p[0] - 11.0 / 75.0).abs() < 1e-12);
    }

    #[test]
    fn scores_rescale_and_zero_adjust() {
        let scores = consonance_scores(&CONSONANCE_RANK, -1.0, 1.0, false);
        assert!((scores[0] - 0.8182).abs() < 1e-9);
        assert!((scores[11] - (-1.0)).abs() < 1e-9);

        let adjusted = consonance_scores(&CONSONANCE_RANK, -1.0, 1.0, true);
        let sum: f64 = adjusted.iter().sum();
        assert!(sum.abs() < 1e-3);
    }
}
