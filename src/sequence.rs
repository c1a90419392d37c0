//! Preset sequences and the parser for their text representation.

use std::{fmt::Display, str::FromStr};

use pest::{iterators::Pair, Parser};
use pest_derive::Parser;

use crate::{Error, PresetId, Result};

// -------------------------------------------------------------------------------------------------

/// Maximum number of entries a parsed [`Sequence`] may have, after unfolding all ranges.
pub const MAX_SEQUENCE_LENGTH: usize = 10_000;

// -------------------------------------------------------------------------------------------------

#[derive(Parser)]
#[grammar = "sequence.pest"]
struct SequenceParser;

// -------------------------------------------------------------------------------------------------

/// A single, decoded entry of a [`Sequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceStep {
    /// Apply the preset with the given id.
    Preset(PresetId),
    /// Apply a randomly picked, existing preset.
    Random,
    /// Apply the preset with the given id, then mutate it.
    Mutate(PresetId),
}

impl From<i32> for SequenceStep {
    fn from(value: i32) -> Self {
        match value {
            0 => Self::Random,
            v if v < 0 => Self::Mutate(v.unsigned_abs()),
            v => Self::Preset(v as PresetId),
        }
    }
}

impl Display for SequenceStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preset(id) => write!(f, "{id}"),
            Self::Random => write!(f, "?"),
            Self::Mutate(id) => write!(f, "{id}*"),
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// An ordered list of preset selectors, used by the [`Sequencer`](crate::Sequencer).
///
/// Entries are signed integers: a positive value is a preset id, `0` picks a random preset
/// and a negative value `-n` applies preset `n` and then mutates it.
///
/// Sequences are usually parsed from a text. The text is a comma separated list of terms:
///
/// | Term            | Result                                 |
/// |-----------------|----------------------------------------|
/// | `n`             | preset `n`                             |
/// | `n*` or `*n`    | preset `n`, mutated                    |
/// | `?`             | a random preset                        |
/// | `a-b`           | presets `a` to `b`, may be descending  |
/// | `?-n` or `n-?`  | `n` random presets                     |
/// | `?-?`           | a single random preset                 |
///
/// ```rust
/// use presets::Sequence;
///
/// let sequence = Sequence::parse("1, 2, 3-6, ?, 5-3, 4*").unwrap();
/// assert_eq!(sequence.as_slice(), &[1, 2, 3, 4, 5, 6, 0, 5, 4, 3, -4]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    steps: Vec<i32>,
}

impl Sequence {
    /// Create a sequence from raw, already compiled entries.
    pub fn from_steps(steps: Vec<i32>) -> Self {
        Self { steps }
    }

    /// Parse a sequence text.
    ///
    /// All characters besides digits and `,`, `-`, `?`, `*` are removed before parsing.
    /// An empty text results in an empty sequence.
    ///
    /// ### Errors
    /// Returns [`Error::Parse`] for malformed terms, such as empty terms or numbers which
    /// don't fit into an `i32`, and for sequences with more than [`MAX_SEQUENCE_LENGTH`]
    /// entries.
    pub fn parse(text: &str) -> Result<Self> {
        let sanitized = Self::sanitize(text);
        let mut pairs = SequenceParser::parse(Rule::sequence, &sanitized)
            .map_err(|err| Error::Parse(format!("'{sanitized}': {err}")))?;
        let sequence = pairs
            .next()
            .ok_or_else(|| Error::Parse(format!("'{sanitized}': missing sequence")))?;
        let mut steps = Vec::new();
        for pair in sequence.into_inner() {
            match pair.as_rule() {
                Rule::index => steps.push(Self::parse_index(pair)?),
                Rule::random => steps.push(0),
                Rule::mutation => {
                    let index = pair
                        .into_inner()
                        .next()
                        .ok_or_else(|| Error::Parse("missing mutation index".to_string()))?;
                    steps.push(-Self::parse_index(index)?);
                }
                Rule::range => {
                    let available = MAX_SEQUENCE_LENGTH.saturating_sub(steps.len());
                    steps.extend(Self::unfold_range(pair, available)?);
                }
                Rule::EOI => (),
                rule => {
                    return Err(Error::Parse(format!("unexpected term: {rule:?}")));
                }
            }
            if steps.len() > MAX_SEQUENCE_LENGTH {
                return Err(Self::too_long());
            }
        }
        Ok(Self { steps })
    }

    /// Raw sequence entries.
    pub fn as_slice(&self) -> &[i32] {
        &self.steps
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// true when the sequence has no entries.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Decoded step at the given index.
    pub fn step(&self, index: usize) -> Option<SequenceStep> {
        self.steps.get(index).copied().map(SequenceStep::from)
    }

    /// Iterate over all decoded steps.
    pub fn steps(&self) -> impl Iterator<Item = SequenceStep> + '_ {
        self.steps.iter().copied().map(SequenceStep::from)
    }

    // strip everything but digits and the term delimiters
    fn sanitize(text: &str) -> String {
        text.chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '-' | '?' | '*'))
            .collect()
    }

    fn parse_index(pair: Pair<Rule>) -> Result<i32> {
        pair.as_str()
            .parse::<i32>()
            .map_err(|err| Error::Parse(format!("invalid preset index '{}': {err}", pair.as_str())))
    }

    // unfold a range into at most `max_len` entries
    fn unfold_range(pair: Pair<Rule>, max_len: usize) -> Result<Vec<i32>> {
        let mut bounds = pair.into_inner();
        let (Some(start), Some(end)) = (bounds.next(), bounds.next()) else {
            return Err(Error::Parse("incomplete range".to_string()));
        };
        let random_run = |count: i32| {
            let count = count as usize;
            if count > max_len {
                Err(Self::too_long())
            } else {
                Ok(vec![0; count])
            }
        };
        match (start.as_rule(), end.as_rule()) {
            (Rule::index, Rule::index) => {
                let start = Self::parse_index(start)?;
                let end = Self::parse_index(end)?;
                let count = (i64::from(end) - i64::from(start)).unsigned_abs() + 1;
                if count > max_len as u64 {
                    Err(Self::too_long())
                } else if start <= end {
                    Ok((start..=end).collect())
                } else {
                    Ok((end..=start).rev().collect())
                }
            }
            (Rule::random, Rule::random) => Ok(vec![0]),
            (Rule::random, Rule::index) => random_run(Self::parse_index(end)?),
            (Rule::index, Rule::random) => random_run(Self::parse_index(start)?),
            (start, end) => Err(Error::Parse(format!(
                "unexpected range bounds: {start:?}-{end:?}"
            ))),
        }
    }

    fn too_long() -> Error {
        Error::Parse(format!(
            "sequence exceeds the maximum length of {MAX_SEQUENCE_LENGTH} presets"
        ))
    }
}

impl FromStr for Sequence {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Self::parse(text)
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let steps = self.steps().map(|s| s.to_string()).collect::<Vec<_>>();
        write!(f, "[{}]", steps.join(", "))
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(text: &str) -> Vec<i32> {
        Sequence::parse(text).unwrap().as_slice().to_vec()
    }

    #[test]
    fn indices_and_ranges() {
        assert_eq!(parse("1,2,3-6,2"), vec![1, 2, 3, 4, 5, 6, 2]);
        assert_eq!(parse("1, 2, 3 - 6, 2"), vec![1, 2, 3, 4, 5, 6, 2]);
        assert_eq!(parse("5-3"), vec![5, 4, 3]);
        assert_eq!(parse("4-4"), vec![4]);
        assert_eq!(parse("12"), vec![12]);
    }

    #[test]
    fn random_picks() {
        assert_eq!(parse("?"), vec![0]);
        assert_eq!(parse("?-3"), vec![0, 0, 0]);
        assert_eq!(parse("3-?"), vec![0, 0, 0]);
        assert_eq!(parse("?-?"), vec![0]);
        assert_eq!(parse("1, ? - 3, 2, ?"), vec![1, 0, 0, 0, 2, 0]);
    }

    #[test]
    fn mutations() {
        assert_eq!(parse("4*"), vec![-4]);
        assert_eq!(parse("*4"), vec![-4]);
        assert_eq!(parse("1,2*,3"), vec![1, -2, 3]);
    }

    #[test]
    fn sanitizing() {
        assert_eq!(parse("presets: 1, then 2-3!"), vec![1, 2, 3]);
        assert_eq!(parse(""), Vec::<i32>::new());
        assert_eq!(parse("abc"), Vec::<i32>::new());
        assert_eq!(parse("1,2,"), vec![1, 2]);
    }

    #[test]
    fn errors() {
        for text in [",1", "1,,2", "-", "1-", "1-2-3", "**4", "4**", "?4", "99999999999"] {
            assert!(
                matches!(Sequence::parse(text), Err(Error::Parse(_))),
                "expected '{text}' to fail"
            );
        }
    }

    #[test]
    fn length_limit() {
        let max = MAX_SEQUENCE_LENGTH;
        assert_eq!(Sequence::parse(&format!("?-{max}")).unwrap().len(), max);
        assert_eq!(Sequence::parse(&format!("1-{max}")).unwrap().len(), max);
        for text in [
            "?-2000000000".to_string(),
            "2000000000-?".to_string(),
            "1-2000000000".to_string(),
            "2147483647-0".to_string(),
            format!("1-{}", max + 1),
            format!("1-{max}, 7"),
            format!("?-{max}, 1-2"),
        ] {
            assert!(
                matches!(Sequence::parse(&text), Err(Error::Parse(_))),
                "expected '{text}' to fail"
            );
        }
    }

    #[test]
    fn pure() {
        let text = "3-1, ?-2, 7*";
        assert_eq!(Sequence::parse(text).unwrap(), Sequence::parse(text).unwrap());
    }

    #[test]
    fn steps() {
        let sequence: Sequence = "2, ?, 3*".parse().unwrap();
        assert_eq!(
            sequence.steps().collect::<Vec<_>>(),
            vec![
                SequenceStep::Preset(2),
                SequenceStep::Random,
                SequenceStep::Mutate(3)
            ]
        );
        assert_eq!(sequence.step(3), None);
        assert_eq!(sequence.to_string(), "[2, ?, 3*]");
    }
}
