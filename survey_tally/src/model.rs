// ********* Input data structures ***********

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::{Hash, Hasher};

/// A numeric cell value.
///
/// Spreadsheets do not distinguish integers from floats, so both end up here.
/// Equality and hashing work on the bit pattern, after folding `-0.0` into `0.0`.
#[derive(Debug, Clone, Copy)]
pub struct Number(f64);

impl Number {
    pub fn new(x: f64) -> Number {
        if x == 0.0 {
            Number(0.0)
        } else {
            Number(x)
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// The content of a non-empty answer cell.
///
/// The derived order is the one used when writing sorted distributions:
/// booleans first, then numbers, then text.
#[derive(Eq, PartialEq, Debug, Clone, Hash, PartialOrd, Ord)]
pub enum Answer {
    Bool(bool),
    Number(Number),
    Text(String),
}

impl Answer {
    pub fn number(x: f64) -> Answer {
        Answer::Number(Number::new(x))
    }

    pub fn text(s: &str) -> Answer {
        Answer::Text(s.to_string())
    }

    /// The value of a boolean-coded answer: `0`/`1` or `false`/`true`.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Answer::Bool(b) => Some(*b),
            Answer::Number(n) if n.value() == 0.0 => Some(false),
            Answer::Number(n) if n.value() == 1.0 => Some(true),
            _ => None,
        }
    }

    pub fn is_empty_text(&self) -> bool {
        matches!(self, Answer::Text(s) if s.is_empty())
    }
}

impl Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Answer::Bool(true) => write!(f, "TRUE"),
            Answer::Bool(false) => write!(f, "FALSE"),
            Answer::Number(n) => write!(f, "{}", n),
            Answer::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One column of the response sheet: the question in the header, then one
/// cell per respondent. `None` is an empty cell.
#[derive(PartialEq, Debug, Clone)]
pub struct Column {
    pub header: String,
    pub answers: Vec<Option<Answer>>,
}

impl Column {
    pub fn new(header: &str, answers: Vec<Option<Answer>>) -> Column {
        Column {
            header: header.to_string(),
            answers,
        }
    }
}

// ******** Output data structures *********

/// Occurrence counts per answer.
///
/// Keys keep the order in which they were first seen. Counts are always
/// positive.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Tally {
    entries: Vec<(Answer, u64)>,
    index: HashMap<Answer, usize>,
}

impl Tally {
    pub fn new() -> Tally {
        Tally::default()
    }

    pub fn add(&mut self, answer: Answer) {
        self.add_count(answer, 1)
    }

    pub fn add_count(&mut self, answer: Answer, count: u64) {
        if count == 0 {
            return;
        }
        if let Some(idx) = self.index.get(&answer) {
            self.entries[*idx].1 += count;
        } else {
            self.index.insert(answer.clone(), self.entries.len());
            self.entries.push((answer, count));
        }
    }

    pub fn get(&self, answer: &Answer) -> u64 {
        self.index
            .get(answer)
            .map(|idx| self.entries[*idx].1)
            .unwrap_or(0)
    }

    pub fn contains(&self, answer: &Answer) -> bool {
        self.index.contains_key(answer)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &(Answer, u64)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Answer> {
        self.entries.iter().map(|(a, _)| a)
    }

    /// Entries sorted ascending by answer.
    pub fn sorted(&self) -> Vec<(Answer, u64)> {
        let mut res = self.entries.clone();
        res.sort_by(|a, b| a.0.cmp(&b.0));
        res
    }

    /// True if the keys are exactly {0, 1} or exactly {false, true}.
    pub fn is_boolean_coded(&self) -> bool {
        let numbers = [Answer::number(0.0), Answer::number(1.0)];
        let bools = [Answer::Bool(false), Answer::Bool(true)];
        self.len() == 2
            && (numbers.iter().all(|a| self.contains(a)) || bools.iter().all(|a| self.contains(a)))
    }

    /// The count of the "checked" value (`1` or `true`).
    pub fn checked_count(&self) -> u64 {
        self.iter()
            .filter(|(a, _)| a.as_flag() == Some(true))
            .map(|(_, c)| c)
            .sum()
    }
}

impl FromIterator<Answer> for Tally {
    fn from_iter<I: IntoIterator<Item = Answer>>(iter: I) -> Self {
        let mut res = Tally::new();
        for a in iter {
            res.add(a);
        }
        res
    }
}

/// The distribution of the answers to one question.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Distribution {
    /// One count per answer value. Boolean-coded option groups also end up
    /// here, with the option names as answers.
    SingleOption(Tally),
    /// One tally per option, in column order.
    MultiOption(Vec<(String, Tally)>),
}

impl Distribution {
    pub fn is_empty(&self) -> bool {
        match self {
            Distribution::SingleOption(t) => t.is_empty(),
            Distribution::MultiOption(options) => options.iter().all(|(_, t)| t.is_empty()),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct QuestionDistribution {
    pub question: String,
    pub distribution: Distribution,
}
