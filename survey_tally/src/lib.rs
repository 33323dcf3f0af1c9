mod model;
use log::{debug, info, warn};

pub use crate::model::*;

/// Separates the question from the option in the header of a grouped column,
/// as in `Languages - Python`.
pub const OPTION_SEPARATOR: &str = " - ";

/// The columns answering one question, as indexes into the original list of
/// columns.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum QuestionColumns {
    /// A column that is a question on its own.
    Single(usize),
    /// Columns that share the same prefix. Each of them is one option of the
    /// question.
    Group { prefix: String, members: Vec<usize> },
}

/// The text before the first separator, or the whole header if there is none.
pub fn header_prefix(header: &str) -> &str {
    match header.find(OPTION_SEPARATOR) {
        Some(pos) => &header[..pos],
        None => header,
    }
}

fn option_name<'a>(header: &'a str, prefix: &str) -> &'a str {
    header
        .strip_prefix(prefix)
        .and_then(|s| s.strip_prefix(OPTION_SEPARATOR))
        .unwrap_or(header)
}

/// Sorts the columns by header and gathers the consecutive ones sharing the
/// same prefix.
///
/// The questions come out in header order. A header without separator is
/// always a question on its own, even when another column has exactly the
/// same header.
pub fn group_columns(columns: &[Column]) -> Vec<QuestionColumns> {
    let mut order: Vec<usize> = (0..columns.len()).collect();
    order.sort_by(|a, b| columns[*a].header.cmp(&columns[*b].header));

    let mut res: Vec<QuestionColumns> = Vec::new();
    let mut start = 0;
    while start < order.len() {
        let header = columns[order[start]].header.as_str();
        if !header.contains(OPTION_SEPARATOR) {
            if start + 1 < order.len() && columns[order[start + 1]].header == header {
                warn!(
                    "group_columns: several columns share the header {:?}, they are treated as separate questions",
                    header
                );
            }
            res.push(QuestionColumns::Single(order[start]));
            start += 1;
            continue;
        }

        let prefix = header_prefix(header);
        let mut end = start + 1;
        while end < order.len() {
            let next = columns[order[end]].header.as_str();
            if !next.contains(OPTION_SEPARATOR) || header_prefix(next) != prefix {
                break;
            }
            end += 1;
        }

        let members = &order[start..end];
        debug!("group_columns: prefix {:?}: columns {:?}", prefix, members);
        if members.len() > 1 {
            res.push(QuestionColumns::Group {
                prefix: prefix.to_string(),
                members: members.to_vec(),
            });
        } else {
            res.push(QuestionColumns::Single(order[start]));
        }
        start = end;
    }
    res
}

/// Counts the non-empty cells of a column.
pub fn single_option_distribution(column: &Column) -> QuestionDistribution {
    let tally: Tally = column.answers.iter().flatten().cloned().collect();
    debug!(
        "single_option_distribution: {:?}: {} answers, {} distinct",
        column.header,
        tally.total(),
        tally.len()
    );
    QuestionDistribution {
        question: column.header.clone(),
        distribution: Distribution::SingleOption(tally),
    }
}

/// Counts the answers of each option of a grouped question.
///
/// Empty strings are not counted. When every option was answered only with
/// 0 and 1 (or false and true), the result is flattened to the number of
/// respondents that checked each option.
pub fn multi_option_distribution(prefix: &str, columns: &[&Column]) -> QuestionDistribution {
    let options: Vec<(String, Tally)> = columns
        .iter()
        .map(|c| {
            let tally: Tally = c
                .answers
                .iter()
                .flatten()
                .filter(|a| !a.is_empty_text())
                .cloned()
                .collect();
            (option_name(&c.header, prefix).to_string(), tally)
        })
        .collect();

    let boolean_coded = !options.is_empty() && options.iter().all(|(_, t)| t.is_boolean_coded());
    debug!(
        "multi_option_distribution: {:?}: {} options, boolean coded: {}",
        prefix,
        options.len(),
        boolean_coded
    );

    let distribution = if boolean_coded {
        let mut checked = Tally::new();
        for (name, tally) in options.iter() {
            checked.add_count(Answer::Text(name.clone()), tally.checked_count());
        }
        Distribution::SingleOption(checked)
    } else {
        Distribution::MultiOption(options)
    };

    QuestionDistribution {
        question: prefix.to_string(),
        distribution,
    }
}

/// Groups the columns and computes the distribution of every question, in
/// header order.
pub fn compute_distributions(columns: &[Column]) -> Vec<QuestionDistribution> {
    let groups = group_columns(columns);
    info!(
        "compute_distributions: {} columns, {} questions",
        columns.len(),
        groups.len()
    );
    groups
        .iter()
        .map(|g| match g {
            QuestionColumns::Single(idx) => single_option_distribution(&columns[*idx]),
            QuestionColumns::Group { prefix, members } => {
                let cols: Vec<&Column> = members.iter().map(|idx| &columns[*idx]).collect();
                multi_option_distribution(prefix, &cols)
            }
        })
        .collect()
}
