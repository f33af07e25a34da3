/**
This module parses the rows of a task file. A row holds four tab-separated fields: the masked
input template, the head entity, the tail entity and the relation specification. The relation
specification is either a bracketed list of paraphrases using `<A>`/`<B>` or a single template
using `[X]`/`[Y]`.
*/
pub mod literal;

use crate::normalize::{
    clean_reference, replace_placeholders, ANGLE_PLACEHOLDERS, SQUARE_PLACEHOLDERS,
};
use either::Either;
use literal::{looks_like_string_list, parse_string_list, LiteralError};
use std::error::Error;
use std::fmt::Display;

/// Number of tab-separated fields in a row.
pub const FIELD_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// The row has fewer than `FIELD_COUNT` fields.
    MissingFields { found: usize },
    /// The relation specification looked like a list but could not be decoded.
    InvalidList(LiteralError),
}

impl Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields { found } => write!(
                f,
                "Malformed row: expected {} tab-separated fields, found {}",
                FIELD_COUNT, found
            ),
            Self::InvalidList(err) => write!(f, "Malformed reference list: {}", err),
        }
    }
}

impl Error for RowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidList(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LiteralError> for RowError {
    fn from(value: LiteralError) -> Self {
        Self::InvalidList(value)
    }
}

/// The relation specification of a row, as found in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationSpec {
    /// Bracketed list of paraphrases using the `<A>`/`<B>` placeholders.
    List(Vec<String>),
    /// Single paraphrase using the `[X]`/`[Y]` placeholders.
    Template(String),
}

impl RelationSpec {
    pub fn parse(raw: &str) -> Result<Self, RowError> {
        if looks_like_string_list(raw) {
            Ok(Self::List(parse_string_list(raw)?))
        } else {
            Ok(Self::Template(String::from(raw)))
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    fn raw_paraphrases(&self) -> Either<impl Iterator<Item = &str>, impl Iterator<Item = &str>> {
        match self {
            Self::List(items) => Either::Left(items.iter().map(String::as_str)),
            Self::Template(template) => Either::Right(std::iter::once(template.as_str())),
        }
    }

    /// Normalized references: placeholders unified to the mask token, lowercased, stripped and
    /// without the space before a final period. Only the placeholders of the detected format are
    /// replaced.
    pub fn references(&self) -> Vec<String> {
        let placeholders: &[&str] = match self {
            Self::List(_) => &ANGLE_PLACEHOLDERS,
            Self::Template(_) => &SQUARE_PLACEHOLDERS,
        };
        self.raw_paraphrases()
            .map(|p| {
                let unified = replace_placeholders(p, placeholders);
                clean_reference(unified.to_lowercase().trim())
            })
            .collect()
    }
}

/// One parsed row of a task file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    /// Masked input given to the inductor.
    pub input: String,
    pub head: String,
    pub tail: String,
    pub relation: RelationSpec,
}

impl TaskRecord {
    /// Parses one line. The line is stripped before being split on tabs, and fields beyond the
    /// fourth are ignored.
    pub fn parse(line: &str) -> Result<Self, RowError> {
        let fields: Vec<&str> = line.trim().split('\t').collect();
        let [input, head, tail, relation, ..] = fields.as_slice() else {
            return Err(RowError::MissingFields {
                found: fields.len(),
            });
        };
        let relation = RelationSpec::parse(relation)?;
        let input = input.trim();
        // The list-style datasets may use `<A>`/`<B>` in the inputs as well.
        let input = if relation.is_list() {
            replace_placeholders(input, &ANGLE_PLACEHOLDERS)
        } else {
            String::from(input)
        };
        Ok(Self {
            input,
            head: String::from(*head),
            tail: String::from(*tail),
            relation,
        })
    }

    pub fn references(&self) -> Vec<String> {
        self.relation.references()
    }
}

impl TryFrom<&str> for TaskRecord {
    type Error = RowError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
