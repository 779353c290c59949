//! Questionnaire items: the read-only building blocks of every page
//!
//! An item is either a single question, a display-only text, or a group of
//! questions that share one page. Items can be gated by a [`Dependency`] on
//! another item's answer.

use crate::AnswerValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ── Identifiers ──────────────────────────────────────────────────────

/// Hierarchical identifier of a questionnaire item (e.g. `"4.1.1"`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(pub String);

impl LinkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LinkId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// ── Item Type ────────────────────────────────────────────────────────

/// The closed set of item types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemType {
    /// Container whose children are rendered on the same page
    Group,
    /// Text shown to the user, never answered
    Display,
    Boolean,
    Decimal,
    Integer,
    Date,
    DateTime,
    Time,
    String,
    Text,
    Choice,
    #[serde(rename = "open-choice")]
    OpenChoice,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Display => "display",
            Self::Boolean => "boolean",
            Self::Decimal => "decimal",
            Self::Integer => "integer",
            Self::Date => "date",
            Self::DateTime => "dateTime",
            Self::Time => "time",
            Self::String => "string",
            Self::Text => "text",
            Self::Choice => "choice",
            Self::OpenChoice => "open-choice",
        }
    }

    /// Whether items of this type hold answers
    pub fn is_answerable(&self) -> bool {
        !matches!(self, Self::Group | Self::Display)
    }

    /// Whether a value of the given kind can be recorded for this type
    pub fn accepts(&self, value: &AnswerValue) -> bool {
        match (self, value) {
            (Self::Boolean, AnswerValue::Boolean(_)) => true,
            (Self::Decimal, AnswerValue::Decimal(_) | AnswerValue::Integer(_)) => true,
            (Self::Integer, AnswerValue::Integer(_)) => true,
            (Self::Date, AnswerValue::Date(_)) => true,
            (Self::DateTime, AnswerValue::DateTime(_)) => true,
            (Self::Time, AnswerValue::Time(_)) => true,
            (Self::String | Self::Text, AnswerValue::String(_)) => true,
            (Self::Choice, AnswerValue::Coding(_)) => true,
            (Self::OpenChoice, AnswerValue::Coding(_) | AnswerValue::String(_)) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Dependency ───────────────────────────────────────────────────────

/// Comparison applied between the referenced item's answer and the
/// expected value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[default]
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<=")]
    LessOrEqual,
}

impl Operator {
    /// Apply the operator to a recorded answer and the expected value.
    ///
    /// Values of incomparable kinds never match. Ordering operators only
    /// apply to numeric and temporal values.
    pub fn matches(&self, actual: &AnswerValue, expected: &AnswerValue) -> bool {
        let Some(ordering) = actual.compare(expected) else {
            return false;
        };
        match self {
            Self::Equals => ordering == Ordering::Equal,
            Self::NotEquals => ordering != Ordering::Equal,
            _ if !(actual.is_ordered() && expected.is_ordered()) => false,
            Self::GreaterThan => ordering == Ordering::Greater,
            Self::LessThan => ordering == Ordering::Less,
            Self::GreaterOrEqual => ordering != Ordering::Less,
            Self::LessOrEqual => ordering != Ordering::Greater,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::GreaterOrEqual => ">=",
            Self::LessOrEqual => "<=",
        }
    }
}

/// Prerequisite that must hold before an item is presented
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    /// The item whose answer gates this one
    pub question: LinkId,
    #[serde(default)]
    pub operator: Operator,
    /// The value the recorded answer is compared against
    pub answer: AnswerValue,
}

impl Dependency {
    pub fn new(question: impl Into<String>, operator: Operator, answer: AnswerValue) -> Self {
        Self {
            question: LinkId::new(question),
            operator,
            answer,
        }
    }

    /// Dependency satisfied when `question` was answered with exactly `answer`
    pub fn equals(question: impl Into<String>, answer: AnswerValue) -> Self {
        Self::new(question, Operator::Equals, answer)
    }
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.question,
            self.operator.as_str(),
            self.answer
        )
    }
}

// ── Item ─────────────────────────────────────────────────────────────

/// A single questionnaire item
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub link_id: LinkId,
    /// Question text shown to the user
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<Dependency>,
    /// Upper bound on the length of string answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Children of a group, rendered on the parent's page
    #[serde(default, rename = "item", skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
}

impl Item {
    pub fn new(link_id: impl Into<String>, text: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            link_id: LinkId::new(link_id),
            text: text.into(),
            item_type,
            required: false,
            dependency: None,
            max_length: None,
            items: Vec::new(),
        }
    }

    pub fn group(link_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(link_id, text, ItemType::Group)
    }

    pub fn display(link_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(link_id, text, ItemType::Display)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependency = Some(dependency);
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_child(mut self, child: Item) -> Self {
        self.items.push(child);
        self
    }

    pub fn is_group(&self) -> bool {
        self.item_type == ItemType::Group
    }

    pub fn is_answerable(&self) -> bool {
        self.item_type.is_answerable()
    }

    /// Visit this item and all its descendants, parents first
    pub fn visit<'a>(&'a self, visitor: &mut impl FnMut(&'a Item)) {
        visitor(self);
        for child in &self.items {
            child.visit(visitor);
        }
    }

    /// Find this item or one of its descendants by linkId
    pub fn find(&self, link_id: &LinkId) -> Option<&Item> {
        if &self.link_id == link_id {
            return Some(self);
        }
        self.items.iter().find_map(|child| child.find(link_id))
    }
}
