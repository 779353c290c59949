//! The questionnaire tree: categories of items plus a linkId index
//!
//! The tree is an array of categories, each an array of page items. A
//! lookup table maps every linkId (nested group children included) to its
//! category and page slot, so dependency cross-references never need a
//! pointer-linked structure.
//!
//! Structural authoring errors are reported once, by [`QuestionnaireTree::new`].

use crate::{Item, ItemType, LinkId, QuestionnaireError, QuestionnaireResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Category ─────────────────────────────────────────────────────────

/// An ordered sequence of page items
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub link_id: LinkId,
    /// Category title
    #[serde(default)]
    pub text: String,
    /// One item per page
    #[serde(default, rename = "item")]
    pub items: Vec<Item>,
}

impl Category {
    pub fn new(link_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            link_id: LinkId::new(link_id),
            text: text.into(),
            items: Vec::new(),
        }
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Item at a 1-based page slot
    pub fn page(&self, page_index: usize) -> Option<&Item> {
        page_index.checked_sub(1).and_then(|i| self.items.get(i))
    }

    /// Number of page slots
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn index_item(
    index: &mut HashMap<LinkId, ItemLocation>,
    item: &Item,
    location: ItemLocation,
) -> QuestionnaireResult<()> {
    if index.insert(item.link_id.clone(), location).is_some() {
        return Err(QuestionnaireError::DuplicateLinkId(item.link_id.clone()));
    }
    let nested = ItemLocation {
        depth: location.depth + 1,
        ..location
    };
    for child in &item.items {
        index_item(index, child, nested)?;
    }
    Ok(())
}

// ── Tree ─────────────────────────────────────────────────────────────

/// Where an item lives in the tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemLocation {
    /// Index into the category sequence
    pub category: usize,
    /// 0-based index of the page item within the category
    pub item: usize,
    /// 0 for page items, >0 for children nested inside groups
    pub depth: usize,
}

impl ItemLocation {
    /// 1-based page slot this item is rendered on
    pub fn page_index(&self) -> usize {
        self.item + 1
    }
}

/// Serialized document shape: `{ "item": [ <category>, ... ] }`
#[derive(Deserialize)]
struct QuestionnaireDocument {
    #[serde(default, rename = "item")]
    categories: Vec<Category>,
}

/// Immutable, indexed questionnaire structure
#[derive(Clone, Debug)]
pub struct QuestionnaireTree {
    categories: Vec<Category>,
    index: HashMap<LinkId, ItemLocation>,
}

impl QuestionnaireTree {
    /// Build and validate a tree.
    ///
    /// Fails on duplicate linkIds, dependencies referencing unknown items,
    /// self dependencies, and expected values the referenced item could
    /// never hold.
    pub fn new(categories: Vec<Category>) -> QuestionnaireResult<Self> {
        let mut index = HashMap::new();
        for (category_index, category) in categories.iter().enumerate() {
            for (item_index, item) in category.items.iter().enumerate() {
                let location = ItemLocation {
                    category: category_index,
                    item: item_index,
                    depth: 0,
                };
                index_item(&mut index, item, location)?;
            }
        }

        let tree = Self { categories, index };
        tree.validate_dependencies()?;
        Ok(tree)
    }

    /// Parse a questionnaire document and build the tree
    pub fn from_json(json: &str) -> QuestionnaireResult<Self> {
        let document: QuestionnaireDocument = serde_json::from_str(json)?;
        Self::new(document.categories)
    }

    fn validate_dependencies(&self) -> QuestionnaireResult<()> {
        for category in &self.categories {
            for page_item in &category.items {
                let mut result = Ok(());
                page_item.visit(&mut |item| {
                    if result.is_ok() {
                        result = self.validate_dependency(item);
                    }
                });
                result?;
            }
        }
        Ok(())
    }

    fn validate_dependency(&self, item: &Item) -> QuestionnaireResult<()> {
        let Some(dependency) = &item.dependency else {
            return Ok(());
        };
        if dependency.question == item.link_id {
            return Err(QuestionnaireError::SelfDependency(item.link_id.clone()));
        }
        let target = self.find(&dependency.question).ok_or_else(|| {
            QuestionnaireError::MalformedDependency {
                item: item.link_id.clone(),
                references: dependency.question.clone(),
            }
        })?;
        // Integer answers compare numerically against decimal expectations
        let numeric =
            target.item_type == ItemType::Integer && dependency.answer.as_number().is_some();
        if !numeric && !target.item_type.accepts(&dependency.answer) {
            return Err(QuestionnaireError::DependencyTypeMismatch {
                item: item.link_id.clone(),
                references: target.link_id.clone(),
                item_type: target.item_type,
                value_kind: dependency.answer.kind(),
            });
        }
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, category_index: usize) -> Option<&Category> {
        self.categories.get(category_index)
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Item at a (category, 1-based page) slot
    pub fn page(&self, category_index: usize, page_index: usize) -> Option<&Item> {
        self.category(category_index)?.page(page_index)
    }

    pub fn location(&self, link_id: &LinkId) -> Option<ItemLocation> {
        self.index.get(link_id).copied()
    }

    /// Find any item, nested or not, by linkId
    pub fn find(&self, link_id: &LinkId) -> Option<&Item> {
        let location = self.location(link_id)?;
        self.categories[location.category].items[location.item].find(link_id)
    }

    pub fn contains(&self, link_id: &LinkId) -> bool {
        self.index.contains_key(link_id)
    }

    /// Total number of items, nested children included
    pub fn item_count(&self) -> usize {
        self.index.len()
    }

    /// Total number of page slots across all categories
    pub fn page_count(&self) -> usize {
        self.categories.iter().map(Category::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.page_count() == 0
    }
}
