use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::search_history::SearchHistory;

/// One candidate product detected in the current image.
///
/// Created from a classifier label with `is_translating = true`; replaced
/// (never mutated field-by-field) once its translation completes or fails.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub translated_name: String,
    pub confidence: f32,
    pub is_translating: bool,
}

impl Product {
    /// A freshly classified entry awaiting translation.
    #[must_use]
    pub fn pending(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            translated_name: String::new(),
            confidence,
            is_translating: true,
        }
    }

    /// The terminal entry after a successful translation.
    #[must_use]
    pub fn translated(&self, text: impl Into<String>) -> Self {
        Self {
            translated_name: text.into(),
            is_translating: false,
            ..self.clone()
        }
    }

    /// The terminal entry after a failed translation: echo the source text.
    #[must_use]
    pub fn untranslated(&self) -> Self {
        self.translated(self.name.clone())
    }

    /// Query string for a web search, preferring the translation.
    #[must_use]
    pub fn search_term(&self) -> &str {
        if self.translated_name.is_empty() {
            &self.name
        } else {
            &self.translated_name
        }
    }
}

/// Identity token for one translation fan-out.
///
/// Completions carry this token so a batch abandoned by a newer scan cannot
/// corrupt the state of its successor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(Uuid);

impl BatchId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Accumulator for one in-flight translation fan-out.
///
/// Each completion writes into the slot of its dispatch index, so the merged
/// list restores classification order by construction. A slot fills at most
/// once; the batch is complete when every slot is filled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranslationBatch {
    id: BatchId,
    slots: Vec<Option<Product>>,
    remaining: usize,
}

impl TranslationBatch {
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            id: BatchId::new(),
            slots: vec![None; size],
            remaining: size,
        }
    }

    #[must_use]
    pub fn id(&self) -> BatchId {
        self.id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Record the terminal entry for one dispatch index.
    ///
    /// Returns `false` for an out-of-range index or an already-filled slot;
    /// the remaining count only moves on the first completion per index.
    pub fn record(&mut self, index: usize, product: Product) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(product);
        self.remaining -= 1;
        true
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// The merged entries in original classification order.
    ///
    /// Only meaningful once [`Self::is_complete`] holds; unfilled slots are
    /// skipped rather than invented.
    #[must_use]
    pub fn into_products(self) -> Vec<Product> {
        self.slots.into_iter().flatten().collect()
    }
}

/// The session-scoped state owned by the core.
///
/// Only ever mutated inside `App::update`; the shell observes it exclusively
/// through whole [`crate::ViewModel`] snapshots.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub products: Vec<Product>,
    pub is_analyzing: bool,
    pub is_translating: bool,
    pub current_image_uri: Option<String>,
    pub recent_searches: SearchHistory,
    pub translation_batch: Option<TranslationBatch>,
    pub translator_ready: bool,
}
