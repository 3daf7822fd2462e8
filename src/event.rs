use serde::{Deserialize, Serialize};

use crate::capabilities::{ClassifyResult, TranslateResult};
use crate::model::BatchId;

/// Everything that can happen to the core: shell interactions and capability
/// completions alike, processed one at a time by `App::update`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Fired once by the shell at startup; provisions the translation model.
    AppStarted,

    /// The shell captured or selected an image and has a display URI for it.
    ImageSelected {
        uri: String,
    },

    /// Raw encoded image bytes to run through classification.
    AnalyzeImage {
        #[serde(with = "serde_bytes")]
        data: Vec<u8>,
    },

    /// Manual search for an arbitrary term (home screen chips, search box).
    SearchRequested {
        term: String,
    },

    /// Search for one of the currently listed products.
    ProductSearchRequested {
        index: usize,
    },

    ClearRecentSearches,

    /// Inbound store deep link, e.g. `…?product=shoes&store=amazon`.
    DeepLinkReceived {
        url: String,
    },

    // Capability completions (boxed to keep the enum small).
    LabelsDetected(Box<ClassifyResult>),
    TranslationCompleted {
        batch: BatchId,
        index: usize,
        result: TranslateResult,
    },
    TranslatorModelReady(Box<TranslateResult>),
}

impl Event {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AppStarted => "app_started",
            Self::ImageSelected { .. } => "image_selected",
            Self::AnalyzeImage { .. } => "analyze_image",
            Self::SearchRequested { .. } => "search_requested",
            Self::ProductSearchRequested { .. } => "product_search_requested",
            Self::ClearRecentSearches => "clear_recent_searches",
            Self::DeepLinkReceived { .. } => "deep_link_received",
            Self::LabelsDetected(_) => "labels_detected",
            Self::TranslationCompleted { .. } => "translation_completed",
            Self::TranslatorModelReady(_) => "translator_model_ready",
        }
    }
}
