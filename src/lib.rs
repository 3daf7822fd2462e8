//! Shared core of the product finder app.
//!
//! The shell (Android/iOS/Web) owns camera, permissions, navigation and the
//! on-device ML runtimes; this crate owns the state machine: classify an
//! image into candidate products, translate the labels, keep a bounded
//! recent-search history, and hand search URLs to the shell to open.
//!
//! All state lives in [`Model`] and is only touched inside `App::update`,
//! one event at a time; the shell observes whole [`ViewModel`] snapshots.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod capabilities;
pub mod image_prep;
pub mod search_links;

mod event;
mod model;
mod search_history;

use serde::{Deserialize, Serialize};

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use event::Event;
pub use model::{BatchId, Model, Product, TranslationBatch};
pub use search_history::SearchHistory;

/// Only the top labels of a scan become products.
pub const MAX_LABELS_PER_SCAN: usize = 5;
/// Recent-search history capacity.
pub const MAX_RECENT_SEARCHES: usize = 6;

pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
pub const MAX_IMAGE_DIMENSION: u32 = 4096;
pub const MAX_IMAGE_ALLOC: u64 = 100 * 1024 * 1024;
pub const MAX_PROCESSED_DIMENSION: u32 = 1024;

/// Substitute content when classification fails: the failure is swallowed
/// and the user sees these instead of an error.
pub const FALLBACK_LABELS: &[(&str, f32)] = &[("Phone", 0.8), ("Book", 0.7), ("Cup", 0.6)];

/// Presentation snapshot of one product entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub name: String,
    pub translated_name: String,
    pub confidence: f32,
    pub is_translating: bool,
    /// Pre-computed query string: the translation when present, else the
    /// original label.
    pub search_term: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            translated_name: product.translated_name.clone(),
            confidence: product.confidence,
            is_translating: product.is_translating,
            search_term: product.search_term().to_string(),
        }
    }
}

/// The single read model for presentation; rebuilt in full on every render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub products: Vec<ProductView>,
    pub is_analyzing: bool,
    pub is_translating: bool,
    pub current_image_uri: Option<String>,
    pub recent_searches: Vec<String>,
}

pub mod app {
    use super::{
        image_prep, search_links, Event, Model, Product, ProductView, ViewModel, FALLBACK_LABELS,
        MAX_LABELS_PER_SCAN,
    };
    use crate::capabilities::{Capabilities, DetectedLabel, LanguagePair, TranslatorOutput};
    use crate::model::TranslationBatch;

    #[derive(Default)]
    pub struct App;

    impl App {
        fn fallback_products() -> Vec<Product> {
            FALLBACK_LABELS
                .iter()
                .map(|&(name, confidence)| Product::pending(name, confidence))
                .collect()
        }

        fn products_from_labels(labels: Vec<DetectedLabel>) -> Vec<Product> {
            // Capability order is kept as-is; the classifier already ranks.
            labels
                .into_iter()
                .take(MAX_LABELS_PER_SCAN)
                .map(|label| Product::pending(label.name, label.confidence))
                .collect()
        }

        /// Publish a freshly classified batch and fan out its translations.
        ///
        /// Every entry is dispatched tagged with the batch id and its own
        /// index, so completions merge positionally no matter what order
        /// they arrive in.
        fn begin_translation(products: Vec<Product>, model: &mut Model, caps: &Capabilities) {
            model.is_analyzing = false;

            for product in &products {
                model.recent_searches.push(product.name.clone());
            }
            model.products.clone_from(&products);

            if products.is_empty() {
                // Nothing to translate; the barrier is already satisfied.
                model.is_translating = false;
                model.translation_batch = None;
                caps.render.render();
                return;
            }

            model.is_translating = true;
            let batch = TranslationBatch::new(products.len());
            let batch_id = batch.id();
            model.translation_batch = Some(batch);

            for (index, product) in products.into_iter().enumerate() {
                caps.translator.translate(
                    LanguagePair::default(),
                    product.name,
                    move |result| Event::TranslationCompleted {
                        batch: batch_id,
                        index,
                        result,
                    },
                );
            }

            caps.render.render();
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            tracing::debug!(event = event.name(), "update");

            match event {
                Event::AppStarted => {
                    caps.translator
                        .download_model(LanguagePair::default(), |result| {
                            Event::TranslatorModelReady(Box::new(result))
                        });
                    caps.render.render();
                }

                Event::TranslatorModelReady(result) => match *result {
                    Ok(TranslatorOutput::ModelReady) => {
                        model.translator_ready = true;
                        tracing::info!("translation model ready");
                    }
                    Ok(other) => {
                        tracing::warn!(?other, "unexpected translator output while provisioning");
                    }
                    Err(error) => {
                        // Provisioning is best-effort; translate calls will
                        // fail per-entry and fall back to the source text.
                        tracing::warn!(%error, "translation model provisioning failed");
                    }
                },

                Event::ImageSelected { uri } => {
                    model.current_image_uri = Some(uri);
                    caps.render.render();
                }

                Event::AnalyzeImage { data } => {
                    model.is_analyzing = true;
                    model.products.clear();
                    model.translation_batch = None;
                    model.is_translating = false;
                    caps.render.render();

                    match image_prep::prepare_for_classification(&data) {
                        Ok(image) => {
                            caps.classifier.classify(image, |result| {
                                Event::LabelsDetected(Box::new(result))
                            });
                        }
                        Err(error) => {
                            // Degraded exactly like a classifier fault.
                            tracing::warn!(%error, "image preparation failed, using fallback set");
                            Self::begin_translation(Self::fallback_products(), model, caps);
                        }
                    }
                }

                Event::LabelsDetected(result) => {
                    let products = match *result {
                        Ok(labels) => Self::products_from_labels(labels),
                        Err(error) => {
                            tracing::warn!(%error, "classification failed, using fallback set");
                            Self::fallback_products()
                        }
                    };
                    Self::begin_translation(products, model, caps);
                }

                Event::TranslationCompleted {
                    batch,
                    index,
                    result,
                } => {
                    let Some(open_batch) = model.translation_batch.as_mut() else {
                        tracing::debug!(%batch, index, "translation completed with no open batch");
                        return;
                    };
                    if open_batch.id() != batch {
                        tracing::debug!(%batch, index, "stale translation completion dropped");
                        return;
                    }
                    let Some(source) = model.products.get(index) else {
                        tracing::warn!(index, "translation completed for unknown entry");
                        return;
                    };

                    let (replacement, new_search) = match result {
                        Ok(TranslatorOutput::Translated { text }) => {
                            // Blank or identical translations never enter the
                            // history; the entry still records the text.
                            let term = (!text.trim().is_empty() && text != source.name)
                                .then(|| text.clone());
                            (source.translated(text), term)
                        }
                        Ok(other) => {
                            tracing::warn!(?other, "unexpected translator output, echoing source");
                            (source.untranslated(), None)
                        }
                        Err(error) => {
                            tracing::debug!(%error, index, "translation failed, echoing source");
                            (source.untranslated(), None)
                        }
                    };

                    // A dropped completion must leave no trace, so the
                    // history only moves once the slot accepts it.
                    if !open_batch.record(index, replacement) {
                        tracing::debug!(index, "duplicate translation completion dropped");
                        return;
                    }
                    if let Some(term) = new_search {
                        model.recent_searches.push(term);
                    }

                    // Completion barrier: publish only when the whole batch
                    // is merged, in original classification order.
                    if open_batch.is_complete() {
                        if let Some(done) = model.translation_batch.take() {
                            model.products = done.into_products();
                        }
                        model.is_translating = false;
                        caps.render.render();
                    }
                }

                Event::SearchRequested { term } => {
                    model.recent_searches.push(term.clone());
                    caps.launcher
                        .open_url(search_links::web_search_url(&term));
                    caps.render.render();
                }

                Event::ProductSearchRequested { index } => {
                    let Some(term) = model
                        .products
                        .get(index)
                        .map(|product| product.search_term().to_string())
                    else {
                        tracing::warn!(index, "search requested for unknown product");
                        return;
                    };
                    self.update(Event::SearchRequested { term }, model, caps);
                }

                Event::ClearRecentSearches => {
                    model.recent_searches.clear();
                    caps.render.render();
                }

                Event::DeepLinkReceived { url } => {
                    match search_links::resolve_store_link(&url) {
                        Some(target) => caps.launcher.open_url(target),
                        // Missing product parameter: the link is dropped.
                        None => tracing::debug!(url, "deep link dropped"),
                    }
                }
            }
        }

        fn view(&self, model: &Model) -> ViewModel {
            ViewModel {
                products: model.products.iter().map(ProductView::from).collect(),
                is_analyzing: model.is_analyzing,
                is_translating: model.is_translating,
                current_image_uri: model.current_image_uri.clone(),
                recent_searches: model.recent_searches.to_vec(),
            }
        }
    }

}
