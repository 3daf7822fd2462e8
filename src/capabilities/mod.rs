mod classifier;
mod launcher;
mod translator;

pub use self::classifier::{
    ClassificationError, Classifier, ClassifierOperation, ClassifyResult, DetectedLabel,
    PreparedImage,
};
pub use self::launcher::{Launcher, LauncherOperation};
pub use self::translator::{
    LanguagePair, TranslateResult, TranslationError, Translator, TranslatorOperation,
    TranslatorOutput,
};

/// Crux's built-in Render capability is used directly; it is all we need to
/// trigger view updates.
pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

// The derive requires the event parameter spelled out on each field.
#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub classifier: Classifier<Event>,
    pub translator: Translator<Event>,
    pub launcher: Launcher<Event>,
}
