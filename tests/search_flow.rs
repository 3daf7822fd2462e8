use crux_core::testing::AppTester;

use product_finder_core::capabilities::{DetectedLabel, LauncherOperation, TranslatorOutput};
use product_finder_core::{App, Effect, Event, Model, MAX_RECENT_SEARCHES};

fn launched_urls(effects: Vec<Effect>) -> Vec<String> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::Launcher(request) => {
                let LauncherOperation::OpenUrl { url } = request.operation.clone();
                Some(url)
            }
            _ => None,
        })
        .collect()
}

#[test]
fn manual_search_records_history_and_opens_the_browser() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(
        Event::SearchRequested {
            term: "zapato".into(),
        },
        &mut model,
    );

    assert_eq!(model.recent_searches.to_vec(), vec!["zapato"]);
    assert_eq!(
        launched_urls(update.effects),
        vec!["https://www.google.com/search?q=zapato"]
    );
}

#[test]
fn history_caps_at_six_and_deduplicates_across_interleavings() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    for term in ["a", "b", "c", "d", "e", "f", "g", "c"] {
        app.update(
            Event::SearchRequested { term: term.into() },
            &mut model,
        );
    }

    let history = model.recent_searches.to_vec();
    assert_eq!(history.len(), MAX_RECENT_SEARCHES);
    assert_eq!(history, vec!["c", "g", "f", "e", "d", "b"]);
}

#[test]
fn repeated_search_moves_to_front_without_growing() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    for term in ["phone", "book", "phone"] {
        app.update(
            Event::SearchRequested { term: term.into() },
            &mut model,
        );
    }

    assert_eq!(model.recent_searches.to_vec(), vec!["phone", "book"]);
}

#[test]
fn clearing_history_then_searching_leaves_one_entry() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    for term in ["a", "b", "c"] {
        app.update(
            Event::SearchRequested { term: term.into() },
            &mut model,
        );
    }
    app.update(Event::ClearRecentSearches, &mut model);
    assert!(model.recent_searches.is_empty());

    app.update(
        Event::SearchRequested { term: "cup".into() },
        &mut model,
    );
    assert_eq!(model.recent_searches.to_vec(), vec!["cup"]);
}

#[test]
fn product_search_prefers_the_translated_name() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    // Scan one product and complete its translation.
    let update = app.update(
        Event::AnalyzeImage {
            data: encoded_png(),
        },
        &mut model,
    );
    let mut classify = update
        .effects
        .into_iter()
        .find_map(|effect| match effect {
            Effect::Classifier(request) => Some(request),
            _ => None,
        })
        .expect("a classify request");
    let update = app
        .resolve(&mut classify, Ok(vec![DetectedLabel::new("Shoe", 0.9)]))
        .expect("resolved");
    let mut translate = None;
    for event in update.events {
        let update = app.update(event, &mut model);
        translate = update.effects.into_iter().find_map(|effect| match effect {
            Effect::Translator(request) => Some(request),
            _ => None,
        });
    }
    let mut translate = translate.expect("a translate request");
    let update = app
        .resolve(
            &mut translate,
            Ok(TranslatorOutput::Translated {
                text: "Zapato".into(),
            }),
        )
        .expect("resolved");
    for event in update.events {
        app.update(event, &mut model);
    }

    let update = app.update(Event::ProductSearchRequested { index: 0 }, &mut model);
    assert_eq!(
        launched_urls(update.effects),
        vec!["https://www.google.com/search?q=Zapato"]
    );
    assert_eq!(model.recent_searches.most_recent(), Some("Zapato"));
}

#[test]
fn product_search_for_unknown_index_is_a_no_op() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::ProductSearchRequested { index: 3 }, &mut model);
    assert!(update.effects.is_empty());
    assert!(model.recent_searches.is_empty());
}

#[test]
fn deep_link_with_store_opens_the_store_search() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(
        Event::DeepLinkReceived {
            url: "productfinder://stores?product=shoes&store=amazon".into(),
        },
        &mut model,
    );

    assert_eq!(
        launched_urls(update.effects),
        vec!["https://www.amazon.com.mx/s?k=shoes"]
    );
    // Deep links bypass the history entirely.
    assert!(model.recent_searches.is_empty());
}

#[test]
fn deep_link_without_store_defaults_to_google_shopping() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(
        Event::DeepLinkReceived {
            url: "productfinder://stores?product=shoes".into(),
        },
        &mut model,
    );

    assert_eq!(
        launched_urls(update.effects),
        vec!["https://www.google.com/search?tbm=shop&q=shoes"]
    );
}

#[test]
fn deep_link_without_product_is_dropped_silently() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(
        Event::DeepLinkReceived {
            url: "productfinder://stores?store=ebay".into(),
        },
        &mut model,
    );

    assert!(update.effects.is_empty());
}

fn encoded_png() -> Vec<u8> {
    use std::io::Cursor;
    let pixels = image::RgbImage::from_pixel(16, 16, image::Rgb([10, 10, 10]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(pixels)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .expect("encode test png");
    out
}
