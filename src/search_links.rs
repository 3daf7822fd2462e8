//! Web-search and store deep-link URL construction.
//!
//! Manual searches always go to Google; inbound deep links of the form
//! `…?product=<term>&store=<store>` are resolved to one of four fixed store
//! search templates. A link without a `product` parameter resolves to
//! nothing and is dropped silently by the caller.

use url::Url;

pub const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search";
const MERCADOLIBRE_SEARCH_URL: &str = "https://www.mercadolibre.com.mx/search";
const AMAZON_SEARCH_URL: &str = "https://www.amazon.com.mx/s";
const EBAY_SEARCH_URL: &str = "https://www.ebay.com/sch/i.html";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Store {
    MercadoLibre,
    Amazon,
    Ebay,
    /// Any unrecognised or absent store parameter: Google shopping.
    #[default]
    All,
}

impl Store {
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "mercadolibre" => Self::MercadoLibre,
            "amazon" => Self::Amazon,
            "ebay" => Self::Ebay,
            _ => Self::All,
        }
    }

    /// Search URL for `product` on this store, with the term
    /// percent-encoded into the query.
    #[must_use]
    pub fn search_url(self, product: &str) -> String {
        let (base, key) = match self {
            Self::MercadoLibre => (MERCADOLIBRE_SEARCH_URL, "q"),
            Self::Amazon => (AMAZON_SEARCH_URL, "k"),
            Self::Ebay => (EBAY_SEARCH_URL, "_nkw"),
            Self::All => (GOOGLE_SEARCH_URL, "q"),
        };

        // The bases are known-valid constants; fall back to the bare base
        // rather than panicking if that ever stops being true.
        let Ok(mut url) = Url::parse(base) else {
            return base.to_string();
        };
        {
            let mut pairs = url.query_pairs_mut();
            if self == Self::All {
                pairs.append_pair("tbm", "shop");
            }
            pairs.append_pair(key, product);
        }
        url.into()
    }
}

/// Plain Google search used for every manual search action.
#[must_use]
pub fn web_search_url(term: &str) -> String {
    let Ok(mut url) = Url::parse(GOOGLE_SEARCH_URL) else {
        return GOOGLE_SEARCH_URL.to_string();
    };
    url.query_pairs_mut().append_pair("q", term);
    url.into()
}

/// Resolve an inbound store deep link to an external search URL.
///
/// Returns `None` when the link does not parse or carries no `product`
/// parameter; `store` defaults to "all".
#[must_use]
pub fn resolve_store_link(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;

    let mut product = None;
    let mut store = Store::All;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "product" => product = Some(value.into_owned()),
            "store" => store = Store::from_param(&value),
            _ => {}
        }
    }

    let product = product?;
    Some(store.search_url(&product))
}
