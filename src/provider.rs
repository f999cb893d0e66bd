use leptos::logging::log;
use rand::Rng;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
#[cfg(feature = "hydrate")]
use wasm_bindgen::JsCast;

use crate::config::GameConfig;
use crate::error::TriviaError;
use crate::model::{Category, Clue};
use crate::sampler::sample;

/// An entry of the provider's category listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategorySummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
}

/// A single category with its full clue pool, as the provider sends it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryDetails {
    pub title: String,
    #[serde(default)]
    pub clues: Vec<RawClue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawClue {
    #[serde(default, deserialize_with = "text_or_number")]
    pub question: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub answer: String,
}

// Answers are occasionally bare numbers or null.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

pub fn parse_category_pool(body: &str) -> Result<Vec<CategorySummary>, TriviaError> {
    Ok(serde_json::from_str(body)?)
}

pub fn parse_category(body: &str) -> Result<CategoryDetails, TriviaError> {
    Ok(serde_json::from_str(body)?)
}

/// Turns provider markup into plain text: tags are dropped, escaped quotes and the usual
/// entities are decoded, surrounding whitespace is trimmed. A `<` not followed by a letter,
/// `/` or `!` is kept as text.
pub fn clean_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_tag = false;
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '<' if !in_tag && opens_tag(chars.peek()) => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            '\\' if matches!(chars.peek(), Some('\'') | Some('"')) => {}
            _ => out.push(c),
        }
    }
    let out = out
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    out.trim().to_string()
}

fn opens_tag(next: Option<&char>) -> bool {
    matches!(next, Some(&c) if c.is_ascii_alphabetic() || c == '/' || c == '!')
}

/// The external source of categories and clues.
#[allow(async_fn_in_trait)]
pub trait TriviaProvider {
    async fn category_pool(&self, count: usize) -> Result<Vec<CategorySummary>, TriviaError>;
    async fn category(&self, id: u64) -> Result<CategoryDetails, TriviaError>;
}

/// Requests `category_pool_size` candidates and samples `num_categories` distinct ids.
pub async fn fetch_category_ids<P, R>(
    provider: &P,
    config: &GameConfig,
    rng: &mut R,
) -> Result<Vec<u64>, TriviaError>
where
    P: TriviaProvider,
    R: Rng + ?Sized,
{
    let pool = provider.category_pool(config.category_pool_size).await?;
    let mut ids: Vec<u64> = Vec::with_capacity(pool.len());
    for summary in pool {
        if !ids.contains(&summary.id) {
            ids.push(summary.id);
        }
    }
    sample(&ids, config.num_categories, rng)
}

/// Fetches one category and samples `clues_per_category` usable clues from it.
pub async fn fetch_category<P, R>(
    provider: &P,
    id: u64,
    config: &GameConfig,
    rng: &mut R,
) -> Result<Category, TriviaError>
where
    P: TriviaProvider,
    R: Rng + ?Sized,
{
    let details = provider.category(id).await?;
    let usable: Vec<Clue> = details
        .clues
        .iter()
        .map(|raw| Clue::new(clean_text(&raw.question), clean_text(&raw.answer)))
        .filter(|clue| !clue.question.is_empty() && !clue.answer.is_empty())
        .collect();
    Ok(Category {
        title: clean_text(&details.title),
        clues: sample(&usable, config.clues_per_category, rng)?,
    })
}

/// Fetches a whole board. Categories are requested one after another, in sampled order.
pub async fn load_board<P, R>(
    provider: &P,
    config: &GameConfig,
    rng: &mut R,
) -> Result<Vec<Category>, TriviaError>
where
    P: TriviaProvider,
    R: Rng + ?Sized,
{
    config.validate()?;
    let ids = fetch_category_ids(provider, config, rng).await?;
    let mut categories = Vec::with_capacity(ids.len());
    for id in ids {
        let category = fetch_category(provider, id, config, rng).await?;
        log!("Fetched category {}: {}", id, category.title);
        categories.push(category);
    }
    Ok(categories)
}

/// Talks to the provider over `fetch` from the browser.
#[cfg(feature = "hydrate")]
pub struct HttpProvider {
    config: GameConfig,
}

#[cfg(feature = "hydrate")]
impl HttpProvider {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    async fn get_text(url: &str) -> Result<String, TriviaError> {
        use wasm_bindgen_futures::JsFuture;

        let js_err = |e: wasm_bindgen::JsValue| TriviaError::Network(format!("{:?}", e));

        let window =
            web_sys::window().ok_or_else(|| TriviaError::Network("no window".to_string()))?;

        let init = web_sys::RequestInit::new();
        init.set_method("GET");
        init.set_mode(web_sys::RequestMode::Cors);
        let request = web_sys::Request::new_with_str_and_init(url, &init).map_err(js_err)?;

        let response: web_sys::Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_err)?
            .dyn_into()
            .map_err(js_err)?;
        if !response.ok() {
            return Err(TriviaError::Network(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }

        JsFuture::from(response.text().map_err(js_err)?)
            .await
            .map_err(js_err)?
            .as_string()
            .ok_or_else(|| TriviaError::MalformedPayload(format!("{} returned no text", url)))
    }
}

#[cfg(feature = "hydrate")]
impl TriviaProvider for HttpProvider {
    async fn category_pool(&self, count: usize) -> Result<Vec<CategorySummary>, TriviaError> {
        let body = Self::get_text(&self.config.categories_url(count)).await?;
        parse_category_pool(&body)
    }

    async fn category(&self, id: u64) -> Result<CategoryDetails, TriviaError> {
        let body = Self::get_text(&self.config.category_url(id)).await?;
        parse_category(&body)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};

    /// An in-memory provider with `categories` categories of `clues` clues each.
    pub(crate) struct FakeProvider {
        pool: Vec<CategorySummary>,
        details: HashMap<u64, CategoryDetails>,
        pub(crate) requested: RefCell<Vec<u64>>,
        pub(crate) fail_on: Option<u64>,
    }

    impl FakeProvider {
        pub(crate) fn new(categories: u64, clues: usize) -> Self {
            let pool = (1..=categories)
                .map(|id| CategorySummary {
                    id,
                    title: format!("category {id}"),
                })
                .collect();
            let details = (1..=categories)
                .map(|id| {
                    let clues = (0..clues)
                        .map(|n| RawClue {
                            question: format!("question {id}.{n}"),
                            answer: format!("answer {id}.{n}"),
                        })
                        .collect();
                    (
                        id,
                        CategoryDetails {
                            title: format!("category {id}"),
                            clues,
                        },
                    )
                })
                .collect();
            Self {
                pool,
                details,
                requested: RefCell::new(Vec::new()),
                fail_on: None,
            }
        }
    }

    impl TriviaProvider for FakeProvider {
        async fn category_pool(&self, count: usize) -> Result<Vec<CategorySummary>, TriviaError> {
            Ok(self.pool.iter().take(count).cloned().collect())
        }

        async fn category(&self, id: u64) -> Result<CategoryDetails, TriviaError> {
            self.requested.borrow_mut().push(id);
            if self.fail_on == Some(id) {
                return Err(TriviaError::Network("connection reset".to_string()));
            }
            self.details
                .get(&id)
                .cloned()
                .ok_or_else(|| TriviaError::MalformedPayload(format!("unknown id {id}")))
        }
    }

    #[test]
    fn test_parse_category_pool() {
        let body = r#"[
            {"id": 11531, "title": "mixed bag", "clues_count": 5},
            {"id": 11532, "title": "let's \"ch\"at", "clues_count": 5}
        ]"#;
        let pool = parse_category_pool(body).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool[0].id, 11531);
        assert_eq!(pool[1].title, "let's \"ch\"at");
    }

    #[test]
    fn test_parse_category() {
        let body = r#"{
            "id": 11531,
            "title": "mixed bag",
            "clues_count": 3,
            "clues": [
                {"id": 1, "answer": "<i>Hamlet</i>", "question": "Danish prince", "value": 200},
                {"id": 2, "answer": 4, "question": "2 + 2", "value": 400},
                {"id": 3, "answer": null, "question": "Nothing to see", "value": null}
            ]
        }"#;
        let details = parse_category(body).unwrap();
        assert_eq!(details.title, "mixed bag");
        assert_eq!(details.clues[0].answer, "<i>Hamlet</i>");
        assert_eq!(details.clues[1].answer, "4");
        assert_eq!(details.clues[2].answer, "");
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            parse_category_pool("<html>502 Bad Gateway</html>"),
            Err(TriviaError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse_category(r#"{"clues": []}"#),
            Err(TriviaError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("<i>Hamlet</i>"), "Hamlet");
        assert_eq!(clean_text(r#"the \"Bard\""#), "the \"Bard\"");
        assert_eq!(clean_text(r"Plath\'s novel"), "Plath's novel");
        assert_eq!(clean_text("  Tom &amp; Jerry "), "Tom & Jerry");
        assert_eq!(clean_text("a &lt;b&gt; c"), "a <b> c");
        assert_eq!(clean_text("<b></b>"), "");
        assert_eq!(clean_text("<!-- note -->kept"), "kept");
    }

    #[test]
    fn test_clean_text_keeps_bare_less_than() {
        assert_eq!(
            clean_text("Is 3 < 4? This inequality is true"),
            "Is 3 < 4? This inequality is true"
        );
        assert_eq!(clean_text("1 < 2 and 5 > 4"), "1 < 2 and 5 > 4");
        assert_eq!(clean_text("x <3"), "x <3");
        assert_eq!(clean_text("<i>a</i> < <b>b</b>"), "a < b");
    }

    #[tokio::test]
    async fn test_fetch_category_ids() {
        let provider = FakeProvider::new(100, 6);
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let ids = fetch_category_ids(&provider, &config, &mut rng).await.unwrap();
        assert_eq!(ids.len(), 6);
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 6);
        assert!(ids.iter().all(|id| (1..=100).contains(id)));
    }

    #[tokio::test]
    async fn test_fetch_category_ids_pool_too_small() {
        let provider = FakeProvider::new(4, 6);
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            fetch_category_ids(&provider, &config, &mut rng).await,
            Err(TriviaError::InvalidSampleSize {
                requested: 6,
                available: 4
            })
        );
    }

    #[tokio::test]
    async fn test_fetch_category_samples_clues() {
        let provider = FakeProvider::new(10, 20);
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let category = fetch_category(&provider, 7, &config, &mut rng).await.unwrap();
        assert_eq!(category.title, "category 7");
        assert_eq!(category.clues.len(), 6);
        assert!(category
            .clues
            .iter()
            .all(|c| c.question.starts_with("question 7.") && c.text() == "?"));
    }

    #[tokio::test]
    async fn test_fetch_category_skips_empty_clues() {
        let mut provider = FakeProvider::new(1, 6);
        if let Some(details) = provider.details.get_mut(&1) {
            details.clues[0].answer = "<i></i>".to_string();
        }
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            fetch_category(&provider, 1, &config, &mut rng).await,
            Err(TriviaError::InvalidSampleSize {
                requested: 6,
                available: 5
            })
        );
    }

    #[tokio::test]
    async fn test_load_board_is_sequential_and_complete() {
        let provider = FakeProvider::new(100, 8);
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(9);
        let categories = load_board(&provider, &config, &mut rng).await.unwrap();

        assert_eq!(categories.len(), 6);
        assert!(categories.iter().all(|c| c.clues.len() == 6));
        // Categories come back in the order they were requested.
        let requested = provider.requested.borrow().clone();
        let titles: Vec<String> = requested.iter().map(|id| format!("category {id}")).collect();
        let got: Vec<String> = categories.iter().map(|c| c.title.clone()).collect();
        assert_eq!(got, titles);
    }

    #[tokio::test]
    async fn test_load_board_stops_on_first_failure() {
        let mut provider = FakeProvider::new(6, 6);
        provider.fail_on = Some(provider.pool[0].id);
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let result = load_board(&provider, &config, &mut rng).await;
        assert!(matches!(result, Err(TriviaError::Network(_))));
        assert_eq!(provider.requested.borrow().last(), Some(&1));
    }

    #[tokio::test]
    async fn test_load_board_rejects_invalid_config() {
        let provider = FakeProvider::new(100, 6);
        let config = GameConfig {
            num_categories: 0,
            ..GameConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(2);
        assert!(matches!(
            load_board(&provider, &config, &mut rng).await,
            Err(TriviaError::InvalidConfig(_))
        ));
        assert!(provider.requested.borrow().is_empty());
    }
}
