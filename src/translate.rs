use crate::error::TranslationError;
use crate::http;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_TRANSLATION_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
pub const DEFAULT_TARGET_LANGUAGE: &str = "vi";

/// Selections longer than this many characters are sent in pieces.
pub const MAX_UNCHUNKED_CHARS: usize = 1000;
pub const WORDS_PER_CHUNK: usize = 200;

pub trait Translator {
    fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslationError>;
}

/// Split a selection into request-sized pieces.
///
/// Short text is passed through untouched. Long text is cut into runs of at
/// most `WORDS_PER_CHUNK` whitespace-separated words, rejoined with single
/// spaces.
pub fn split_into_chunks(text: &str) -> Vec<String> {
    if text.chars().count() <= MAX_UNCHUNKED_CHARS {
        return vec![text.to_string()];
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(WORDS_PER_CHUNK)
        .map(|chunk| chunk.join(" "))
        .collect()
}

/// Translate every chunk in order and join the results with single spaces.
/// The first failing chunk aborts the whole translation.
pub fn translate_selection(
    translator: &dyn Translator,
    text: &str,
    target_language: &str,
) -> Result<String, TranslationError> {
    let chunks = split_into_chunks(text);
    log::debug!(
        "translating {} chars in {} chunk(s) to {}",
        text.chars().count(),
        chunks.len(),
        target_language
    );
    let translated = chunks
        .iter()
        .map(|chunk| translator.translate(chunk, target_language))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(translated.join(" "))
}

/// Client for the public Google Translate `translate_a/single` endpoint.
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    endpoint: String,
    timeout: Duration,
}

impl GoogleTranslator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
        }
    }

    /// The response is `[[["translated", "source", ...], ...], ...]`; the
    /// translation is the concatenation of the first field of each segment.
    fn parse_response(body: &Value) -> Result<String, TranslationError> {
        let segments = body
            .get(0)
            .and_then(Value::as_array)
            .ok_or(TranslationError::EmptyResponse)?;
        let text: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect();
        if text.is_empty() {
            return Err(TranslationError::EmptyResponse);
        }
        Ok(text)
    }
}

impl Translator for GoogleTranslator {
    fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslationError> {
        let client = http::http_client(&self.endpoint, self.timeout)?;

        let response = client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_language),
                ("dt", "t"),
                ("q", text),
            ])
            .send()?
            .error_for_status()?;
        let body: Value = response.json()?;
        Self::parse_response(&body)
    }
}
