use crate::error::LookupError;
use crate::http;
use crate::models::DictionaryEntry;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_DICTIONARY_ENDPOINT: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";
const NO_DEFINITION: &str = "No definition available.";

pub trait DictionaryLookup {
    fn lookup(&self, word: &str) -> Result<DictionaryEntry, LookupError>;
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ApiEntry {
    word: String,
    phonetic: Option<String>,
    origin: Option<String>,
    meanings: Vec<ApiMeaning>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ApiMeaning {
    definitions: Vec<ApiDefinition>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ApiDefinition {
    definition: String,
}

/// Client for the Free Dictionary API (`{endpoint}/{word}`).
#[derive(Debug, Clone)]
pub struct FreeDictionaryClient {
    endpoint: String,
    timeout: Duration,
}

impl FreeDictionaryClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
        }
    }

    fn entry_url(&self, word: &str) -> Result<reqwest::Url, LookupError> {
        let base = format!("{}/", self.endpoint.trim_end_matches('/'));
        let mut url = reqwest::Url::parse(&base)
            .map_err(|err| LookupError::Transport(format!("bad endpoint {base}: {err}")))?;
        url.path_segments_mut()
            .map_err(|_| LookupError::Transport(format!("bad endpoint {base}")))?
            .pop_if_empty()
            .push(word);
        Ok(url)
    }

    fn first_entry(entries: Vec<ApiEntry>, word: &str) -> Result<DictionaryEntry, LookupError> {
        let entry = entries
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::NotFound(word.to_string()))?;

        let definition = entry
            .meanings
            .first()
            .and_then(|meaning| meaning.definitions.first())
            .map(|d| d.definition.clone())
            .unwrap_or_else(|| NO_DEFINITION.to_string());

        Ok(DictionaryEntry {
            word: entry.word,
            phonetic: entry.phonetic.unwrap_or_default(),
            origin: entry.origin.unwrap_or_default(),
            definition,
        })
    }
}

impl DictionaryLookup for FreeDictionaryClient {
    fn lookup(&self, word: &str) -> Result<DictionaryEntry, LookupError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(LookupError::NotFound(String::new()));
        }

        let client = http::http_client(&self.endpoint, self.timeout)?;

        let url = self.entry_url(word)?;
        log::debug!("dictionary lookup: {url}");
        let response = client.get(url).send()?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(LookupError::NotFound(word.to_string())),
            status if !status.is_success() => Err(LookupError::Transport(format!(
                "dictionary service answered {status}"
            ))),
            _ => {
                let entries: Vec<ApiEntry> = response.json()?;
                Self::first_entry(entries, word)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    fn read_request_line(stream: TcpStream) -> (TcpStream, String) {
        let mut reader = BufReader::new(stream);
        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        (reader.into_inner(), request_line)
    }

    fn write_json_response(stream: &mut TcpStream, status: &str, body: &str) {
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
    }

    /// Serve a single response and hand back the request line it answered.
    fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}/api/v2/entries/en", listener.local_addr().unwrap());
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let (mut stream, request_line) = read_request_line(stream);
            write_json_response(&mut stream, status, body);
            request_line
        });
        (base, server)
    }

    #[test]
    fn first_entry_picks_first_definition() {
        let body = r#"[{
            "word": "hello",
            "phonetic": "həˈləʊ",
            "origin": "early 19th century: variant of earlier hollo",
            "meanings": [
              {"partOfSpeech": "exclamation", "definitions": [
                {"definition": "used as a greeting or to begin a phone conversation."},
                {"definition": "second sense"}
              ]},
              {"partOfSpeech": "noun", "definitions": [{"definition": "an utterance of 'hello'"}]}
            ]
        }]"#;
        let entries: Vec<ApiEntry> = serde_json::from_str(body).unwrap();
        let entry = FreeDictionaryClient::first_entry(entries, "hello").unwrap();
        assert_eq!(entry.word, "hello");
        assert_eq!(entry.phonetic, "həˈləʊ");
        assert!(entry.origin.starts_with("early 19th century"));
        assert_eq!(
            entry.definition,
            "used as a greeting or to begin a phone conversation."
        );
    }

    #[test]
    fn missing_fields_fall_back() {
        let entries: Vec<ApiEntry> = serde_json::from_str(r#"[{"word": "zyx"}]"#).unwrap();
        let entry = FreeDictionaryClient::first_entry(entries, "zyx").unwrap();
        assert_eq!(entry.phonetic, "");
        assert_eq!(entry.origin, "");
        assert_eq!(entry.definition, NO_DEFINITION);
    }

    #[test]
    fn empty_result_is_not_found() {
        let err = FreeDictionaryClient::first_entry(Vec::new(), "void").unwrap_err();
        assert!(matches!(err, LookupError::NotFound(word) if word == "void"));
    }

    #[test]
    fn entry_url_escapes_the_word() {
        let client = FreeDictionaryClient::new(
            "http://example.test/api/v2/entries/en/",
            Duration::from_secs(1),
        );
        let url = client.entry_url("ice cream").unwrap();
        assert_eq!(url.as_str(), "http://example.test/api/v2/entries/en/ice%20cream");
    }

    #[test]
    fn lookup_mock_http_hit() {
        let (base, server) = serve_once(
            "200 OK",
            r#"[{"word":"serendipity","phonetic":"/ˌsɛr.ənˈdɪp.ɪ.ti/","meanings":[{"definitions":[{"definition":"luck that takes the form of finding valuable things"}]}]}]"#,
        );
        let client = FreeDictionaryClient::new(base, Duration::from_secs(2));
        let entry = client.lookup("  serendipity \n").expect("lookup should succeed");
        let request_line = server.join().unwrap();

        assert!(request_line.starts_with("GET /api/v2/entries/en/serendipity "));
        assert_eq!(entry.word, "serendipity");
        assert!(entry.definition.contains("finding valuable things"));
    }

    #[test]
    fn lookup_mock_http_not_found() {
        let (base, server) = serve_once(
            "404 Not Found",
            r#"{"title":"No Definitions Found","message":"Sorry pal"}"#,
        );
        let client = FreeDictionaryClient::new(base, Duration::from_secs(2));
        let err = client.lookup("qwxz").unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, LookupError::NotFound(_)));
    }

    #[test]
    fn lookup_mock_http_server_error_is_transport() {
        let (base, server) = serve_once("500 Internal Server Error", "{}");
        let client = FreeDictionaryClient::new(base, Duration::from_secs(2));
        let err = client.lookup("word").unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, LookupError::Transport(_)));
    }

    #[test]
    fn lookup_unreachable_service_is_transport() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}/entries", listener.local_addr().unwrap());
        drop(listener);
        let client = FreeDictionaryClient::new(base, Duration::from_secs(2));
        let err = client.lookup("word").unwrap_err();
        assert!(matches!(err, LookupError::Transport(_)));
    }
}
