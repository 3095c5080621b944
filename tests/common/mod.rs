#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use wcs_client::{HttpResponse, Result, Transport};

pub const ENDPOINT: &str = "http://localhost:8080/rasdaman/ows";

pub fn fixture(name: &str) -> Vec<u8> {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", name]
        .iter()
        .collect();
    std::fs::read(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

pub fn fixture_text(name: &str) -> String {
    String::from_utf8(fixture(name)).unwrap()
}

/// One recorded request: the URL and its query parameters.
pub type Request = (String, Vec<(String, String)>);

/// Answers every request with the same response and records what was asked.
pub struct CannedTransport {
    response: HttpResponse,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl CannedTransport {
    pub fn new(response: HttpResponse) -> (Self, Arc<Mutex<Vec<Request>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let transport = Self {
            response,
            requests: Arc::clone(&requests),
        };
        (transport, requests)
    }
}

impl Transport for CannedTransport {
    fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push((
            url.to_string(),
            params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));
        Ok(self.response.clone())
    }
}
