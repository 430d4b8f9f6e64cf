//! In-memory REST backend for tests.
//!
//! Serves registered collections with list/create/update/delete semantics,
//! answers fixed responses for action endpoints, and records every request so
//! tests can assert exactly what went over the wire.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Mutex;

use serde_json::{Value, json};

use crate::client::errors::RequestError;
use crate::client::types::{ApiRequest, ApiResponse, Method, Transport};

/// Query parameters the fake applies as exact-match filters on list reads.
const FILTER_PARAMS: &[&str] = &["brand", "category", "resolution"];

struct Route {
    read_path: String,
    write_path: String,
    key_field: String,
}

#[derive(Default)]
struct State {
    routes: Vec<Route>,
    collections: HashMap<String, Vec<Value>>,
    fixed: HashMap<(Method, String), (u16, String)>,
    failures: VecDeque<(u16, String)>,
    log: Vec<ApiRequest>,
}

#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection read from `read_path` and written under
    /// `write_path`, keyed by `key_field`.
    pub fn with_collection(
        self,
        read_path: &str,
        write_path: &str,
        key_field: &str,
        items: Vec<Value>,
    ) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.routes.push(Route {
                read_path: read_path.to_string(),
                write_path: write_path.to_string(),
                key_field: key_field.to_string(),
            });
            state.collections.insert(read_path.to_string(), items);
        }
        self
    }

    pub fn with_response(self, method: Method, path: &str, status: u16, body: Value) -> Self {
        self.with_raw_response(method, path, status, &body.to_string())
    }

    pub fn with_raw_response(self, method: Method, path: &str, status: u16, body: &str) -> Self {
        self.set_response(method, path, status, body);
        self
    }

    pub fn set_response(&self, method: Method, path: &str, status: u16, body: &str) {
        self.state
            .lock()
            .unwrap()
            .fixed
            .insert((method, path.to_string()), (status, body.to_string()));
    }

    /// Make the next request fail with `status` and a JSON `error` message.
    pub fn fail_next(&self, status: u16, message: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .push_back((status, message.to_string()));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().log.len()
    }

    /// Requests other than GET.
    pub fn writes(&self) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != Method::Get)
            .collect()
    }

    pub fn collection(&self, read_path: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .collections
            .get(read_path)
            .cloned()
            .unwrap_or_default()
    }

    fn handle(&self, request: ApiRequest) -> ApiResponse {
        let mut state = self.state.lock().unwrap();
        state.log.push(request.clone());

        if let Some((status, message)) = state.failures.pop_front() {
            return respond(status, json!({ "error": message }));
        }

        if let Some((status, body)) = state.fixed.get(&(request.method, request.path.clone())) {
            return ApiResponse {
                status: *status,
                body: body.clone(),
            };
        }

        let route = state.routes.iter().find_map(|route| {
            if request.method == Method::Get && request.path == route.read_path {
                return Some((route.read_path.clone(), route.key_field.clone(), None));
            }
            if request.method == Method::Post && request.path == route.write_path {
                return Some((route.read_path.clone(), route.key_field.clone(), None));
            }
            request
                .path
                .strip_prefix(&format!("{}/", route.write_path))
                .map(|key| {
                    (
                        route.read_path.clone(),
                        route.key_field.clone(),
                        Some(key.to_string()),
                    )
                })
        });

        let Some((read_path, key_field, key)) = route else {
            return respond(404, json!({ "error": "route not found" }));
        };

        let items = state.collections.entry(read_path).or_default();
        match (request.method, key) {
            (Method::Get, None) => {
                let filtered: Vec<Value> = items
                    .iter()
                    .filter(|item| {
                        FILTER_PARAMS.iter().all(|param| {
                            match request.query_value(param) {
                                Some(wanted) => item.get(*param).and_then(Value::as_str) == Some(wanted),
                                None => true,
                            }
                        })
                    })
                    .cloned()
                    .collect();
                respond(200, Value::Array(filtered))
            }
            (Method::Post, None) => {
                let mut body = request.body.clone().unwrap_or_else(|| json!({}));
                if body.get("id").is_none() {
                    let next_id = items
                        .iter()
                        .filter_map(|i| i.get("id").and_then(Value::as_i64))
                        .max()
                        .unwrap_or(0)
                        + 1;
                    body["id"] = json!(next_id);
                }
                items.push(body.clone());
                respond(201, body)
            }
            (Method::Put, Some(key)) => {
                let Some(item) = items.iter_mut().find(|i| key_matches(i, &key_field, &key)) else {
                    return respond(404, json!({ "error": "not found" }));
                };
                if let (Some(target), Some(Value::Object(patch))) =
                    (item.as_object_mut(), request.body.clone())
                {
                    for (field, value) in patch {
                        if field != key_field {
                            target.insert(field, value);
                        }
                    }
                }
                respond(200, item.clone())
            }
            (Method::Delete, Some(key)) => {
                let before = items.len();
                items.retain(|i| !key_matches(i, &key_field, &key));
                if items.len() == before {
                    respond(404, json!({ "error": "not found" }))
                } else {
                    ApiResponse {
                        status: 204,
                        body: String::new(),
                    }
                }
            }
            _ => respond(405, json!({ "error": "method not allowed" })),
        }
    }
}

fn key_matches(item: &Value, key_field: &str, key: &str) -> bool {
    match item.get(key_field) {
        Some(Value::String(s)) => s == key,
        Some(Value::Number(n)) => n.to_string() == key,
        _ => false,
    }
}

fn respond(status: u16, body: Value) -> ApiResponse {
    ApiResponse {
        status,
        body: body.to_string(),
    }
}

impl Transport for FakeBackend {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, RequestError>> + Send {
        std::future::ready(Ok(self.handle(request)))
    }
}
