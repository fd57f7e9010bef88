//! Shared fixtures: a local warp server standing in for the CRM endpoints.

use std::collections::HashMap;
use std::fs;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use log::LevelFilter;
use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::reply::{WithHeader, WithStatus};
use warp::Filter;

use crate::api::Resource;
use crate::logger::RunLogger;

pub const TEST_TOKEN: &str = "T";

/// Logger writing to `<dir>/test.log`.
pub fn file_logger(dir: &Path) -> RunLogger {
    RunLogger::open_file(dir.join("test.log"), LevelFilter::Debug).unwrap()
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Base URL of a local port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Canned answer of one mocked endpoint.
#[derive(Debug, Clone)]
pub struct Endpoint {
    status: u16,
    body: String,
}

impl Endpoint {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    fn reply(&self) -> WithHeader<WithStatus<String>> {
        warp::reply::with_header(
            warp::reply::with_status(self.body.clone(), StatusCode::from_u16(self.status).unwrap()),
            "content-type",
            "application/json",
        )
    }
}

#[derive(Debug, Clone)]
pub struct MockSetup {
    /// `None` answers with [`TEST_TOKEN`] and the mock's own base URL as instance URL.
    pub token: Option<Endpoint>,
    pub user_info: Endpoint,
    pub org_info: Endpoint,
}

impl Default for MockSetup {
    fn default() -> Self {
        Self {
            token: None,
            user_info: Endpoint::json(200, json!({"preferred_username": "user@example.com"})),
            org_info: Endpoint::json(200, json!({"orgName": "Acme"})),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedGet {
    pub path: &'static str,
    pub authorization: Option<String>,
}

pub struct MockCrm {
    pub base_url: String,
    token_forms: Arc<Mutex<Vec<HashMap<String, String>>>>,
    gets: Arc<Mutex<Vec<RecordedGet>>>,
}

impl MockCrm {
    /// Serve `setup` on an ephemeral port. Must be called inside a tokio runtime.
    pub fn start(setup: MockSetup) -> Self {
        let token_forms = Arc::new(Mutex::new(Vec::new()));
        let gets = Arc::new(Mutex::new(Vec::new()));
        let base_url = Arc::new(OnceLock::<String>::new());

        let token_route = {
            let forms = Arc::clone(&token_forms);
            let base_url = Arc::clone(&base_url);
            let token = setup.token.clone();
            warp::post()
                .and(warp::path!("services" / "oauth2" / "token"))
                .and(warp::body::form::<HashMap<String, String>>())
                .map(move |form: HashMap<String, String>| {
                    forms.lock().unwrap().push(form);
                    let endpoint = token.clone().unwrap_or_else(|| {
                        Endpoint::json(
                            200,
                            json!({
                                "access_token": TEST_TOKEN,
                                "instance_url": base_url.get().cloned().unwrap_or_default(),
                                "token_type": "Bearer",
                            }),
                        )
                    });
                    endpoint.reply()
                })
        };

        let user_info_route = warp::get()
            .and(warp::path!("services" / "oauth2" / "userinfo"))
            .and(warp::header::optional::<String>("authorization"))
            .map(recorder(&gets, Resource::UserInfo, setup.user_info));

        let org_info_route = warp::get()
            .and(warp::path!("services" / "apexrest" / "OrgInfoAPI"))
            .and(warp::header::optional::<String>("authorization"))
            .map(recorder(&gets, Resource::OrgInfo, setup.org_info));

        let routes = token_route.or(user_info_route).or(org_info_route);
        let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);

        let url = format!("http://{addr}");
        base_url.set(url.clone()).unwrap();

        Self {
            base_url: url,
            token_forms,
            gets,
        }
    }

    pub fn token_forms(&self) -> Vec<HashMap<String, String>> {
        self.token_forms.lock().unwrap().clone()
    }

    pub fn gets(&self) -> Vec<RecordedGet> {
        self.gets.lock().unwrap().clone()
    }
}

fn recorder(
    gets: &Arc<Mutex<Vec<RecordedGet>>>,
    resource: Resource,
    endpoint: Endpoint,
) -> impl Fn(Option<String>) -> WithHeader<WithStatus<String>> + Clone + Send + Sync + 'static {
    let gets = Arc::clone(gets);
    move |authorization| {
        gets.lock().unwrap().push(RecordedGet {
            path: resource.path(),
            authorization,
        });
        endpoint.reply()
    }
}
