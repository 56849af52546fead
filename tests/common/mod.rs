//! Canned-response HTTP stub for client tests.
//!
//! Binds an ephemeral local port, answers every request with one fixed
//! response, and counts how many requests it saw. Shuts down on drop.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct StubState {
    status: StatusCode,
    content_type: String,
    body: String,
    hits: AtomicUsize,
}

pub struct MockServer {
    addr: SocketAddr,
    state: Arc<StubState>,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
}

impl MockServer {
    pub async fn spawn(status: u16, content_type: &str, body: impl Into<String>) -> Self {
        let state = Arc::new(StubState {
            status: StatusCode::from_u16(status).expect("valid status code"),
            content_type: content_type.to_string(),
            body: body.into(),
            hits: AtomicUsize::new(0),
        });

        let router = Router::new()
            .fallback(canned_response)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("mock server addr");

        let (tx, rx) = oneshot::channel::<()>();
        let server = axum::serve(listener, router.into_make_service());
        tokio::spawn(async move {
            tokio::select! {
                res = server => {
                    if let Err(err) = res {
                        eprintln!("mock server error: {err}");
                    }
                }
                _ = rx => {}
            }
        });

        Self {
            addr,
            state,
            shutdown: Mutex::new(Some(tx)),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.shutdown.lock() {
            if let Some(tx) = guard.take() {
                let _ = tx.send(());
            }
        }
    }
}

async fn canned_response(State(state): State<Arc<StubState>>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    Response::builder()
        .status(state.status)
        .header(header::CONTENT_TYPE, state.content_type.clone())
        .body(Body::from(state.body.clone()))
        .expect("build stub response")
}
