use crate::actions;
use crate::app::ChatApp;
use crate::ui_page::build_chat_page;
use anyhow::{Context, Result};
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use log::{debug, error, info};
use serde::Serialize;
use serde_json::Value;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub const DEFAULT_UI_BIND: &str = "127.0.0.1:3000";
const PAGE_TITLE: &str = "Gemini Chat";

/// Bind the UI server and serve until the listener fails.
pub async fn serve(app: Arc<ChatApp>, bind: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind UI server to {}", bind))?;

    info!("Chat UI available on http://{}", bind);
    serve_listener(app, listener).await
}

/// Accept connections on an already-bound listener, one task per connection.
pub async fn serve_listener(app: Arc<ChatApp>, listener: TcpListener) -> Result<()> {
    loop {
        let (stream, peer) = listener
            .accept()
            .await
            .context("Failed to accept connection")?;
        debug!("UI connection from {}", peer);

        let io = TokioIo::new(stream);
        let app = app.clone();

        tokio::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| {
                let app = app.clone();
                async move { Ok::<_, Infallible>(route(app, req).await) }
            });

            if let Err(e) = Builder::new(TokioExecutor::new())
                .serve_connection(io, service)
                .await
            {
                debug!("UI connection from {} ended with error: {}", peer, e);
            }
        });
    }
}

async fn route(app: Arc<ChatApp>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match (&method, path.as_str()) {
        (&Method::GET, "/") | (&Method::GET, "/index.html") => {
            respond(StatusCode::OK, "text/html; charset=utf-8", build_chat_page(PAGE_TITLE))
        }
        (&Method::GET, "/state") => json_response(StatusCode::OK, &app.view_state(false)),
        (&Method::POST, _) if path.starts_with("/action/") => {
            let name = &path["/action/".len()..];
            if !actions::ACTION_MAP.contains_key(name) {
                return text_response(StatusCode::NOT_FOUND, format!("Unknown action: {}", name));
            }

            let payload = match read_payload(req).await {
                Ok(payload) => payload,
                Err(e) => return text_response(StatusCode::BAD_REQUEST, e),
            };

            match actions::dispatch(name, app.clone(), payload).await {
                Some(Ok(outcome)) => {
                    json_response(StatusCode::OK, &app.view_state(outcome.clear_input))
                }
                Some(Err(e)) => text_response(StatusCode::BAD_REQUEST, e),
                None => text_response(StatusCode::NOT_FOUND, format!("Unknown action: {}", name)),
            }
        }
        _ => text_response(StatusCode::NOT_FOUND, "404 Not Found".to_string()),
    }
}

/// Read a JSON request body. An empty body reads as `{}`.
async fn read_payload(req: Request<Incoming>) -> Result<Value, String> {
    let body = req
        .into_body()
        .collect()
        .await
        .map_err(|e| format!("Failed to read request body: {}", e))?
        .to_bytes();

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(&body).map_err(|e| format!("Invalid JSON body: {}", e))
}

fn respond(status: StatusCode, content_type: &'static str, body: String) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

fn text_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    respond(status, "text/plain; charset=utf-8", body)
}

fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
    match serde_json::to_string(value) {
        Ok(body) => respond(status, "application/json", body),
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            text_response(StatusCode::INTERNAL_SERVER_ERROR, "Serialization failed".to_string())
        }
    }
}
