mod api;

pub use api::{apply_action, build_response, snapshot_board, ActionRequest, ApiResponse};

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tarotboard_core::{decode_fallback_image, BoardSession, CardId};
use tarotboard_data::{load_board, resolve_assets_dir};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};
use tracing::{debug, info, warn};

pub const DEFAULT_ADDR: &str = "127.0.0.1:7878";

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub assets: Option<PathBuf>,
    pub preset: Option<String>,
    pub addr: Option<String>,
}

pub fn run(options: LaunchOptions) -> Result<()> {
    let dir = resolve_assets_dir(options.assets.as_deref());
    let loaded = load_board(&dir, options.preset.as_deref())
        .with_context(|| format!("load board from {}", dir.display()))?;
    let board = BoardSession::new(loaded.catalog, &loaded.config.mode).context("mount board")?;
    let addr = options.addr.as_deref().unwrap_or(DEFAULT_ADDR);
    let server = Server::http(addr).map_err(|err| anyhow!("start server on {addr}: {err}"))?;
    info!(%addr, assets = %dir.display(), "tarotboard web server listening");
    println!("Tarot board web server on http://{addr}");
    let state = Arc::new(Mutex::new(board));
    for request in server.incoming_requests() {
        let state = state.clone();
        if let Err(err) = handle_request(request, state) {
            warn!("request error: {err:#}");
        }
    }
    Ok(())
}

pub fn run_with_args(args: &[String]) -> Result<()> {
    run(parse_options(args))
}

pub fn parse_options(args: &[String]) -> LaunchOptions {
    let mut options = LaunchOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        let value = args.get(idx + 1).cloned();
        let consumed = match args[idx].as_str() {
            "--assets" | "-a" => {
                options.assets = value.map(PathBuf::from);
                true
            }
            "--preset" | "-p" => {
                options.preset = value;
                true
            }
            "--addr" => {
                options.addr = value;
                true
            }
            _ => false,
        };
        idx += if consumed { 2 } else { 1 };
    }
    options
}

fn handle_request(mut request: Request, state: Arc<Mutex<BoardSession>>) -> Result<()> {
    let url = request.url().to_string();
    let method = request.method().clone();
    debug!(%method, %url, "request");
    match (&method, route_path(&url)) {
        (&Method::Get, "/api/state") => {
            let mut guard = state.lock().map_err(|_| anyhow!("board lock poisoned"))?;
            let response = build_response(&mut guard, None);
            drop(guard);
            respond_json(request, &response, 200)?;
        }
        (&Method::Post, "/api/action") => {
            let mut body = String::new();
            request
                .as_reader()
                .read_to_string(&mut body)
                .context("read request body")?;
            let mut guard = state.lock().map_err(|_| anyhow!("board lock poisoned"))?;
            let (response, status) = match serde_json::from_str::<ActionRequest>(&body) {
                Ok(action) => {
                    let name = action.action.clone();
                    let err = apply_action(&mut guard, action);
                    if let Some(err) = err.as_deref() {
                        debug!(action = %name, error = err, "action failed");
                    }
                    (build_response(&mut guard, err), 200)
                }
                Err(err) => (
                    build_response(&mut guard, Some(format!("bad request: {err}"))),
                    400,
                ),
            };
            drop(guard);
            respond_json(request, &response, status)?;
        }
        (&Method::Get, path) => match fallback_card_id(path) {
            Some(id) => {
                let guard = state.lock().map_err(|_| anyhow!("board lock poisoned"))?;
                let svg = guard
                    .catalog()
                    .get(&id)
                    .and_then(|card| decode_fallback_image(&card.fallback_image));
                drop(guard);
                match svg {
                    Some(svg) => respond_bytes(request, svg.into_bytes(), "image/svg+xml")?,
                    None => request.respond(Response::empty(StatusCode(404)))?,
                }
            }
            None => request.respond(Response::empty(StatusCode(404)))?,
        },
        _ => request.respond(Response::empty(StatusCode(404)))?,
    }
    Ok(())
}

/// Request path without its query string.
fn route_path(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}

/// `/api/cards/<id>/fallback.svg` -> `<id>`.
fn fallback_card_id(path: &str) -> Option<CardId> {
    let id = path
        .strip_prefix("/api/cards/")?
        .strip_suffix("/fallback.svg")?;
    if id.is_empty() || id.contains('/') {
        return None;
    }
    Some(CardId::from(id))
}

fn respond_json(request: Request, response: &ApiResponse, status: u16) -> Result<()> {
    let body = serde_json::to_vec_pretty(response).context("encode response")?;
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|_| anyhow!("invalid content type header"))?;
    request.respond(
        Response::from_data(body)
            .with_header(header)
            .with_status_code(StatusCode(status)),
    )?;
    Ok(())
}

fn respond_bytes(request: Request, body: Vec<u8>, content_type: &str) -> Result<()> {
    let header = Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes())
        .map_err(|_| anyhow!("invalid content type header"))?;
    request.respond(Response::from_data(body).with_header(header))?;
    Ok(())
}
