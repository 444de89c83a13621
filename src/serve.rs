//! Development server for the generated site.
//!
//! A small `tiny_http` static file server over `config.build.output`:
//!
//! - `index.html` resolution for directory paths (`/products/mug`)
//! - content type by extension
//! - 404 page for paths that were never generated
//! - port auto-retry and graceful shutdown on Ctrl+C

use crate::{config::SiteConfig, log};
use anyhow::{Context, Result, anyhow};
use std::{
    fs,
    net::{IpAddr, SocketAddr},
    path::{Component, Path, PathBuf},
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// 404 page HTML template (embedded at compile time)
const NOT_FOUND_TEMPLATE: &str = include_str!("embed/not_found.html");

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

/// Serve the output directory until Ctrl+C.
pub fn serve_site(config: &SiteConfig) -> Result<()> {
    let interface: IpAddr = config
        .serve
        .interface
        .parse()
        .with_context(|| format!("Invalid interface `{}`", config.serve.interface))?;

    let (server, addr) = try_bind_port(interface, config.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &config.build.output) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(interface: IpAddr, base_port: u16, max_retries: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Request Handling
// ============================================================================

/// What a request path resolves to.
#[derive(Debug, PartialEq, Eq)]
enum Resolved {
    File(PathBuf),
    NotFound(String),
}

fn handle_request(request: Request, root: &Path) -> Result<()> {
    match resolve(request.url(), root) {
        Resolved::File(path) => serve_file(request, &path),
        Resolved::NotFound(path) => serve_not_found(request, &path),
    }
}

/// Map a request URL to a file under `root`.
///
/// Resolution order: exact file, then `<dir>/index.html`. Query strings are
/// ignored and `..` components never match.
fn resolve(url: &str, root: &Path) -> Resolved {
    let url_path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = urlencoding::decode(url_path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| url_path.to_owned());
    let request_path = decoded.trim_matches('/');

    let relative = Path::new(request_path);
    let escapes_root = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));
    if escapes_root {
        return Resolved::NotFound(decoded);
    }

    let local_path = root.join(relative);
    if local_path.is_file() {
        return Resolved::File(local_path);
    }

    let index = local_path.join("index.html");
    if index.is_file() {
        return Resolved::File(index);
    }

    Resolved::NotFound(decoded)
}

fn serve_file(request: Request, path: &Path) -> Result<()> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let response = Response::from_data(content).with_header(content_type(guess_content_type(path))?);
    request.respond(response)?;
    Ok(())
}

fn serve_not_found(request: Request, path: &str) -> Result<()> {
    #[allow(clippy::literal_string_with_formatting_args)]
    let body = NOT_FOUND_TEMPLATE.replace("{path}", &quick_xml::escape::escape(path));
    let response = Response::from_string(body)
        .with_status_code(StatusCode(404))
        .with_header(content_type("text/html; charset=utf-8")?);
    request.respond(response)?;
    Ok(())
}

fn content_type(value: &str) -> Result<Header> {
    Header::from_bytes("Content-Type", value).map_err(|()| anyhow!("Invalid header value `{value}`"))
}

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",

        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",

        _ => "application/octet-stream",
    }
}
