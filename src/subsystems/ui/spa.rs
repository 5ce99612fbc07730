//! Single-page-app backend.
//!
//! - **development**: every path gets a tiny HTML page whose script sends
//!   the browser to the same path on the frontend dev server.
//! - **production**: files are served from the prebuilt `static_dir`; any
//!   path that is not a file falls back to `index.html` so the client-side
//!   router can take over. Without a build directory, a built-in placeholder
//!   is served for the root path.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{ServeResponse, UiServe};
use crate::core::config::{UiConfig, UiMode};

// ── Built-in fallback ─────────────────────────────────────────────────────────

const PLACEHOLDER_INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>YVI Assistant</title>
  <style>
    *, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: system-ui, -apple-system, sans-serif;
      background: #0f172a; color: #e2e8f0;
      display: flex; align-items: center; justify-content: center;
      height: 100vh;
    }
    .card {
      text-align: center; padding: 2rem 3rem;
      border: 1px solid #334155; border-radius: 12px;
      background: #1e293b;
    }
    h1 { font-size: 1.5rem; margin-bottom: 0.5rem; }
    p  { font-size: 0.9rem; color: #94a3b8; }
    a  { color: #93c5fd; }
  </style>
</head>
<body>
  <div class="card">
    <h1>YVI Assistant</h1>
    <p>Frontend not built yet. Build it into the static directory, or open the <a href="/admin">admin dashboard</a>.</p>
  </div>
</body>
</html>
"#;

// ── SpaBackend ────────────────────────────────────────────────────────────────

enum Target {
    DevServer { base_url: String },
    Bundle { static_dir: Option<PathBuf> },
}

pub struct SpaBackend {
    target: Target,
}

impl SpaBackend {
    pub fn new(config: &UiConfig) -> Self {
        let target = match config.mode {
            UiMode::Development => {
                info!(dev_server = %config.dev_server_url, "spa: redirecting to frontend dev server");
                Target::DevServer { base_url: config.dev_server_url.clone() }
            }
            UiMode::Production => {
                let static_dir = Some(config.static_dir.clone()).filter(|p| p.is_dir());
                match static_dir {
                    Some(ref dir) => info!(dir = %dir.display(), "spa: serving static files from disk"),
                    None => warn!(
                        dir = %config.static_dir.display(),
                        "spa: static directory missing, using built-in placeholder"
                    ),
                }
                Target::Bundle { static_dir }
            }
        };
        Self { target }
    }
}

impl UiServe for SpaBackend {
    fn serve(&self, path: &str) -> Option<ServeResponse> {
        match &self.target {
            Target::DevServer { base_url } => Some(dev_redirect(base_url, path)),
            Target::Bundle { static_dir } => {
                // Reject paths that try to escape the static root.
                if path.contains("..") {
                    return Some(ServeResponse::text(400, "bad request\n"));
                }
                match static_dir {
                    Some(root) => Some(serve_static(root, path)),
                    None => match path {
                        "/" | "/index.html" => {
                            debug!("spa: serving built-in placeholder");
                            Some(ServeResponse::html(200, PLACEHOLDER_INDEX_HTML))
                        }
                        _ => None,
                    },
                }
            }
        }
    }
}

// ── development shim ──────────────────────────────────────────────────────────

/// Redirect shim for `path` on the dev server. `/` maps to the bare base URL.
fn dev_redirect(base_url: &str, path: &str) -> ServeResponse {
    let target = if path == "/" || path.is_empty() {
        base_url.to_string()
    } else {
        format!("{base_url}/{}", path.trim_start_matches('/'))
    };
    let body = format!("<script>window.location.href = {}</script>", js_string(&target));
    ServeResponse::html(200, body)
}

/// Quote `s` as a JS string literal that is also safe inside a `<script>` element.
fn js_string(s: &str) -> String {
    serde_json::to_string(s)
        .unwrap_or_else(|_| "\"/\"".to_string())
        .replace("</", "<\\/")
}

// ── static file serving ───────────────────────────────────────────────────────

/// Serve a file from `root` for the given request `path`.
///
/// - `/` maps to `index.html`.
/// - If the exact file isn't found, falls back to `index.html` (SPA routing).
fn serve_static(root: &Path, path: &str) -> ServeResponse {
    let relative = path.trim_start_matches('/');
    let relative = if relative.is_empty() { "index.html" } else { relative };
    let file_path = root.join(relative);

    if file_path.is_file() {
        return read_static_file(&file_path);
    }

    let index = root.join("index.html");
    if index.is_file() {
        debug!(path, "spa: fallback to index.html");
        return read_static_file(&index);
    }

    ServeResponse::text(404, "not found\n")
}

/// Read a file from disk; the MIME type comes from the extension.
fn read_static_file(path: &Path) -> ServeResponse {
    match std::fs::read(path) {
        Ok(body) => ServeResponse {
            status: 200,
            content_type: mime_from_extension(path),
            body,
        },
        Err(e) => {
            warn!(path = %path.display(), "spa: failed to read file: {e}");
            ServeResponse::text(500, "internal error\n")
        }
    }
}

/// Map a file extension to a MIME content-type string.
fn mime_from_extension(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") => "application/javascript; charset=utf-8",
        Some("json") | Some("map") => "application/json",
        Some("webmanifest") => "application/manifest+json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("txt") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("wasm") => "application/wasm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ui_config(mode: UiMode, static_dir: &Path) -> UiConfig {
        UiConfig {
            enabled: true,
            mode,
            static_dir: static_dir.to_path_buf(),
            dev_server_url: "http://localhost:3000".into(),
        }
    }

    fn build_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>app</html>").unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/app.js"), "console.log(1)").unwrap();
        dir
    }

    fn body(resp: &ServeResponse) -> &str {
        std::str::from_utf8(&resp.body).unwrap()
    }

    #[test]
    fn dev_root_redirects_to_base() {
        let backend = SpaBackend::new(&ui_config(UiMode::Development, Path::new("build")));
        let resp = backend.serve("/").unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(
            body(&resp),
            r#"<script>window.location.href = "http://localhost:3000"</script>"#
        );
    }

    #[test]
    fn dev_path_redirects_to_same_path() {
        let backend = SpaBackend::new(&ui_config(UiMode::Development, Path::new("build")));
        let resp = backend.serve("/chat/history").unwrap();
        assert!(body(&resp).contains(r#""http://localhost:3000/chat/history""#));
    }

    #[test]
    fn dev_shim_cannot_break_out_of_script() {
        let backend = SpaBackend::new(&ui_config(UiMode::Development, Path::new("build")));
        let resp = backend.serve("/x\"</script><script>alert(1)").unwrap();
        let html = body(&resp);
        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.contains("\\\""));
    }

    #[test]
    fn prod_serves_existing_file_with_mime() {
        let dir = build_dir();
        let backend = SpaBackend::new(&ui_config(UiMode::Production, dir.path()));
        let resp = backend.serve("/assets/app.js").unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.content_type, "application/javascript; charset=utf-8");
        assert_eq!(body(&resp), "console.log(1)");
    }

    #[test]
    fn prod_root_and_unknown_paths_get_index() {
        let dir = build_dir();
        let backend = SpaBackend::new(&ui_config(UiMode::Production, dir.path()));
        for path in ["/", "/settings", "/deep/client/route"] {
            let resp = backend.serve(path).unwrap();
            assert_eq!(resp.status, 200, "{path}");
            assert_eq!(body(&resp), "<html>app</html>", "{path}");
        }
    }

    #[test]
    fn prod_rejects_traversal() {
        let dir = build_dir();
        let backend = SpaBackend::new(&ui_config(UiMode::Production, dir.path()));
        assert_eq!(backend.serve("/../secret").unwrap().status, 400);
    }

    #[test]
    fn prod_without_index_is_404() {
        let dir = TempDir::new().unwrap();
        let backend = SpaBackend::new(&ui_config(UiMode::Production, dir.path()));
        assert_eq!(backend.serve("/anything").unwrap().status, 404);
    }

    #[test]
    fn missing_build_dir_serves_placeholder_for_root_only() {
        let backend = SpaBackend::new(&ui_config(UiMode::Production, Path::new("/nonexistent/build")));
        let resp = backend.serve("/").unwrap();
        assert_eq!(resp.status, 200);
        assert!(body(&resp).contains("Frontend not built yet"));
        assert!(backend.serve("/app.js").is_none());
    }

    #[test]
    fn mime_fallback_is_octet_stream() {
        assert_eq!(mime_from_extension(Path::new("x.bin")), "application/octet-stream");
        assert_eq!(mime_from_extension(Path::new("x.css")), "text/css; charset=utf-8");
    }
}
