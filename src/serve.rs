//! HTTP server for the local web UI
//!
//! `hrbotics serve` → starts server, opens browser, shows the last results.
//! JSON endpoints under `/api` answer with `{ok, data, error}` envelopes.

use crate::app::App;
use crate::auth::Authenticator;
use crate::error::{Error, Result};
use crate::mode::{self, InterviewMode};
use crate::report::{html, ReportFormat};
use crate::resume;
use serde::{Deserialize, Serialize};
use std::io::{self, Read};
use std::path::PathBuf;
use tiny_http::{Header, Method, Request, Response, Server};

const MAX_BODY: u64 = 1 << 20;

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }
}

impl ApiResponse<()> {
    fn failure(message: String) -> Self {
        Self { ok: false, data: None, error: Some(message) }
    }
}

#[derive(Deserialize, Debug, Default)]
struct ModeQuery {
    #[serde(default)]
    mode: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct FormatQuery {
    #[serde(default)]
    format: Option<String>,
}

#[derive(Deserialize, Debug)]
struct InterviewParams {
    video: PathBuf,
    #[serde(default)]
    mode: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ResumeParams {
    filename: String,
    #[serde(default)]
    mime: Option<String>,
    /// Also export a report in this format
    #[serde(default)]
    format: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Credentials {
    email: String,
    password: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Serialize)]
struct Question {
    mode: InterviewMode,
    mode_name: &'static str,
    question: &'static str,
}

#[derive(Serialize)]
struct Exported {
    path: PathBuf,
}

#[derive(Serialize)]
struct ResumeResult {
    #[serde(flatten)]
    analysis: resume::ResumeAnalysis,
    report: Option<PathBuf>,
}

/// Start server, open browser, serve UI
pub fn start(port: u16, app: &App, open_browser: bool) -> io::Result<()> {
    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr).map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let url = format!("http://localhost:{}", port);

    eprintln!("\n\x1b[1;32m🎤 HRbotics\x1b[0m");
    eprintln!("   {}", url);
    eprintln!("   Database: {}\n", app.settings().db_path.display());

    if open_browser {
        if let Err(e) = open::that(&url) {
            log::warn!("could not open browser: {}", e);
        }
    }

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, app) {
            log::error!("request failed: {}", e);
        }
    }

    Ok(())
}

fn header(name: &str, value: &str) -> io::Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, format!("bad header {}", name)))
}

fn respond_html(request: Request, body: Vec<u8>) -> io::Result<()> {
    let response = Response::from_data(body).with_header(header("Content-Type", "text/html; charset=utf-8")?);
    request.respond(response)
}

fn respond_json<T: Serialize>(request: Request, status: u16, body: &T) -> io::Result<()> {
    let json = serde_json::to_string(body)?;
    let response = Response::from_string(json)
        .with_status_code(status)
        .with_header(header("Content-Type", "application/json")?);
    request.respond(response)
}

/// Send `data` in a success envelope, or the error in a failure envelope
fn respond_result<T: Serialize>(request: Request, result: Result<T>) -> io::Result<()> {
    match result {
        Ok(data) => respond_json(request, 200, &ApiResponse::success(data)),
        Err(e) => {
            let status = status_for(&e);
            if status >= 500 {
                log::error!("{}", e);
            } else {
                log::debug!("rejected request: {}", e);
            }
            respond_json(request, status, &ApiResponse::failure(e.to_string()))
        }
    }
}

fn status_for(e: &Error) -> u16 {
    match e {
        Error::Export(crate::report::ExportError::SurfaceNotFound) => 404,
        Error::Auth(crate::auth::AuthError::UnknownUser(_) | crate::auth::AuthError::WrongPassword) => 401,
        Error::Json(_) => 400,
        e if e.is_user_error() => 400,
        _ => 500,
    }
}

fn read_json<T: serde::de::DeserializeOwned>(request: &mut Request) -> Result<T> {
    let mut body = String::new();
    Read::take(request.as_reader(), MAX_BODY).read_to_string(&mut body)?;
    Ok(serde_json::from_str(&body)?)
}

fn query<T: serde::de::DeserializeOwned + Default>(url: &str) -> T {
    url.split('?')
        .nth(1)
        .and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default()
}

fn parse_mode(id: Option<&str>) -> Result<InterviewMode> {
    match id {
        Some(id) if !id.trim().is_empty() => Ok(id.parse()?),
        _ => Ok(InterviewMode::default()),
    }
}

fn handle_request(mut request: Request, app: &App) -> io::Result<()> {
    let url = request.url().to_string();
    let path = url.split('?').next().unwrap_or("/").to_string();
    let method = request.method().clone();
    log::debug!("{} {}", method, url);

    match (&method, path.as_str()) {
        // Results page
        (&Method::Get, "/") => {
            let mut body = Vec::new();
            match app.report_surface() {
                Ok(Some(surface)) => html::write(&mut body, &surface)?,
                Ok(None) => html::write_empty(&mut body)?,
                Err(e) => {
                    log::warn!("could not load results: {}", e);
                    html::write_empty(&mut body)?
                }
            }
            respond_html(request, body)
        }

        (&Method::Get, "/api/modes") => respond_json(request, 200, &ApiResponse::success(mode::catalog())),

        (&Method::Get, "/api/question") => {
            let q: ModeQuery = query(&url);
            let result = parse_mode(q.mode.as_deref()).map(|mode| Question {
                mode,
                mode_name: mode.name(),
                question: mode.random_question(),
            });
            respond_result(request, result)
        }

        (&Method::Post, "/api/interview") => {
            let result = read_json::<InterviewParams>(&mut request).and_then(|params| {
                let mode = parse_mode(params.mode.as_deref())?;
                eprintln!("→ {} ({})", params.video.display(), mode.name());
                app.analyze_video(&params.video, mode)
            });
            respond_result(request, result)
        }

        (&Method::Get, "/api/results") => respond_result(request, app.last_results()),

        (&Method::Post, "/api/report") => {
            let q: FormatQuery = query(&url);
            let result = q
                .format
                .as_deref()
                .map(str::parse::<ReportFormat>)
                .transpose()
                .map_err(Error::from)
                .and_then(|format| app.export_report(format.unwrap_or_default()))
                .map(|path| Exported { path });
            respond_result(request, result)
        }

        (&Method::Get, "/api/practice") => respond_result(request, app.practice()),

        (&Method::Post, "/api/resume") => {
            let result = read_json::<ResumeParams>(&mut request).and_then(|params| {
                let analysis = resume::analyze(&params.filename, params.mime.as_deref())?;
                let report = match params.format.as_deref() {
                    Some(f) => Some(app.export_resume(&analysis, f.parse()?)?),
                    None => None,
                };
                Ok(ResumeResult { analysis, report })
            });
            respond_result(request, result)
        }

        (&Method::Get, "/api/auth/me") => {
            respond_result(request, app.auth().current_user().map_err(Error::from))
        }

        (&Method::Post, "/api/auth/sign-in") => {
            let result = read_json::<Credentials>(&mut request)
                .and_then(|c| Ok(app.auth().sign_in(&c.email, &c.password)?));
            respond_result(request, result)
        }

        (&Method::Post, "/api/auth/sign-up") => {
            let result = read_json::<Credentials>(&mut request)
                .and_then(|c| Ok(app.auth().sign_up(&c.email, &c.password, c.name.as_deref())?));
            respond_result(request, result)
        }

        (&Method::Post, "/api/auth/sign-out") => {
            respond_result(request, app.auth().sign_out().map_err(Error::from))
        }

        // 404
        _ => respond_json(
            request,
            404,
            &ApiResponse::failure(format!("no route for {} {}", method, path)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthError;
    use crate::report::ExportError;
    use crate::upload::ValidationError;

    // ==========================================================================
    // ENVELOPES
    // ==========================================================================

    #[test]
    fn test_success_envelope() {
        let json = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert!(json["error"].is_null());
    }

    #[test]
    fn test_failure_envelope() {
        let json = serde_json::to_value(ApiResponse::failure("report surface not found".into())).unwrap();
        assert_eq!(json["ok"], false);
        assert!(json["data"].is_null());
        assert_eq!(json["error"], "report surface not found");
    }

    // ==========================================================================
    // REQUEST PARSING
    // ==========================================================================

    #[test]
    fn test_query_parsing() {
        let q: ModeQuery = query("/api/question?mode=technical");
        assert_eq!(q.mode.as_deref(), Some("technical"));

        let q: FormatQuery = query("/api/report");
        assert!(q.format.is_none());
    }

    #[test]
    fn test_mode_parsing_at_boundary() {
        assert_eq!(parse_mode(None).unwrap(), InterviewMode::General);
        assert_eq!(parse_mode(Some("HR")).unwrap(), InterviewMode::Hr);
        assert!(matches!(parse_mode(Some("sales")), Err(Error::Mode(_))));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(status_for(&Error::Export(ExportError::SurfaceNotFound)), 404);
        assert_eq!(status_for(&Error::Auth(AuthError::WrongPassword)), 401);
        assert_eq!(status_for(&Error::Invalid(ValidationError::NoVideo)), 400);
        assert_eq!(status_for(&Error::Io(io::Error::new(io::ErrorKind::Other, "disk"))), 500);
    }
}
