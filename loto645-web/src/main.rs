use std::io::Read;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use loto645_core::filters::{FilterSettings, Strategy};
use loto645_core::generator::generate_grids;
use loto645_core::grid::{Grid, validate_numbers};
use loto645_core::history::{RunEntry, RunHistory};
use loto645_core::rank::{determine_rank, match_count};
use loto645_db::db::{db_path, migrate, open_db};
use loto645_db::rusqlite::Connection;
use loto645_db::source::{DrawSource, FallbackSource};

fn main() {
    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "0.0.0.0:7878".to_string());
    let server = Server::http(&addr).expect("démarrage du serveur");
    println!("Serveur loto645 sur http://{addr}");
    let state = Arc::new(Mutex::new(AppState::new()));
    for request in server.incoming_requests() {
        let state = state.clone();
        if let Err(err) = handle_request(request, state) {
            eprintln!("erreur de requête : {err}");
        }
    }
}

struct AppState {
    strategy: Strategy,
    history: RunHistory,
    last_check: Option<UiCheck>,
    conn: Connection,
}

impl AppState {
    fn new() -> Self {
        let conn = open_db(&db_path()).expect("ouverture de la base");
        migrate(&conn).expect("migration de la base");
        Self {
            strategy: Strategy::Equilibre,
            history: RunHistory::default(),
            last_check: None,
            conn,
        }
    }
}

#[derive(Serialize)]
struct ApiResponse {
    ok: bool,
    error: Option<String>,
    state: UiState,
}

#[derive(Serialize)]
struct UiState {
    mode: String,
    settings: FilterSettings,
    history: Vec<RunEntry>,
    check: Option<UiCheck>,
}

#[derive(Serialize, Clone)]
struct UiCheck {
    draw_no: u32,
    date: String,
    winning: Grid,
    bonus: u8,
    played: Grid,
    matches: u8,
    rank: String,
    winning_rank: bool,
}

#[derive(Deserialize)]
struct ActionRequest {
    action: String,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    numbers: Vec<u8>,
    #[serde(default)]
    draw: Option<u32>,
}

fn handle_request(
    mut request: tiny_http::Request,
    state: Arc<Mutex<AppState>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = request.url().to_string();
    match (request.method(), url.as_str()) {
        (&Method::Get, "/") => {
            respond_with_file(request, web_path("index.html"), "text/html; charset=utf-8")?;
        }
        (&Method::Get, "/app.js") => {
            respond_with_file(request, web_path("app.js"), "application/javascript")?;
        }
        (&Method::Get, "/styles.css") => {
            respond_with_file(request, web_path("styles.css"), "text/css; charset=utf-8")?;
        }
        (&Method::Get, "/api/state") => {
            let guard = state.lock().unwrap();
            let response = build_response(&guard, None);
            respond_json(request, response)?;
        }
        (&Method::Post, "/api/action") => {
            let mut body = String::new();
            request.as_reader().read_to_string(&mut body)?;
            let action: ActionRequest = serde_json::from_str(&body)?;
            let mut guard = state.lock().unwrap();
            let err = apply_action(&mut guard, action);
            let response = build_response(&guard, err);
            respond_json(request, response)?;
        }
        _ => {
            let response = Response::empty(StatusCode(404));
            request.respond(response)?;
        }
    }
    Ok(())
}

fn web_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("web")
        .join(file)
}

fn respond_with_file(
    request: tiny_http::Request,
    path: PathBuf,
    content_type: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = std::fs::File::open(path)?;
    let mut content = Vec::new();
    file.read_to_end(&mut content)?;
    let header = Header::from_bytes(&b"Content-Type"[..], content_type)
        .map_err(|_| "en-tête Content-Type invalide".to_string())?;
    let response = Response::from_data(content).with_header(header);
    request.respond(response)?;
    Ok(())
}

fn respond_json(
    request: tiny_http::Request,
    response: ApiResponse,
) -> Result<(), Box<dyn std::error::Error>> {
    let body = serde_json::to_vec_pretty(&response)?;
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|_| "en-tête Content-Type invalide".to_string())?;
    request.respond(Response::from_data(body).with_header(header))?;
    Ok(())
}

fn build_response(state: &AppState, err: Option<String>) -> ApiResponse {
    ApiResponse {
        ok: err.is_none(),
        error: err,
        state: UiState {
            mode: state.strategy.label().to_string(),
            settings: state.strategy.settings(),
            history: state.history.entries().to_vec(),
            check: state.last_check.clone(),
        },
    }
}

fn apply_action(state: &mut AppState, req: ActionRequest) -> Option<String> {
    match req.action.as_str() {
        "generate" => {
            let count = req.count.unwrap_or(5);
            if count == 0 || count > 20 {
                return Some("nombre de grilles hors limites (1-20)".to_string());
            }
            let settings = state.strategy.settings();
            match generate_grids(&settings, count, None) {
                Ok(grids) => {
                    state.history.record(state.strategy.label(), grids);
                    None
                }
                Err(err) => Some(format!("{err:#}")),
            }
        }
        "set_mode" => {
            let Some(mode) = req.mode.as_deref() else {
                return Some("stratégie manquante".to_string());
            };
            match mode.parse::<Strategy>() {
                Ok(strategy) => {
                    state.strategy = strategy;
                    None
                }
                Err(err) => Some(format!("{err:#}")),
            }
        }
        "check" => {
            if req.numbers.len() != 6 {
                return Some(format!("attendu 6 numéros, reçu {}", req.numbers.len()));
            }
            let mut played: Grid = [
                req.numbers[0],
                req.numbers[1],
                req.numbers[2],
                req.numbers[3],
                req.numbers[4],
                req.numbers[5],
            ];
            played.sort();
            if let Err(err) = validate_numbers(&played) {
                return Some(format!("{err:#}"));
            }
            let Some(draw_no) = req.draw else {
                return Some("numéro de tirage manquant".to_string());
            };
            let draw = match FallbackSource::new(&state.conn).fetch(draw_no) {
                Ok(draw) => draw,
                Err(err) => return Some(format!("{err:#}")),
            };
            let rank = determine_rank(&played, &draw.numbers, draw.bonus);
            state.last_check = Some(UiCheck {
                draw_no: draw.draw_no,
                date: draw.date.clone(),
                winning: draw.numbers,
                bonus: draw.bonus,
                played,
                matches: match_count(&played, &draw.numbers),
                rank: rank.to_string(),
                winning_rank: rank.is_winning(),
            });
            None
        }
        _ => Some("action inconnue".to_string()),
    }
}
