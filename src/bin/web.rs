//! Single binary web server: JSON API over the tournament manager.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, DATA_DIR,
//! STORE_NAMESPACE, BACKUP_INTERVAL_SECS (0 disables backups), RNG_SEED.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use fifa_tournament_web::{
    assess, JsonFileRepository, MatchId, ParticipantId, ServerConfig, TournamentError,
    TournamentFormat, TournamentId, TournamentManager, TournamentResult,
};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Single writer: every request goes through this lock.
type AppState = Data<RwLock<TournamentManager<JsonFileRepository>>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct NameBody {
    name: String,
}

#[derive(Deserialize)]
struct AvatarBody {
    avatar: Option<String>,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    format: TournamentFormat,
    participant_ids: Vec<ParticipantId>,
}

#[derive(Deserialize)]
struct ScoreBody {
    score_a: u32,
    score_b: u32,
}

#[derive(Deserialize)]
struct ActiveBody {
    id: Option<TournamentId>,
}

/// Path segment: entity id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct IdPath {
    id: uuid::Uuid,
}

/// 400 for bad input or state, 404 for unknown ids, 500 for storage failures.
fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::Store(_) => HttpResponse::InternalServerError().json(body),
        e if e.is_not_found() => HttpResponse::NotFound().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn respond<T: Serialize>(result: TournamentResult<T>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(&e),
    }
}

/// Run `op` against the manager under the write lock.
fn with_manager<T: Serialize>(
    state: &AppState,
    op: impl FnOnce(&mut TournamentManager<JsonFileRepository>) -> TournamentResult<T>,
) -> HttpResponse {
    match state.write() {
        Ok(mut manager) => respond(op(&mut manager)),
        Err(_) => HttpResponse::InternalServerError().body("lock error"),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "fifa-tournament-web",
    })
}

#[get("/api/participants")]
async fn api_roster(state: AppState) -> HttpResponse {
    with_manager(&state, |m| m.roster())
}

#[post("/api/participants")]
async fn api_add_participant(state: AppState, body: Json<NameBody>) -> HttpResponse {
    with_manager(&state, |m| m.add_participant(&body.name))
}

#[put("/api/participants/{id}")]
async fn api_rename_participant(state: AppState, path: Path<IdPath>, body: Json<NameBody>) -> HttpResponse {
    with_manager(&state, |m| m.rename_participant(path.id, &body.name))
}

#[put("/api/participants/{id}/avatar")]
async fn api_set_avatar(state: AppState, path: Path<IdPath>, body: Json<AvatarBody>) -> HttpResponse {
    let avatar = body.into_inner().avatar;
    with_manager(&state, |m| m.set_avatar(path.id, avatar))
}

#[delete("/api/participants/{id}")]
async fn api_delete_participant(state: AppState, path: Path<IdPath>) -> HttpResponse {
    with_manager(&state, |m| m.delete_participant(path.id))
}

/// Load the default names when the roster is empty; returns the participants added.
#[post("/api/participants/defaults")]
async fn api_default_roster(state: AppState) -> HttpResponse {
    with_manager(&state, |m| m.initialize_default_roster())
}

/// CSV body with a `name,avatar` header; returns the participants added.
#[post("/api/participants/import")]
async fn api_import_roster(state: AppState, body: String) -> HttpResponse {
    with_manager(&state, |m| m.import_roster_csv(body.as_bytes()))
}

#[get("/api/participants/export")]
async fn api_export_roster(state: AppState) -> HttpResponse {
    let mut manager = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match manager.export_roster_csv() {
        Ok(csv) => HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(csv),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments")]
async fn api_tournaments(state: AppState) -> HttpResponse {
    with_manager(&state, |m| m.tournaments())
}

/// Create a tournament from roster ids; it becomes the active tournament.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    with_manager(&state, |m| {
        m.create_tournament(&body.name, body.format, &body.participant_ids)
    })
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<IdPath>) -> HttpResponse {
    with_manager(&state, |m| m.tournament(path.id))
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<IdPath>) -> HttpResponse {
    with_manager(&state, |m| m.delete_tournament(path.id))
}

/// Generate matches (Setup -> InProgress).
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<IdPath>) -> HttpResponse {
    with_manager(&state, |m| m.start_tournament(path.id))
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<IdPath>) -> HttpResponse {
    with_manager(&state, |m| m.standings(path.id))
}

/// Progress, completion state and the display stage of every match.
#[get("/api/tournaments/{id}/summary")]
async fn api_summary(state: AppState, path: Path<IdPath>) -> HttpResponse {
    with_manager(&state, |m| {
        let t = m.tournament(path.id)?;
        let stages: Vec<_> = t
            .matches
            .iter()
            .map(|g| serde_json::json!({ "match_id": g.id, "stage": t.stage_of(g).to_string() }))
            .collect();
        Ok(serde_json::json!({
            "status": t.status,
            "progress": t.progress(),
            "percentage": t.progress().percentage(),
            "completion": assess(&t),
            "winner": t.winner,
            "stages": stages,
        }))
    })
}

#[post("/api/matches/{id}/result")]
async fn api_record_result(state: AppState, path: Path<IdPath>, body: Json<ScoreBody>) -> HttpResponse {
    let match_id: MatchId = path.id;
    with_manager(&state, |m| m.record_result(match_id, body.score_a, body.score_b))
}

#[put("/api/matches/{id}/result")]
async fn api_edit_result(state: AppState, path: Path<IdPath>, body: Json<ScoreBody>) -> HttpResponse {
    let match_id: MatchId = path.id;
    with_manager(&state, |m| m.edit_result(match_id, body.score_a, body.score_b))
}

#[get("/api/active")]
async fn api_active(state: AppState) -> HttpResponse {
    with_manager(&state, |m| m.active_tournament())
}

#[put("/api/active")]
async fn api_set_active(state: AppState, body: Json<ActiveBody>) -> HttpResponse {
    with_manager(&state, |m| m.set_active_tournament(body.id))
}

/// The last error message, kept until dismissed.
#[get("/api/error")]
async fn api_last_error(state: AppState) -> HttpResponse {
    match state.read() {
        Ok(manager) => HttpResponse::Ok().json(serde_json::json!({ "error": manager.last_error() })),
        Err(_) => HttpResponse::InternalServerError().body("lock error"),
    }
}

#[delete("/api/error")]
async fn api_clear_error(state: AppState) -> HttpResponse {
    match state.write() {
        Ok(mut manager) => {
            manager.clear_error();
            HttpResponse::NoContent().finish()
        }
        Err(_) => HttpResponse::InternalServerError().body("lock error"),
    }
}

#[get("/api/export")]
async fn api_export(state: AppState) -> HttpResponse {
    let mut manager = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match manager.export_data() {
        Ok(json) => HttpResponse::Ok().content_type("application/json").body(json),
        Err(e) => error_response(&e),
    }
}

/// Replace all data with a previous export.
#[post("/api/import")]
async fn api_import(state: AppState, body: String) -> HttpResponse {
    with_manager(&state, |m| m.import_data(&body))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let store = JsonFileRepository::open(&config.data_dir, &config.namespace)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    log::info!("Using store {}", store.path().display());

    let manager = match config.rng_seed {
        Some(seed) => TournamentManager::seeded(store, seed),
        None => TournamentManager::new(store),
    };
    let state = Data::new(RwLock::new(manager));

    // Background task: periodically write a pretty-printed backup next to the store
    if let Some(every) = config.backup_interval {
        let state_backup = state.clone();
        let backup_path = config.data_dir.join(format!("{}.backup.json", config.namespace));
        actix_web::rt::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.tick().await;
            loop {
                interval.tick().await;
                let json = match state_backup.write() {
                    Ok(mut manager) => manager.export_data(),
                    Err(_) => continue,
                };
                match json {
                    Ok(json) => match tokio::fs::write(&backup_path, json).await {
                        Ok(()) => log::info!("Wrote backup to {}", backup_path.display()),
                        Err(e) => log::warn!("Backup failed: {}", e),
                    },
                    Err(e) => log::warn!("Backup export failed: {}", e),
                }
            }
        });
    }

    let (host, port) = config.bind_addr();
    log::info!("Starting server at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_roster)
            .service(api_default_roster)
            .service(api_import_roster)
            .service(api_export_roster)
            .service(api_add_participant)
            .service(api_rename_participant)
            .service(api_set_avatar)
            .service(api_delete_participant)
            .service(api_tournaments)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_start_tournament)
            .service(api_standings)
            .service(api_summary)
            .service(api_record_result)
            .service(api_edit_result)
            .service(api_active)
            .service(api_set_active)
            .service(api_last_error)
            .service(api_clear_error)
            .service(api_export)
            .service(api_import)
    })
    .bind((host, port))?
    .run()
    .await
}
