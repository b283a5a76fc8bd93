//! Single binary web server: tournament API via REST, tournaments kept in memory.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, SRR_* engine knobs.

use actix_web::{
    delete, get, post, put,
    web::{Bytes, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use carrom_tournament::logic::{
    delete_groups, delete_round, delete_seeding, generate_groups, generate_matchups,
    generate_seeding, live_snapshot, override_player_seed, parse_players_csv, parse_ranking_csv,
    round_points, rounds, seed_demo_round_robin, standings, standings_by_round,
    submit_confirmation,
};
use carrom_tournament::models::{
    ConfirmationRequest, ErrorKind, MatchId, Player, PlayerId, RankingList, Tournament,
    TournamentError, TournamentId, TournamentSettings,
};
use carrom_tournament::{EngineConfig, ServerConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Instant;

/// Stored tournament plus the time it was last read or changed (idle ones are purged).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    settings: Option<TournamentSettings>,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Deserialize)]
struct RankingQuery {
    year: Option<i32>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct SeedOverrideBody {
    seed: u32,
}

#[derive(Deserialize)]
struct ConfirmBody {
    player_id: PlayerId,
    #[serde(flatten)]
    request: ConfirmationRequest,
}

#[derive(Deserialize)]
struct StandingsQuery {
    round: Option<u32>,
}

#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct TournamentPlayerPath {
    id: TournamentId,
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct GroupPath {
    id: TournamentId,
    group: u32,
}

#[derive(Deserialize)]
struct RoundPath {
    id: TournamentId,
    group: u32,
    round: u32,
}

#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    match_id: MatchId,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e.kind() {
        ErrorKind::Validation => HttpResponse::BadRequest().json(body),
        ErrorKind::Conflict => HttpResponse::Conflict().json(body),
        ErrorKind::Exhaustion => HttpResponse::UnprocessableEntity().json(body),
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
        ErrorKind::Forbidden => HttpResponse::Forbidden().json(body),
    }
}

fn no_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

/// Run `f` against one tournament under the write lock and respond with the updated tournament.
/// The write lock is held for the whole step.
fn update<F>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> Result<(), TournamentError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    entry.last_activity = Instant::now();
    match f(&mut entry.tournament) {
        Ok(()) => HttpResponse::Ok().json(&entry.tournament),
        Err(e) => error_response(&e),
    }
}

/// Build a read-only view of one tournament. Touching it refreshes last_activity.
fn view<F, T>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&Tournament) -> T,
    T: Serialize,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(f(&entry.tournament))
        }
        None => no_tournament(),
    }
}

fn csv_body(body: &Bytes) -> Result<&[u8], TournamentError> {
    if body.is_empty() {
        return Err(TournamentError::InvalidCsv("empty upload".to_string()));
    }
    Ok(body.as_ref())
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "carrom-tournament",
    })
}

/// Create a tournament with the given or default settings; clients address it by the returned id.
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    engine: Data<EngineConfig>,
    body: Option<Json<CreateTournamentBody>>,
) -> HttpResponse {
    let (name, settings) = match body {
        Some(b) => {
            let b = b.into_inner();
            (b.name, b.settings)
        }
        None => (String::new(), None),
    };
    let settings = settings.unwrap_or_else(|| TournamentSettings::from(engine.get_ref()));
    let tournament = Tournament::new(name, settings);
    let id = tournament.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let response = HttpResponse::Ok().json(&tournament);
    g.insert(
        id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    log::info!("Created tournament {}", id);
    response
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    view(&state, path.id, Tournament::clone)
}

/// Replace tournament settings (locked once groups exist).
#[put("/api/tournaments/{id}/settings")]
async fn api_set_settings(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<TournamentSettings>,
) -> HttpResponse {
    update(&state, path.id, |t| t.set_settings(body.into_inner()))
}

#[post("/api/tournaments/{id}/players")]
async fn api_add_player(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddPlayerBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let player = Player {
        id: 0,
        name: body.name,
        email: body.email,
        state: body.state,
        country: body.country,
    };
    update(&state, path.id, |t| t.add_player(player).map(|_| ()))
}

/// Upload players as CSV (`name,email,state,country`). All-or-nothing.
#[post("/api/tournaments/{id}/players/upload")]
async fn api_upload_players(
    state: AppState,
    path: Path<TournamentPath>,
    body: Bytes,
) -> HttpResponse {
    update(&state, path.id, |t| {
        let players = parse_players_csv(csv_body(&body)?)?;
        let mut staged = t.clone();
        for p in players {
            staged.add_player(p)?;
        }
        *t = staged;
        Ok(())
    })
}

#[delete("/api/tournaments/{id}/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<TournamentPlayerPath>) -> HttpResponse {
    update(&state, path.id, |t| t.remove_player(path.player_id))
}

/// Upload the national ranking list as CSV (`rank,name,email,country`).
#[post("/api/tournaments/{id}/ranking/upload")]
async fn api_upload_ranking(
    state: AppState,
    path: Path<TournamentPath>,
    query: Query<RankingQuery>,
    body: Bytes,
) -> HttpResponse {
    let query = query.into_inner();
    update(&state, path.id, |t| {
        if t.has_groups() {
            return Err(TournamentError::StepLocked("Ranking list"));
        }
        let rows = parse_ranking_csv(csv_body(&body)?)?;
        t.ranking = Some(RankingList {
            year: query.year,
            description: query.description,
            rows,
        });
        Ok(())
    })
}

#[post("/api/tournaments/{id}/seeding/generate")]
async fn api_generate_seeding(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update(&state, path.id, |t| generate_seeding(t, None))
}

#[delete("/api/tournaments/{id}/seeding")]
async fn api_delete_seeding(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update(&state, path.id, delete_seeding)
}

#[put("/api/tournaments/{id}/seeding/{player_id}")]
async fn api_override_seed(
    state: AppState,
    path: Path<TournamentPlayerPath>,
    body: Json<SeedOverrideBody>,
) -> HttpResponse {
    update(&state, path.id, |t| {
        override_player_seed(t, path.player_id, body.seed)
    })
}

#[post("/api/tournaments/{id}/groups/generate")]
async fn api_generate_groups(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update(&state, path.id, generate_groups)
}

#[delete("/api/tournaments/{id}/groups")]
async fn api_delete_groups(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update(&state, path.id, delete_groups)
}

/// Pair the next round of one group (round one by seed, later rounds Swiss).
#[post("/api/tournaments/{id}/groups/{group}/matchups/generate")]
async fn api_generate_matchups(state: AppState, path: Path<GroupPath>) -> HttpResponse {
    update(&state, path.id, |t| {
        generate_matchups(t, path.group, &mut rand::thread_rng()).map(|_| ())
    })
}

#[delete("/api/tournaments/{id}/groups/{group}/rounds/{round}")]
async fn api_delete_round(state: AppState, path: Path<RoundPath>) -> HttpResponse {
    update(&state, path.id, |t| delete_round(t, path.group, path.round))
}

/// Submit one player's confirmation; responds with the consensus decision.
#[post("/api/tournaments/{id}/matches/{match_id}/confirm")]
async fn api_confirm_match(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<ConfirmBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    entry.last_activity = Instant::now();
    match submit_confirmation(
        &mut entry.tournament,
        path.match_id,
        body.player_id,
        &body.request,
        chrono::Utc::now(),
    ) {
        Ok(decision) => HttpResponse::Ok().json(decision),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/rounds")]
async fn api_rounds(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    view(&state, path.id, |t| rounds(&t.matches, &t.confirmations))
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(
    state: AppState,
    path: Path<TournamentPath>,
    query: Query<StandingsQuery>,
) -> HttpResponse {
    view(&state, path.id, |t| standings(&t.players, &t.matches, query.round))
}

#[get("/api/tournaments/{id}/standings/by-round")]
async fn api_standings_by_round(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    view(&state, path.id, |t| standings_by_round(&t.players, &t.matches))
}

#[get("/api/tournaments/{id}/round-points")]
async fn api_round_points(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    view(&state, path.id, |t| round_points(&t.players, &t.matches))
}

#[get("/api/tournaments/{id}/live")]
async fn api_live(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    view(&state, path.id, |t| {
        live_snapshot(&t.players, &t.matches, &t.confirmations, chrono::Utc::now())
    })
}

/// Bootstrap a full round robin over the roster (demo data; no matches may exist).
#[post("/api/tournaments/{id}/demo/seed")]
async fn api_demo_seed(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update(&state, path.id, |t| seed_demo_round_robin(t).map(|_| ()))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server = ServerConfig::from_env();
    let engine = Data::new(EngineConfig::from_env());
    log::info!("Starting server at http://{}:{}", server.host, server.port);
    log::debug!("Engine configuration: {:?}", engine.get_ref());

    let state: AppState = Data::new(RwLock::new(HashMap::new()));

    // Background task: periodically remove tournaments that have been idle too long
    let state_cleanup = state.clone();
    let timeout = server.inactivity_timeout;
    let every = server.cleanup_interval;
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < timeout);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(engine.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_set_settings)
            .service(api_add_player)
            .service(api_upload_players)
            .service(api_remove_player)
            .service(api_upload_ranking)
            .service(api_generate_seeding)
            .service(api_delete_seeding)
            .service(api_override_seed)
            .service(api_generate_groups)
            .service(api_delete_groups)
            .service(api_generate_matchups)
            .service(api_delete_round)
            .service(api_confirm_match)
            .service(api_rounds)
            .service(api_standings)
            .service(api_standings_by_round)
            .service(api_round_points)
            .service(api_live)
            .service(api_demo_seed)
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await
}
