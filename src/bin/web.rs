//! JSON web host for the tournament engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, INACTIVITY_TIMEOUT_HOURS.
//! Engine settings come from ENGINE_SEED, META_* and DEFAULT_MINUTES_PER_ROUND.

use actix_web::{
    delete, get, post,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tournament_pairing_engine::{
    parse_roster, summarize, Competitor, EngineConfig, EntryTier, Format, GameResult, MatchResult,
    RoundPlan, ServerConfig, Template, Tournament, TournamentEngine, TournamentError, TournamentId,
    TournamentOptions,
};
use uuid::Uuid;

/// Per-tournament entry: tournament data, its engine (and RNG), and last activity time.
struct TournamentEntry {
    tournament: Tournament,
    engine: TournamentEngine,
    last_activity: Instant,
}

type Store = RwLock<HashMap<TournamentId, TournamentEntry>>;
type AppState = Data<Store>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CompetitorBody {
    name: String,
    rating: Option<f64>,
    archetype: Option<String>,
    aggression: Option<f64>,
    #[serde(default)]
    invited: bool,
}

impl CompetitorBody {
    fn into_competitor(self) -> Competitor {
        let mut c = Competitor::new(self.name);
        if let Some(r) = self.rating {
            c = c.with_rating(r);
        }
        if let Some(a) = self.archetype {
            c = c.with_archetype(a);
        }
        if let Some(a) = self.aggression {
            c = c.with_playstyle(a);
        }
        if self.invited {
            c = c.invited();
        }
        c
    }
}

/// Settings shared by the JSON and CSV create endpoints. A template fills in
/// anything not given explicitly.
#[derive(Deserialize, Default)]
struct CreateSettings {
    name: String,
    template: Option<Template>,
    format: Option<Format>,
    rounds: Option<RoundPlan>,
    top_cut: Option<u32>,
    minutes_per_round: Option<u32>,
    time_limit_minutes: Option<u32>,
    start_time: Option<DateTime<Utc>>,
    meta_balancing: Option<bool>,
    adaptive_structure: Option<bool>,
    parallel_brackets: Option<bool>,
    entry_tier: Option<EntryTier>,
    location: Option<String>,
    organizer: Option<String>,
}

impl CreateSettings {
    fn into_options(self, competitors: Vec<Competitor>) -> TournamentOptions {
        let mut options = match self.template {
            Some(template) => template.options(self.name),
            None => TournamentOptions::new(self.name, self.format.unwrap_or_default()),
        };
        if let Some(format) = self.format {
            options.format = format;
        }
        if self.rounds.is_some() {
            options.rounds = self.rounds;
        }
        if let Some(cut) = self.top_cut {
            options.top_cut = cut;
        }
        options.minutes_per_round = self.minutes_per_round.or(options.minutes_per_round);
        options.time_limit_minutes = self.time_limit_minutes;
        options.start_time = self.start_time;
        options.meta_balancing = self.meta_balancing;
        options.adaptive_structure = self.adaptive_structure;
        options.parallel_brackets = self.parallel_brackets;
        options.entry_tier = self.entry_tier.unwrap_or_default();
        options.location = self.location;
        options.organizer = self.organizer;
        options.competitors = competitors;
        options
    }
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    #[serde(flatten)]
    settings: CreateSettings,
    #[serde(default)]
    competitors: Vec<CompetitorBody>,
}

#[derive(Deserialize)]
struct RecordResultBody {
    result: MatchResult,
    #[serde(default)]
    games: Vec<GameResult>,
}

#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct TournamentPlayerPath {
    id: TournamentId,
    player_id: Uuid,
}

#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: Uuid,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::MatchNotFound(_) | TournamentError::CompetitorNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn no_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

/// Create the tournament with a fresh engine and store it.
fn insert_new(state: &Store, config: &EngineConfig, options: TournamentOptions) -> HttpResponse {
    let mut engine = TournamentEngine::new(config.clone());
    let tournament = match engine.create_tournament(options) {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let response = HttpResponse::Ok().json(&tournament);
    g.insert(
        tournament.id,
        TournamentEntry {
            tournament,
            engine,
            last_activity: Instant::now(),
        },
    );
    response
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tournament-pairing-engine",
    })
}

/// Create a tournament from JSON (returns it with id; clients use the id for later requests).
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    config: Data<EngineConfig>,
    body: Json<CreateTournamentBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let competitors = body
        .competitors
        .into_iter()
        .map(CompetitorBody::into_competitor)
        .collect();
    insert_new(&state, &config, body.settings.into_options(competitors))
}

/// Create a tournament from a CSV roster body; settings come from the query string.
#[post("/api/tournaments/import")]
async fn api_import_tournament(
    state: AppState,
    config: Data<EngineConfig>,
    query: Query<CreateSettings>,
    body: String,
) -> HttpResponse {
    let competitors = match parse_roster(&body) {
        Ok(c) => c,
        Err(e) => {
            return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
    };
    insert_new(&state, &config, query.into_inner().into_options(competitors))
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.tournament)
        }
        None => no_tournament(),
    }
}

/// Register a competitor (tournament must not be started).
#[post("/api/tournaments/{id}/players")]
async fn api_add_player(state: AppState, path: Path<TournamentPath>, body: Json<CompetitorBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match t.add_competitor(body.into_inner().into_competitor()) {
        Ok(_) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

/// Remove a competitor by id (tournament must not be started).
#[delete("/api/tournaments/{id}/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<TournamentPlayerPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match t.remove_competitor(path.player_id) {
        Ok(_) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

/// Start the tournament: round 1 is paired.
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match entry.engine.start_tournament(t) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

/// Record a match result; returns the updated tournament.
#[post("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_record_result(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<RecordResultBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    entry.last_activity = Instant::now();
    let body = body.into_inner();
    let t = &mut entry.tournament;
    match entry.engine.record_match_result(t, path.match_id, body.result, body.games) {
        Ok(_) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

/// Drop a competitor; a pending match becomes a walkover for their opponent.
#[post("/api/tournaments/{id}/players/{player_id}/drop")]
async fn api_drop_player(state: AppState, path: Path<TournamentPlayerPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match entry.engine.drop_player(t, path.player_id) {
        Ok(_) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(entry.engine.get_standings(&entry.tournament))
        }
        None => no_tournament(),
    }
}

#[get("/api/tournaments/{id}/brackets")]
async fn api_brackets(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(entry.engine.get_brackets(&entry.tournament))
        }
        None => no_tournament(),
    }
}

#[get("/api/tournaments/{id}/analytics")]
async fn api_analytics(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            let threshold = entry.engine.config().meta.underrepresented_threshold;
            HttpResponse::Ok().json(summarize(&entry.tournament, threshold))
        }
        None => no_tournament(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server = ServerConfig::from_env();
    let engine_config = Data::new(EngineConfig::from_env());
    log::info!("Starting server at http://{}:{}", server.host, server.port);

    let state: AppState = Data::new(RwLock::new(HashMap::new()));

    // Every 30 minutes, evict tournaments idle for longer than the inactivity timeout.
    let state_cleanup = state.clone();
    let timeout = server.inactivity_timeout;
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
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
            .app_data(engine_config.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_import_tournament)
            .service(api_get_tournament)
            .service(api_add_player)
            .service(api_remove_player)
            .service(api_start_tournament)
            .service(api_record_result)
            .service(api_drop_player)
            .service(api_standings)
            .service(api_brackets)
            .service(api_analytics)
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await
}
