use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{error, info};

use crate::config::{Settings, MAX_MEETINGS};
use crate::error::ScheduleError;
use crate::parser::{roster_from_document, RosterDocument};
use crate::schedule::{plan_meetings, PlayerDirectory, RandomTieBreak, ScriptedDecisions};

// Last generated plan is kept in memory only
pub struct AppState {
    pub settings: Settings,
    pub last_schedule: Mutex<Option<ScheduleResponse>>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            last_schedule: Mutex::new(None),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub players: RosterDocument,
    pub meetings: Option<usize>,
    pub seed: Option<u64>,
    /// Answers for choosers with several options, in the order they are asked
    #[serde(default)]
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub choices: Vec<String>,
    pub num_cities: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub success: bool,
    pub generated_at: String,
    pub directory: Vec<DirectoryEntry>,
    pub schedule: Vec<Vec<Vec<String>>>,
}

fn directory_entries(directory: &PlayerDirectory) -> Vec<DirectoryEntry> {
    directory
        .players()
        .iter()
        .map(|p| DirectoryEntry {
            name: p.name.clone(),
            choices: p.choices.clone(),
            num_cities: p.num_cities,
        })
        .collect()
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({"success": false, "error": message}))
}

// Schedule generation endpoint
async fn create_schedule(
    req: web::Json<ScheduleRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let req = req.into_inner();

    let mut meetings = state.settings.meetings.clone();
    if let Some(count) = req.meetings {
        if count == 0 || count > MAX_MEETINGS {
            return Ok(bad_request(format!("meetings must be between 1 and {}", MAX_MEETINGS)));
        }
        meetings.count = count;
    }

    let inputs = match roster_from_document(req.players) {
        Ok(inputs) => inputs,
        Err(e) => return Ok(bad_request(e.to_string())),
    };

    let seed = req.seed.or(state.settings.matching.seed);
    let plan = plan_meetings(
        inputs,
        &state.settings.roster,
        &meetings,
        ScriptedDecisions::new(req.answers),
        RandomTieBreak::from_seed_option(seed),
    );

    match plan {
        Ok(plan) => {
            let response = ScheduleResponse {
                success: true,
                generated_at: Utc::now().to_rfc3339(),
                directory: directory_entries(&plan.narrowed),
                schedule: plan.schedule.as_name_lists(),
            };
            info!(slots = response.schedule.len(), "Schedule generated");
            *state.last_schedule.lock().unwrap_or_else(|e| e.into_inner()) = Some(response.clone());
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e @ ScheduleError::ScheduleIncomplete { .. }) => {
            error!(error = %e, "Scheduling produced an invalid slot");
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({"success": false, "error": e.to_string()})))
        }
        Err(e) => Ok(bad_request(e.to_string())),
    }
}

// Last schedule endpoint
async fn get_schedule(state: web::Data<AppState>) -> Result<HttpResponse> {
    let last = state.last_schedule.lock().unwrap_or_else(|e| e.into_inner());
    match *last {
        Some(ref schedule) => Ok(HttpResponse::Ok().json(schedule)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "Schedule not available"}))),
    }
}

async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({"status": "ok"})))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health))
        .route("/api/schedule", web::post().to(create_schedule))
        .route("/api/schedule", web::get().to(get_schedule));
}

pub async fn start_server(settings: Settings, port: u16) -> std::io::Result<()> {
    let host = settings.server.host.clone();
    let app_state = web::Data::new(AppState::new(settings));

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind((host, port))?
    .run()
    .await
}
