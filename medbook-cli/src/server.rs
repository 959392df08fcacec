use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use medbook_core::client::BookingClient;
use medbook_core::error::{AdmissionError, StoreError};
use medbook_core::types::{BookingId, PersonRole, RoomName};

use crate::handlers::*;

pub type AppState = Arc<BookingClient>;

pub async fn run(host: &str, port: u16, storage: &str) -> std::io::Result<()> {
    let state: AppState = Arc::new(create_client(storage));
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    tracing::info!("Medbook server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/appointment", post(create_booking))
        .route("/api/appointments", get(list_bookings).delete(clear_bookings))
        .route("/api/appointments/{id}", get(get_booking).delete(cancel_booking))
        .route("/api/doctor", post(create_doctor))
        .route("/api/doctors", get(list_doctors).delete(clear_doctors))
        .route("/api/doctors/{id}", get(get_doctor).delete(remove_doctor))
        .route("/api/patient", post(create_patient))
        .route("/api/patients", get(list_patients).delete(clear_patients))
        .route("/api/patients/{id}", get(get_patient).delete(remove_patient))
        .route("/api/room", post(create_room))
        .route("/api/rooms", get(list_rooms).delete(clear_rooms))
        .route("/api/rooms/{room_name}", get(get_room).delete(remove_room))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ─── Response Helpers ───────────────────────────────────────────────────────

fn reply<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(ApiResponse::ok(data))).into_response()
}

fn reject(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(ApiResponse::<()>::err(msg))).into_response()
}

/// Empty collections answer 204 with no body.
fn list_or_no_content<T: Serialize>(items: Vec<T>) -> Response {
    if items.is_empty() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        reply(StatusCode::OK, items)
    }
}

fn found_or_404<T: Serialize>(item: Option<T>, what: &str) -> Response {
    match item {
        Some(item) => reply(StatusCode::OK, item),
        None => reject(StatusCode::NOT_FOUND, format!("{} not found", what)),
    }
}

fn store_failure(e: StoreError) -> Response {
    if e.is_not_found() {
        return reject(StatusCode::NOT_FOUND, e.to_string());
    }
    tracing::error!(error = %e, "Store operation failed");
    reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn respond<T>(result: Result<T, StoreError>, ok: impl FnOnce(T) -> Response) -> Response {
    match result {
        Ok(value) => ok(value),
        Err(e) => store_failure(e),
    }
}

// ─── Handlers ───────────────────────────────────────────────────────────────

async fn health(State(client): State<AppState>) -> Response {
    respond(client.list_bookings(), |all| {
        reply(
            StatusCode::OK,
            HealthResponse {
                status: "ok".to_string(),
                bookings: all.len(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        )
    })
}

async fn create_booking(State(client): State<AppState>, Json(req): Json<CreateBookingRequest>) -> Response {
    if let Err(e) = req.validate() {
        return reject(StatusCode::BAD_REQUEST, e);
    }

    match client.propose(req.into_new_booking()) {
        Ok(all) => reply(StatusCode::OK, all),
        Err(e @ AdmissionError::InvalidRange { .. }) => {
            tracing::info!(error = %e, "Booking rejected");
            reject(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e @ AdmissionError::ResourceConflict { .. }) => {
            tracing::info!(error = %e, "Booking rejected");
            reject(StatusCode::NOT_ACCEPTABLE, e.to_string())
        }
        Err(AdmissionError::Store(e)) => store_failure(e),
    }
}

async fn list_bookings(State(client): State<AppState>) -> Response {
    respond(client.list_bookings(), list_or_no_content)
}

async fn get_booking(State(client): State<AppState>, Path(id): Path<u64>) -> Response {
    respond(client.get_booking(BookingId(id)), |b| {
        found_or_404(b, &format!("booking '{}'", id))
    })
}

async fn cancel_booking(State(client): State<AppState>, Path(id): Path<u64>) -> Response {
    respond(client.cancel_booking(BookingId(id)), |()| {
        tracing::info!(booking_id = id, "Booking cancelled");
        reply(StatusCode::OK, format!("Booking '{}' deleted", id))
    })
}

async fn clear_bookings(State(client): State<AppState>) -> Response {
    respond(client.clear_bookings(), |()| {
        tracing::info!("All bookings deleted");
        reply(StatusCode::OK, "All bookings deleted")
    })
}

// Doctors and patients share one set of handlers, keyed by role.

fn create_person(client: &BookingClient, role: PersonRole, req: CreatePersonRequest) -> Response {
    if let Err(e) = req.validate() {
        return reject(StatusCode::BAD_REQUEST, e);
    }
    respond(client.register_person(role, req.into_new_person()), |person| {
        tracing::info!(role = %role, id = person.id, "Person registered");
        reply(StatusCode::CREATED, person)
    })
}

fn get_person(client: &BookingClient, role: PersonRole, id: u64) -> Response {
    respond(client.get_person(role, id), |p| found_or_404(p, &format!("{} '{}'", role, id)))
}

fn remove_person(client: &BookingClient, role: PersonRole, id: u64) -> Response {
    respond(client.remove_person(role, id), |()| {
        tracing::info!(role = %role, id, "Person deleted");
        reply(StatusCode::OK, format!("{} '{}' deleted", role, id))
    })
}

fn clear_people(client: &BookingClient, role: PersonRole) -> Response {
    respond(client.clear_people(role), |()| {
        tracing::info!(role = %role, "All people deleted");
        reply(StatusCode::OK, format!("All {}s deleted", role))
    })
}

async fn create_doctor(State(client): State<AppState>, Json(req): Json<CreatePersonRequest>) -> Response {
    create_person(&client, PersonRole::Doctor, req)
}

async fn list_doctors(State(client): State<AppState>) -> Response {
    respond(client.list_people(PersonRole::Doctor), list_or_no_content)
}

async fn get_doctor(State(client): State<AppState>, Path(id): Path<u64>) -> Response {
    get_person(&client, PersonRole::Doctor, id)
}

async fn remove_doctor(State(client): State<AppState>, Path(id): Path<u64>) -> Response {
    remove_person(&client, PersonRole::Doctor, id)
}

async fn clear_doctors(State(client): State<AppState>) -> Response {
    clear_people(&client, PersonRole::Doctor)
}

async fn create_patient(State(client): State<AppState>, Json(req): Json<CreatePersonRequest>) -> Response {
    create_person(&client, PersonRole::Patient, req)
}

async fn list_patients(State(client): State<AppState>) -> Response {
    respond(client.list_people(PersonRole::Patient), list_or_no_content)
}

async fn get_patient(State(client): State<AppState>, Path(id): Path<u64>) -> Response {
    get_person(&client, PersonRole::Patient, id)
}

async fn remove_patient(State(client): State<AppState>, Path(id): Path<u64>) -> Response {
    remove_person(&client, PersonRole::Patient, id)
}

async fn clear_patients(State(client): State<AppState>) -> Response {
    clear_people(&client, PersonRole::Patient)
}

async fn create_room(State(client): State<AppState>, Json(req): Json<CreateRoomRequest>) -> Response {
    if let Err(e) = req.validate() {
        return reject(StatusCode::BAD_REQUEST, e);
    }
    respond(client.register_room(req.into_room()), |room| {
        tracing::info!(room = %room.room_name, "Room registered");
        reply(StatusCode::CREATED, room)
    })
}

async fn list_rooms(State(client): State<AppState>) -> Response {
    respond(client.list_rooms(), list_or_no_content)
}

async fn get_room(State(client): State<AppState>, Path(name): Path<String>) -> Response {
    let name = RoomName(name);
    respond(client.get_room(&name), |r| found_or_404(r, &format!("room '{}'", name)))
}

async fn remove_room(State(client): State<AppState>, Path(name): Path<String>) -> Response {
    let name = RoomName(name);
    respond(client.remove_room(&name), |()| {
        tracing::info!(room = %name, "Room deleted");
        reply(StatusCode::OK, format!("Room '{}' deleted", name))
    })
}

async fn clear_rooms(State(client): State<AppState>) -> Response {
    respond(client.clear_rooms(), |()| {
        tracing::info!("All rooms deleted");
        reply(StatusCode::OK, "All rooms deleted")
    })
}

// ─── Storage Backend Selection ──────────────────────────────────────────────

pub fn create_client(storage: &str) -> BookingClient {
    if storage == "memory" {
        tracing::info!("Storage backend: in-memory (bookings will not persist)");
        BookingClient::new()
    } else if let Some(path) = storage.strip_prefix("sqlite:") {
        #[cfg(feature = "sqlite")]
        {
            tracing::info!("Storage backend: SQLite ({})", path);
            match BookingClient::with_sqlite(path) {
                Ok(client) => client,
                Err(e) => {
                    tracing::error!("Failed to open SQLite: {}. Falling back to in-memory.", e);
                    BookingClient::new()
                }
            }
        }
        #[cfg(not(feature = "sqlite"))]
        {
            tracing::error!(
                "SQLite storage requested but `sqlite` feature is not enabled. \
                 Rebuild with: cargo build --features sqlite"
            );
            tracing::warn!("Falling back to in-memory storage.");
            let _ = path;
            BookingClient::new()
        }
    } else {
        tracing::error!("Unknown storage backend: '{}'. Use 'memory' or 'sqlite:<path>'", storage);
        tracing::warn!("Falling back to in-memory storage.");
        BookingClient::new()
    }
}
