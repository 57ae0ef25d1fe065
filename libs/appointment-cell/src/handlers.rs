// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::SessionUser;
use shared_models::error::AppError;
use shared_utils::AppState;

use crate::models::{
    BookAppointmentRequest, BookingFormDefaults, DashboardStats, ListAppointmentsQuery,
};
use crate::services::AppointmentBookingService;

// ==============================================================================
// BOOKING HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    WithRejection(Json(request), _): WithRejection<Json<BookAppointmentRequest>, AppError>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    debug!("Book request from user {}", user.id);

    let service = AppointmentBookingService::new();
    let now = state.clock.now();

    let appointment = {
        let mut db = state.db.write().await;
        service.book_appointment(&mut db, request, now)?
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "appointment": appointment,
            "message": "Appointment booked successfully!"
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_booking_form(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BookingFormDefaults>, AppError> {
    let service = AppointmentBookingService::new();
    let form = service.booking_form(&*state.db.read().await, state.clock.today())?;

    Ok(Json(form))
}

pub async fn get_departments() -> Json<Value> {
    let departments = AppointmentBookingService::new().departments();

    Json(json!({
        "departments": departments
    }))
}

// ==============================================================================
// LISTING AND STATUS HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): WithRejection<Query<ListAppointmentsQuery>, AppError>,
) -> Result<Json<Value>, AppError> {
    let filter = query.filter.unwrap_or_default();
    let service = AppointmentBookingService::new();

    let appointments = service.list_appointments(&*state.db.read().await, filter, state.clock.today())?;

    Ok(Json(json!({
        "filter": filter,
        "total": appointments.len(),
        "appointments": appointments
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let appointment_id = parse_appointment_id(&appointment_id)?;
    let service = AppointmentBookingService::new();
    let today = state.clock.today();

    let appointment = {
        let mut db = state.db.write().await;
        service.cancel_appointment(&mut db, appointment_id, today)?
    };

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment cancelled"
    })))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let appointment_id = parse_appointment_id(&appointment_id)?;
    let service = AppointmentBookingService::new();
    let today = state.clock.today();

    let appointment = {
        let mut db = state.db.write().await;
        service.complete_appointment(&mut db, appointment_id, today)?
    };

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment marked as completed"
    })))
}

#[axum::debug_handler]
pub async fn get_appointment_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardStats>, AppError> {
    let service = AppointmentBookingService::new();
    let stats = service.get_appointment_stats(&*state.db.read().await, state.clock.today())?;

    Ok(Json(stats))
}

/// Ids that are not UUIDs cannot name an appointment.
fn parse_appointment_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found(raw))
}
