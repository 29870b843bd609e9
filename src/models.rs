use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use uuid::Uuid;

/// One row of the loaded work-order export. Immutable after load.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub ticket_id: String,
    pub technician_name: String,
    pub create_time: NaiveDateTime,
    pub close_time: NaiveDateTime,
    pub decision: String,
    pub note: String,
    /// Whole minutes between creation and closure. Negative when the export
    /// records closure before creation; the loader reports those rows but
    /// keeps the raw value.
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetSummary {
    pub total_tickets: usize,
    pub mean_duration_minutes: f64,
    pub rejection_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TechnicianSummary {
    pub technician_name: String,
    pub total_tickets: usize,
    pub approved_tickets: usize,
    pub rejected_tickets: usize,
    pub avg_duration_minutes: f64,
    pub approval_rate: f64,
    pub normalized_duration_score: f64,
    pub final_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteFrequency {
    pub note: String,
    pub count: usize,
}

/// A (technician, calendar day) pair whose ticket volume crossed the alert
/// threshold.
#[derive(Debug, Clone, Serialize)]
pub struct DailyVolumeAlert {
    pub technician_name: String,
    pub date: NaiveDate,
    pub ticket_count: usize,
}

/// Persisted task record. Created externally; this binary only guarantees
/// the table exists and can seed sample rows.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: Uuid,
    pub employee: String,
    pub task_date: NaiveDate,
    pub day: String,
    pub shift: String,
    pub department: String,
    pub category: String,
    pub status: String,
    pub priority: String,
    pub description: String,
    pub submitted_at: NaiveDateTime,
}
