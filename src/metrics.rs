use std::collections::HashMap;

use chrono::{NaiveDate, Timelike};

use crate::models::{DailyVolumeAlert, FleetSummary, NoteFrequency, Ticket, TechnicianSummary};

/// A (technician, day) pair is flagged when its ticket count is strictly
/// greater than this.
pub const DAILY_VOLUME_THRESHOLD: usize = 3;

pub fn fleet_summary(tickets: &[Ticket]) -> FleetSummary {
    let total_tickets = tickets.len();
    if total_tickets == 0 {
        return FleetSummary {
            total_tickets: 0,
            mean_duration_minutes: 0.0,
            rejection_rate: 0.0,
        };
    }

    let duration_sum: i64 = tickets.iter().map(|t| t.duration_minutes).sum();
    let rejected = tickets.iter().filter(|t| t.decision == "rejected").count();

    FleetSummary {
        total_tickets,
        mean_duration_minutes: duration_sum as f64 / total_tickets as f64,
        rejection_rate: rejected as f64 / total_tickets as f64 * 100.0,
    }
}

pub fn technician_summaries(tickets: &[Ticket]) -> Vec<TechnicianSummary> {
    struct Accumulator {
        total: usize,
        approved: usize,
        rejected: usize,
        duration_sum: i64,
    }

    let mut groups: HashMap<String, Accumulator> = HashMap::new();

    for ticket in tickets {
        let entry = groups
            .entry(ticket.technician_name.clone())
            .or_insert(Accumulator {
                total: 0,
                approved: 0,
                rejected: 0,
                duration_sum: 0,
            });
        entry.total += 1;
        match ticket.decision.as_str() {
            "approved" => entry.approved += 1,
            "rejected" => entry.rejected += 1,
            _ => {}
        }
        entry.duration_sum += ticket.duration_minutes;
    }

    let max_avg = groups
        .values()
        .map(|acc| acc.duration_sum as f64 / acc.total as f64)
        .fold(0.0_f64, f64::max);

    let mut summaries: Vec<TechnicianSummary> = groups
        .iter()
        .map(|(name, acc)| {
            let avg_duration_minutes = acc.duration_sum as f64 / acc.total as f64;
            let approval_rate = acc.approved as f64 / acc.total as f64 * 100.0;
            let normalized_duration_score = if max_avg > 0.0 {
                1.0 - avg_duration_minutes / max_avg
            } else {
                0.0
            };
            TechnicianSummary {
                technician_name: name.clone(),
                total_tickets: acc.total,
                approved_tickets: acc.approved,
                rejected_tickets: acc.rejected,
                avg_duration_minutes,
                approval_rate,
                normalized_duration_score,
                final_score: approval_rate * 0.6 + normalized_duration_score * 100.0 * 0.4,
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.technician_name.cmp(&b.technician_name))
    });
    summaries
}

/// Exact, case-sensitive note counts ranked by count descending. Equal
/// counts keep first-encountered order.
pub fn note_frequencies(tickets: &[Ticket]) -> Vec<NoteFrequency> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for (index, ticket) in tickets.iter().enumerate() {
        let entry = counts.entry(ticket.note.as_str()).or_insert((0, index));
        entry.0 += 1;
    }

    let mut frequencies: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(note, (count, first_seen))| (note, count, first_seen))
        .collect();
    frequencies.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)));

    frequencies
        .into_iter()
        .map(|(note, count, _)| NoteFrequency {
            note: note.to_string(),
            count,
        })
        .collect()
}

/// Ticket count per hour of `create_time`, all 24 buckets present.
pub fn hourly_distribution(tickets: &[Ticket]) -> [u64; 24] {
    let mut buckets = [0u64; 24];
    for ticket in tickets {
        buckets[ticket.create_time.hour() as usize] += 1;
    }
    buckets
}

pub fn daily_volume_alerts(tickets: &[Ticket]) -> Vec<DailyVolumeAlert> {
    let mut groups: HashMap<(String, NaiveDate), usize> = HashMap::new();

    for ticket in tickets {
        let key = (ticket.technician_name.clone(), ticket.create_time.date());
        *groups.entry(key).or_insert(0) += 1;
    }

    let mut alerts: Vec<DailyVolumeAlert> = groups
        .into_iter()
        .filter(|(_, count)| *count > DAILY_VOLUME_THRESHOLD)
        .map(|((technician_name, date), ticket_count)| DailyVolumeAlert {
            technician_name,
            date,
            ticket_count,
        })
        .collect();

    alerts.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.technician_name.cmp(&b.technician_name))
    });
    alerts
}
