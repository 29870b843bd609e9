use std::fmt::Write;

use crate::models::{DailyVolumeAlert, FleetSummary, NoteFrequency, TechnicianSummary};

pub fn render_summary(summary: &FleetSummary) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Tickets loaded: {}", summary.total_tickets);
    let _ = writeln!(
        output,
        "Mean duration: {:.1} minutes",
        summary.mean_duration_minutes
    );
    let _ = writeln!(output, "Rejection rate: {:.1}%", summary.rejection_rate);
    output
}

pub fn render_technicians(summaries: &[TechnicianSummary], limit: usize) -> String {
    let mut output = String::new();

    if summaries.is_empty() {
        let _ = writeln!(output, "No technicians in this export.");
        return output;
    }

    let _ = writeln!(output, "Technicians by final score:");
    for summary in summaries.iter().take(limit) {
        let _ = writeln!(
            output,
            "- {} score {:.1} ({} tickets, {:.1}% approved, avg {:.1} min)",
            summary.technician_name,
            summary.final_score,
            summary.total_tickets,
            summary.approval_rate,
            summary.avg_duration_minutes
        );
    }
    output
}

pub fn render_notes(frequencies: &[NoteFrequency], top: usize) -> String {
    let mut output = String::new();

    if frequencies.is_empty() {
        let _ = writeln!(output, "No notes recorded.");
        return output;
    }

    let _ = writeln!(output, "Most frequent notes:");
    for frequency in frequencies.iter().take(top) {
        let _ = writeln!(output, "- {} x{}", frequency.note, frequency.count);
    }
    output
}

pub fn render_hourly(buckets: &[u64; 24]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Tickets by hour of creation:");
    for (hour, count) in buckets.iter().enumerate() {
        let bar = "#".repeat(*count as usize);
        let _ = writeln!(output, "{hour:>2}h | {count:>4} {bar}");
    }
    output
}

pub fn render_alerts(alerts: &[DailyVolumeAlert]) -> String {
    let mut output = String::new();

    if alerts.is_empty() {
        let _ = writeln!(output, "No volume alerts. All technicians within range.");
        return output;
    }

    let _ = writeln!(output, "High-volume days:");
    for alert in alerts {
        let _ = writeln!(
            output,
            "- {} handled {} tickets on {}",
            alert.technician_name, alert.ticket_count, alert.date
        );
    }
    output
}

/// Combined markdown report across every view.
pub fn build_report(
    source: &str,
    summary: &FleetSummary,
    technicians: &[TechnicianSummary],
    notes: &[NoteFrequency],
    hourly: &[u64; 24],
    alerts: &[DailyVolumeAlert],
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Ticket Insight Report");
    let _ = writeln!(output, "Source: {source}");
    let _ = writeln!(output);

    let _ = writeln!(output, "## Fleet Summary");
    output.push_str(&render_summary(summary));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Technician Ranking");
    output.push_str(&render_technicians(technicians, 10));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Notes");
    output.push_str(&render_notes(notes, 10));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Hourly Distribution");
    output.push_str("```\n");
    output.push_str(&render_hourly(hourly));
    output.push_str("```\n");

    let _ = writeln!(output);
    let _ = writeln!(output, "## Volume Alerts");
    output.push_str(&render_alerts(alerts));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_rate_formats_to_one_decimal() {
        let summary = FleetSummary {
            total_tickets: 100,
            mean_duration_minutes: 52.25,
            rejection_rate: 40.0,
        };
        let rendered = render_summary(&summary);
        assert!(rendered.contains("Rejection rate: 40.0%"));
    }

    #[test]
    fn empty_views_render_neutral_messages() {
        assert!(render_technicians(&[], 10).contains("No technicians"));
        assert!(render_notes(&[], 10).contains("No notes"));
        assert!(render_alerts(&[]).contains("No volume alerts"));
    }

    #[test]
    fn hourly_render_has_a_line_per_hour() {
        let mut buckets = [0u64; 24];
        buckets[9] = 3;
        let rendered = render_hourly(&buckets);
        // Header plus one line per bucket, zeros included.
        assert_eq!(rendered.lines().count(), 25);
        assert!(rendered.contains(" 9h |    3 ###"));
    }

    #[test]
    fn report_includes_every_section() {
        let summary = FleetSummary {
            total_tickets: 0,
            mean_duration_minutes: 0.0,
            rejection_rate: 0.0,
        };
        let report = build_report("export.csv", &summary, &[], &[], &[0u64; 24], &[]);
        for heading in [
            "## Fleet Summary",
            "## Technician Ranking",
            "## Top Notes",
            "## Hourly Distribution",
            "## Volume Alerts",
        ] {
            assert!(report.contains(heading), "missing {heading}");
        }
    }
}
