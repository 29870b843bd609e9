use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDateTime;

use crate::models::Ticket;

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

fn parse_timestamp(raw: &str) -> anyhow::Result<NaiveDateTime> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(parsed);
        }
    }
    anyhow::bail!("unparseable timestamp {raw:?}")
}

fn read_tickets<R: Read>(reader: R) -> anyhow::Result<Vec<Ticket>> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        ticket_id: String,
        technician_name: String,
        create_time: String,
        close_time: String,
        decision: String,
        note: String,
    }

    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut tickets = Vec::new();

    for (index, result) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("malformed record at row {}", index + 1))?;
        let create_time = parse_timestamp(&row.create_time)
            .with_context(|| format!("bad create_time at row {}", index + 1))?;
        let close_time = parse_timestamp(&row.close_time)
            .with_context(|| format!("bad close_time at row {}", index + 1))?;
        let duration_minutes = (close_time - create_time).num_minutes();

        tickets.push(Ticket {
            ticket_id: row.ticket_id,
            technician_name: row.technician_name,
            create_time,
            close_time,
            decision: row.decision,
            note: row.note,
            duration_minutes,
        });
    }

    Ok(tickets)
}

pub fn load_tickets(path: &Path) -> anyhow::Result<Vec<Ticket>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open ticket export {}", path.display()))?;
    read_tickets(file).with_context(|| format!("failed to load {}", path.display()))
}

/// Rows whose closure precedes creation. Kept as-is in the table; callers
/// decide whether to warn.
pub fn negative_duration_count(tickets: &[Ticket]) -> usize {
    tickets.iter().filter(|t| t.duration_minutes < 0).count()
}

/// Lazily-loaded ticket table. The CSV is read on first access and reused
/// for the store's lifetime; `reload` drops the cache so the next access
/// re-reads the source.
pub struct TicketStore {
    path: PathBuf,
    cache: Option<Vec<Ticket>>,
}

impl TicketStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path, cache: None }
    }

    pub fn tickets(&mut self) -> anyhow::Result<&[Ticket]> {
        if self.cache.is_none() {
            self.cache = Some(load_tickets(&self.path)?);
        }
        Ok(self.cache.as_deref().unwrap_or_default())
    }

    pub fn reload(&mut self) {
        self.cache = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_CSV: &str = "\
ticket_id,technician_name,create_time,close_time,decision,note
T-100,Dana Cruz,2024-01-01 08:00:00,2024-01-01 08:45:30,approved,replaced fuse
T-101,Omar Haddad,2024-01-01T09:15:00,2024-01-01T11:15:00,rejected,awaiting parts
";

    #[test]
    fn durations_derive_in_whole_minutes() {
        let tickets = read_tickets(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(tickets.len(), 2);
        // 45m30s truncates to 45 whole minutes.
        assert_eq!(tickets[0].duration_minutes, 45);
        assert_eq!(tickets[1].duration_minutes, 120);
        for ticket in &tickets {
            let expected = (ticket.close_time - ticket.create_time).num_minutes();
            assert_eq!(ticket.duration_minutes, expected);
        }
    }

    #[test]
    fn negative_durations_pass_through() {
        let csv = "\
ticket_id,technician_name,create_time,close_time,decision,note
T-200,Dana Cruz,2024-01-01 10:00:00,2024-01-01 09:00:00,approved,clock skew
";
        let tickets = read_tickets(csv.as_bytes()).unwrap();
        assert_eq!(tickets[0].duration_minutes, -60);
        assert_eq!(negative_duration_count(&tickets), 1);
    }

    #[test]
    fn malformed_timestamp_fails_the_load() {
        let csv = "\
ticket_id,technician_name,create_time,close_time,decision,note
T-300,Dana Cruz,yesterday,2024-01-01 09:00:00,approved,vague export
";
        let err = read_tickets(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("create_time"));
    }

    #[test]
    fn store_caches_until_reload() {
        let path = std::env::temp_dir().join(format!("tickets-{}.csv", std::process::id()));
        std::fs::File::create(&path)
            .unwrap()
            .write_all(SAMPLE_CSV.as_bytes())
            .unwrap();

        let mut store = TicketStore::new(path.clone());
        assert_eq!(store.tickets().unwrap().len(), 2);

        // Appending without reload must not be visible through the cache.
        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(
            b"T-102,Dana Cruz,2024-01-02 10:00:00,2024-01-02 10:30:00,approved,follow-up\n",
        )
        .unwrap();
        assert_eq!(store.tickets().unwrap().len(), 2);

        store.reload();
        assert_eq!(store.tickets().unwrap().len(), 3);

        std::fs::remove_file(&path).ok();
    }
}
