use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Task;

/// Idempotent bootstrap for the persisted task table. Safe to run on every
/// start.
pub async fn ensure_tasks_table(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id UUID PRIMARY KEY,
            employee TEXT NOT NULL,
            task_date DATE NOT NULL,
            day TEXT NOT NULL,
            shift TEXT NOT NULL,
            department TEXT NOT NULL,
            category TEXT NOT NULL,
            status TEXT NOT NULL,
            priority TEXT NOT NULL,
            description TEXT NOT NULL,
            submitted_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("failed to create tasks table")?;

    Ok(())
}

pub async fn seed_tasks(pool: &PgPool) -> anyhow::Result<usize> {
    let tasks = sample_tasks()?;
    let mut inserted = 0usize;

    for task in tasks {
        let result = sqlx::query(
            r#"
            INSERT INTO tasks
            (id, employee, task_date, day, shift, department, category,
             status, priority, description, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(task.id)
        .bind(&task.employee)
        .bind(task.task_date)
        .bind(&task.day)
        .bind(&task.shift)
        .bind(&task.department)
        .bind(&task.category)
        .bind(&task.status)
        .bind(&task.priority)
        .bind(&task.description)
        .bind(task.submitted_at)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}

fn sample_tasks() -> anyhow::Result<Vec<Task>> {
    let rows = [
        (
            "7b1c3f62-1d0a-4a6e-9a3e-2f8f5d9c1a01",
            "Dana Cruz",
            (2026, 2, 2),
            "Monday",
            "morning",
            "Field Ops",
            "maintenance",
            "open",
            "high",
            "Inspect transformer bank at substation 4",
        ),
        (
            "4e9d8a17-6c2b-4f3d-8e51-90ab7c3d2b02",
            "Omar Haddad",
            (2026, 2, 3),
            "Tuesday",
            "evening",
            "Field Ops",
            "repair",
            "in_progress",
            "medium",
            "Replace faulted meter on route 12",
        ),
        (
            "91f2b5c8-3a4d-4e7f-b260-15cd9e8f4c03",
            "Riya Kapoor",
            (2026, 2, 4),
            "Wednesday",
            "morning",
            "Dispatch",
            "inspection",
            "open",
            "low",
            "Quarterly audit of depot tooling",
        ),
    ];

    let mut tasks = Vec::new();
    for (id, employee, (year, month, day_num), day, shift, department, category, status, priority, description) in rows
    {
        let task_date =
            NaiveDate::from_ymd_opt(year, month, day_num).context("invalid seed date")?;
        let submitted_at: NaiveDateTime = task_date
            .and_hms_opt(7, 30, 0)
            .context("invalid seed time")?;
        tasks.push(Task {
            id: Uuid::parse_str(id)?,
            employee: employee.to_string(),
            task_date,
            day: day.to_string(),
            shift: shift.to_string(),
            department: department.to_string(),
            category: category.to_string(),
            status: status.to_string(),
            priority: priority.to_string(),
            description: description.to_string(),
            submitted_at,
        });
    }

    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_tasks_are_well_formed() {
        let tasks = sample_tasks().unwrap();
        assert_eq!(tasks.len(), 3);
        for task in &tasks {
            assert!(!task.employee.is_empty());
            assert_eq!(task.submitted_at.date(), task.task_date);
        }
    }

    #[test]
    fn seed_ids_are_distinct() {
        let tasks = sample_tasks().unwrap();
        let mut ids: Vec<Uuid> = tasks.iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), tasks.len());
    }
}
