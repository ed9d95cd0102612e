use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::table::visible_width;
use ansi_term::Colour;

const MAX_OP_WIDTH: usize = 40;

/// ANSI color for an audit operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" | "employee_add" => Colour::Green,
        "del" | "del_all" => Colour::Red,
        "edit" | "employee_goals" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "export" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

pub struct LogRow {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub struct LogLogic;

impl LogLogic {
    pub fn load(pool: &DbPool, limit: Option<usize>) -> AppResult<Vec<LogRow>> {
        let mut stmt = pool.conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id DESC LIMIT ?1",
        )?;

        let limit = limit.map(|n| n as i64).unwrap_or(-1);
        let rows = stmt.query_map([limit], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%F %T").to_string())
                .unwrap_or(raw_date);

            Ok(LogRow {
                id: row.get(0)?,
                date,
                operation: row.get(2)?,
                target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                message: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            })
        })?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        out.reverse();
        Ok(out)
    }

    /// Render rows as `id: date | op (target) => message`.
    pub fn render(rows: &[LogRow]) -> Vec<String> {
        let op_text = |r: &LogRow| {
            let full = if r.target.is_empty() {
                r.operation.clone()
            } else {
                format!("{} ({})", r.operation, r.target)
            };
            if full.chars().count() > MAX_OP_WIDTH {
                let mut s: String = full.chars().take(MAX_OP_WIDTH - 3).collect();
                s.push_str("...");
                s
            } else {
                full
            }
        };

        let id_w = rows.iter().map(|r| r.id.to_string().len()).max().unwrap_or(1);
        let date_w = rows.iter().map(|r| r.date.len()).max().unwrap_or(10);
        let op_w = rows.iter().map(|r| op_text(r).len()).max().unwrap_or(10);

        rows.iter()
            .map(|r| {
                let text = op_text(r);
                let color = color_for_operation(&r.operation);

                // only the operation word is colored
                let colored = match text.split_once(' ') {
                    Some((op, rest)) => format!("{} {rest}", color.paint(op)),
                    None => color.paint(text.as_str()).to_string(),
                };
                let padding = " ".repeat(op_w.saturating_sub(visible_width(&colored)));

                format!(
                    "{:>id_w$}: {:<date_w$} | {colored}{padding} => {}",
                    r.id, r.date, r.message
                )
            })
            .collect()
    }

    pub fn print_log(pool: &DbPool, limit: Option<usize>) -> AppResult<()> {
        let rows = Self::load(pool, limit)?;

        println!("📜 Internal log:\n");
        for line in Self::render(&rows) {
            println!("{line}");
        }

        Ok(())
    }
}
