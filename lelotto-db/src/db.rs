use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::{Draw, GeneratedSet};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    draw_no        INTEGER PRIMARY KEY,
    date           TEXT NOT NULL,
    n1             INTEGER NOT NULL,
    n2             INTEGER NOT NULL,
    n3             INTEGER NOT NULL,
    n4             INTEGER NOT NULL,
    n5             INTEGER NOT NULL,
    n6             INTEGER NOT NULL,
    bonus          INTEGER NOT NULL,
    first_prize    INTEGER NOT NULL DEFAULT 0,
    first_winners  INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS generated (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at  TEXT NOT NULL,
    mode        TEXT NOT NULL,
    numbers     TEXT NOT NULL,
    points      INTEGER NOT NULL,
    grade       TEXT NOT NULL
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lelotto.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA).context("Échec de la migration")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (draw_no, date, n1, n2, n3, n4, n5, n6, bonus, first_prize, first_winners)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        rusqlite::params![
            draw.draw_no,
            draw.date,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.numbers[5],
            draw.bonus,
            draw.first_prize,
            draw.first_winners,
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT draw_no, date, n1, n2, n3, n4, n5, n6, bonus, first_prize, first_winners
         FROM draws ORDER BY draw_no DESC LIMIT ?1"
    )?;
    let draws = stmt.query_map([limit], |row| {
        Ok(Draw {
            draw_no: row.get(0)?,
            date: row.get(1)?,
            numbers: [
                row.get::<_, u8>(2)?,
                row.get::<_, u8>(3)?,
                row.get::<_, u8>(4)?,
                row.get::<_, u8>(5)?,
                row.get::<_, u8>(6)?,
                row.get::<_, u8>(7)?,
            ],
            bonus: row.get(8)?,
            first_prize: row.get(9)?,
            first_winners: row.get(10)?,
        })
    })?.collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

pub fn save_generated(conn: &Connection, set: &GeneratedSet) -> Result<()> {
    conn.execute(
        "INSERT INTO generated (created_at, mode, numbers, points, grade)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![set.created_at, set.mode, set.numbers, set.points, set.grade],
    ).context("Échec de l'enregistrement de la combinaison")?;
    Ok(())
}

pub fn fetch_last_generated(conn: &Connection, limit: u32) -> Result<Vec<GeneratedSet>> {
    let mut stmt = conn.prepare(
        "SELECT created_at, mode, numbers, points, grade
         FROM generated ORDER BY id DESC LIMIT ?1"
    )?;
    let sets = stmt.query_map([limit], |row| {
        Ok(GeneratedSet {
            created_at: row.get(0)?,
            mode: row.get(1)?,
            numbers: row.get(2)?,
            points: row.get(3)?,
            grade: row.get(4)?,
        })
    })?.collect::<Result<Vec<_>, _>>()?;
    Ok(sets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draw(draw_no: u32, date: &str) -> Draw {
        Draw {
            draw_no,
            date: date.to_string(),
            numbers: [1, 2, 3, 4, 5, 6],
            bonus: 7,
            first_prize: 0,
            first_winners: 0,
        }
    }

    fn test_generated(numbers: &str) -> GeneratedSet {
        GeneratedSet {
            created_at: "2024-01-01 12:00:00".to_string(),
            mode: "uniform".to_string(),
            numbers: numbers.to_string(),
            points: 6,
            grade: "Moyenne".to_string(),
        }
    }

    #[test]
    fn test_insert_and_count() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 0);

        insert_draw(&conn, &test_draw(1, "2024-01-06")).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_ignored() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let inserted = insert_draw(&conn, &test_draw(1, "2024-01-06")).unwrap();
        assert!(inserted);
        let inserted = insert_draw(&conn, &test_draw(1, "2024-01-06")).unwrap();
        assert!(!inserted);
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_fetch_order() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        insert_draw(&conn, &test_draw(1100, "2023-12-30")).unwrap();
        insert_draw(&conn, &test_draw(1102, "2024-01-13")).unwrap();
        insert_draw(&conn, &test_draw(1101, "2024-01-06")).unwrap();

        let draws = fetch_last_draws(&conn, 10).unwrap();
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].draw_no, 1102);
        assert_eq!(draws[1].draw_no, 1101);
        assert_eq!(draws[2].draw_no, 1100);
        assert_eq!(draws[0].bonus, 7);

        let draws = fetch_last_draws(&conn, 2).unwrap();
        assert_eq!(draws.len(), 2);
    }

    #[test]
    fn test_generated_most_recent_first() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        save_generated(&conn, &test_generated("1,2,3,4,5,6")).unwrap();
        save_generated(&conn, &test_generated("7,8,9,10,11,12")).unwrap();

        let sets = fetch_last_generated(&conn, 10).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].numbers, "7,8,9,10,11,12");
        assert_eq!(sets[1].numbers, "1,2,3,4,5,6");
    }

    #[test]
    fn test_migrate_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 0);
    }
}
