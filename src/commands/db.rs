use crate::error::{FundError, Result};
use crate::models::department_fund::DepartmentFund;
use crate::models::fund_request::{FundRequest, FundStatus, RequestEvent, StatusFilter};
use crate::models::user::{Role, UserProfile};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DB_SCHEMA_VERSION: i64 = 3;
pub const LEDGER_DIR: &str = ".fundtrack";
const LEDGER_FILE: &str = "ledger.db";

const REQUEST_COLUMNS: &str =
    "id, uid, email, amount, reason, status, money_taken_by, created_at, approved_at, done_at";

pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;",
    )?;

    let mut version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < 1 {
        apply_migration_1(conn)?;
        version = 1;
        conn.pragma_update(None, "user_version", version)?;
    }

    if version < 2 {
        apply_migration_2(conn)?;
        version = 2;
        conn.pragma_update(None, "user_version", version)?;
    }

    if version < 3 {
        apply_migration_3(conn)?;
        version = 3;
        conn.pragma_update(None, "user_version", version)?;
    }

    if version > DB_SCHEMA_VERSION {
        log::warn!("ledger schema version {version} is newer than {DB_SCHEMA_VERSION}");
    }

    Ok(())
}

fn apply_migration_1(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            uid TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            role TEXT NOT NULL CHECK(role IN ('user', 'admin')) DEFAULT 'user',
            created_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS fund_requests (
            id TEXT PRIMARY KEY,
            uid TEXT NOT NULL,
            email TEXT NOT NULL,
            amount TEXT NOT NULL,
            reason TEXT NOT NULL,
            status TEXT NOT NULL CHECK(status IN ('Pending', 'Approved', 'Rejected')) DEFAULT 'Pending',
            money_taken_by TEXT,
            created_at INTEGER NOT NULL,
            approved_at INTEGER,
            done_at INTEGER
        );

        CREATE TABLE IF NOT EXISTS department_funds (
            id TEXT PRIMARY KEY,
            amount TEXT NOT NULL,
            added_by TEXT NOT NULL,
            reason TEXT NOT NULL DEFAULT '',
            created_at INTEGER NOT NULL
        );
        ",
    )
}

fn apply_migration_2(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS request_events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            request_id TEXT NOT NULL REFERENCES fund_requests(id),
            from_status TEXT,
            to_status TEXT NOT NULL,
            actor_uid TEXT NOT NULL,
            note TEXT,
            at INTEGER NOT NULL
        );
        ",
    )
}

fn apply_migration_3(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_fund_requests_status_created ON fund_requests(status, created_at);
        CREATE INDEX IF NOT EXISTS idx_fund_requests_email ON fund_requests(email);
        CREATE INDEX IF NOT EXISTS idx_department_funds_created ON department_funds(created_at);
        CREATE INDEX IF NOT EXISTS idx_request_events_request ON request_events(request_id);
        ",
    )
}

pub fn ledger_dir(data_dir: &str) -> PathBuf {
    Path::new(data_dir).join(LEDGER_DIR)
}

pub fn get_db_connection(data_dir: &str) -> Result<Connection> {
    let dir = ledger_dir(data_dir);
    fs::create_dir_all(&dir)?;
    let conn = Connection::open(dir.join(LEDGER_FILE))?;
    initialize_schema(&conn)?;
    Ok(conn)
}

fn conversion_error(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, message.into())
}

fn decimal_at(row: &Row<'_>, index: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(index)?;
    Decimal::from_str(&raw).map_err(|e| conversion_error(index, format!("amount {raw:?}: {e}")))
}

fn status_at(row: &Row<'_>, index: usize) -> rusqlite::Result<FundStatus> {
    let raw: String = row.get(index)?;
    FundStatus::from_str(&raw).map_err(|e| conversion_error(index, e))
}

fn request_from_row(row: &Row<'_>) -> rusqlite::Result<FundRequest> {
    Ok(FundRequest {
        id: row.get(0)?,
        uid: row.get(1)?,
        email: row.get(2)?,
        amount: decimal_at(row, 3)?,
        reason: row.get(4)?,
        status: status_at(row, 5)?,
        money_taken_by: row.get(6)?,
        created_at: row.get(7)?,
        approved_at: row.get(8)?,
        done_at: row.get(9)?,
    })
}

// ---- users ----

pub fn insert_user(conn: &Connection, user: &UserProfile) -> Result<()> {
    conn.execute(
        "INSERT INTO users (uid, name, email, role, created_at) VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(uid) DO UPDATE SET name = excluded.name, email = excluded.email, role = excluded.role",
        params![&user.uid, &user.name, &user.email, user.role.as_str(), user.created_at],
    )?;
    Ok(())
}

pub fn load_user(conn: &Connection, uid: &str) -> Result<Option<UserProfile>> {
    let user = conn
        .query_row(
            "SELECT uid, name, email, role, created_at FROM users WHERE uid = ?1",
            params![uid],
            |row| {
                let role: String = row.get(3)?;
                Ok(UserProfile {
                    uid: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    role: Role::from_str(&role).map_err(|e| conversion_error(3, e))?,
                    created_at: row.get(4)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}

pub fn count_rows(conn: &Connection, table: &str) -> Result<usize> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
    Ok(count as usize)
}

// ---- fund requests ----

pub fn insert_fund_request(conn: &Connection, request: &FundRequest) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        &format!("INSERT INTO fund_requests ({REQUEST_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"),
        params![
            &request.id,
            &request.uid,
            &request.email,
            request.amount.to_string(),
            &request.reason,
            request.status.as_str(),
            request.money_taken_by.as_deref(),
            request.created_at,
            request.approved_at,
            request.done_at,
        ],
    )?;
    insert_event(&tx, &request.id, None, request.status, &request.uid, None, request.created_at)?;
    tx.commit()?;
    Ok(())
}

pub fn load_request(conn: &Connection, id: &str) -> Result<Option<FundRequest>> {
    let request = conn
        .query_row(
            &format!("SELECT {REQUEST_COLUMNS} FROM fund_requests WHERE id = ?1"),
            params![id],
            request_from_row,
        )
        .optional()?;
    Ok(request)
}

/// Requests matching `status`, newest first. This is the store-side filter.
pub fn load_requests(conn: &Connection, status: StatusFilter) -> Result<Vec<FundRequest>> {
    let requests = match status {
        StatusFilter::All => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {REQUEST_COLUMNS} FROM fund_requests ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt.query_map([], request_from_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        }
        StatusFilter::Only(status) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {REQUEST_COLUMNS} FROM fund_requests WHERE status = ?1 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt.query_map(params![status.as_str()], request_from_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        }
    };
    Ok(requests)
}

pub fn load_requests_by_email(conn: &Connection, email: &str) -> Result<Vec<FundRequest>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REQUEST_COLUMNS} FROM fund_requests WHERE email = ?1 ORDER BY created_at DESC, rowid DESC"
    ))?;
    let rows = stmt.query_map(params![email], request_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Moves a `Pending` request to `to`. Any other current status is a conflict.
pub fn transition_status(
    conn: &Connection,
    id: &str,
    to: FundStatus,
    actor_uid: &str,
    now: i64,
) -> Result<FundRequest> {
    let tx = conn.unchecked_transaction()?;
    let approved_at = (to == FundStatus::Approved).then_some(now);
    let changed = tx.execute(
        "UPDATE fund_requests SET status = ?2, approved_at = COALESCE(?3, approved_at)
         WHERE id = ?1 AND status = 'Pending'",
        params![id, to.as_str(), approved_at],
    )?;

    if changed == 0 {
        return Err(match load_request(&tx, id)? {
            None => FundError::NotFound(format!("request {id}")),
            Some(current) => FundError::Conflict(format!("request {id} is already {}", current.status)),
        });
    }

    insert_event(&tx, id, Some(FundStatus::Pending), to, actor_uid, None, now)?;
    tx.commit()?;

    load_request(conn, id)?.ok_or_else(|| FundError::NotFound(format!("request {id}")))
}

/// Records who took the money for an approved request. Happens at most once.
pub fn record_disbursal(
    conn: &Connection,
    id: &str,
    recipient: &str,
    actor_uid: &str,
    now: i64,
) -> Result<FundRequest> {
    let tx = conn.unchecked_transaction()?;
    let changed = tx.execute(
        "UPDATE fund_requests SET money_taken_by = ?2, done_at = ?3
         WHERE id = ?1 AND status = 'Approved' AND (money_taken_by IS NULL OR money_taken_by = '')",
        params![id, recipient, now],
    )?;

    if changed == 0 {
        return Err(match load_request(&tx, id)? {
            None => FundError::NotFound(format!("request {id}")),
            Some(current) if current.status != FundStatus::Approved => FundError::Conflict(format!(
                "request {id} is {} and cannot be disbursed",
                current.status
            )),
            Some(current) => FundError::Conflict(format!(
                "request {id} was already taken by {}",
                current.money_taken_by.unwrap_or_default()
            )),
        });
    }

    insert_event(
        &tx,
        id,
        Some(FundStatus::Approved),
        FundStatus::Approved,
        actor_uid,
        Some(recipient),
        now,
    )?;
    tx.commit()?;

    load_request(conn, id)?.ok_or_else(|| FundError::NotFound(format!("request {id}")))
}

fn insert_event(
    conn: &Connection,
    request_id: &str,
    from: Option<FundStatus>,
    to: FundStatus,
    actor_uid: &str,
    note: Option<&str>,
    at: i64,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO request_events (request_id, from_status, to_status, actor_uid, note, at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![request_id, from.map(|s| s.as_str()), to.as_str(), actor_uid, note, at],
    )?;
    Ok(())
}

pub fn load_request_events(conn: &Connection, request_id: &str) -> Result<Vec<RequestEvent>> {
    let mut stmt = conn.prepare(
        "SELECT id, request_id, from_status, to_status, actor_uid, note, at FROM request_events WHERE request_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![request_id], |row| {
        let from_status = match row.get::<_, Option<String>>(2)? {
            Some(raw) => Some(FundStatus::from_str(&raw).map_err(|e| conversion_error(2, e))?),
            None => None,
        };
        Ok(RequestEvent {
            id: row.get(0)?,
            request_id: row.get(1)?,
            from_status,
            to_status: status_at(row, 3)?,
            actor_uid: row.get(4)?,
            note: row.get(5)?,
            at: row.get(6)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

// ---- department funds ----

pub fn insert_department_fund(conn: &Connection, fund: &DepartmentFund) -> Result<()> {
    conn.execute(
        "INSERT INTO department_funds (id, amount, added_by, reason, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![&fund.id, fund.amount.to_string(), &fund.added_by, &fund.reason, fund.created_at],
    )?;
    Ok(())
}

pub fn load_department_funds(conn: &Connection) -> Result<Vec<DepartmentFund>> {
    let mut stmt = conn.prepare(
        "SELECT id, amount, added_by, reason, created_at FROM department_funds ORDER BY created_at DESC, rowid DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(DepartmentFund {
            id: row.get(0)?,
            amount: decimal_at(row, 1)?,
            added_by: row.get(2)?,
            reason: row.get(3)?,
            created_at: row.get(4)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn last_activity_at(conn: &Connection) -> Result<Option<i64>> {
    let at = conn.query_row(
        "SELECT MAX(at) FROM (
            SELECT MAX(at) AS at FROM request_events
            UNION ALL
            SELECT MAX(created_at) AS at FROM department_funds
         )",
        [],
        |row| row.get::<_, Option<i64>>(0),
    )?;
    Ok(at)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().expect("in-memory db");
        initialize_schema(&conn).expect("schema init");
        conn
    }

    fn pending(id: &str, amount: i64) -> FundRequest {
        FundRequest {
            id: id.to_string(),
            uid: "u1".to_string(),
            email: "ana@example.com".to_string(),
            amount: Decimal::from(amount),
            reason: "Supplies".to_string(),
            status: FundStatus::Pending,
            money_taken_by: None,
            created_at: 100,
            approved_at: None,
            done_at: None,
        }
    }

    #[test]
    fn schema_initializes_with_expected_version() {
        let conn = memory_db();
        let version: i64 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .expect("schema version");
        assert_eq!(version, DB_SCHEMA_VERSION);
    }

    #[test]
    fn request_round_trip_preserves_decimal_amount() {
        let conn = memory_db();
        let mut request = pending("r1", 0);
        request.amount = Decimal::new(12550, 2);
        insert_fund_request(&conn, &request).expect("insert");

        let loaded = load_request(&conn, "r1").expect("load").expect("exists");
        assert_eq!(loaded, request);
    }

    #[test]
    fn second_transition_is_a_conflict() {
        let conn = memory_db();
        insert_fund_request(&conn, &pending("r1", 10)).expect("insert");

        let approved = transition_status(&conn, "r1", FundStatus::Approved, "admin", 200).expect("approve");
        assert_eq!(approved.status, FundStatus::Approved);
        assert_eq!(approved.approved_at, Some(200));

        let err = transition_status(&conn, "r1", FundStatus::Rejected, "admin", 201).unwrap_err();
        assert!(matches!(err, FundError::Conflict(_)));
        let still = load_request(&conn, "r1").expect("load").expect("exists");
        assert_eq!(still.status, FundStatus::Approved);
    }

    #[test]
    fn transition_of_unknown_request_is_not_found() {
        let conn = memory_db();
        let err = transition_status(&conn, "missing", FundStatus::Approved, "admin", 1).unwrap_err();
        assert!(matches!(err, FundError::NotFound(_)));
    }

    #[test]
    fn disbursal_requires_approval_and_happens_once() {
        let conn = memory_db();
        insert_fund_request(&conn, &pending("r1", 10)).expect("insert");

        let err = record_disbursal(&conn, "r1", "Ben", "admin", 150).unwrap_err();
        assert!(matches!(err, FundError::Conflict(_)));

        transition_status(&conn, "r1", FundStatus::Approved, "admin", 200).expect("approve");
        let done = record_disbursal(&conn, "r1", "Ben", "admin", 300).expect("disburse");
        assert_eq!(done.money_taken_by.as_deref(), Some("Ben"));
        assert_eq!(done.done_at, Some(300));

        let err = record_disbursal(&conn, "r1", "Cy", "admin", 400).unwrap_err();
        assert!(matches!(err, FundError::Conflict(_)));
        let stable = load_request(&conn, "r1").expect("load").expect("exists");
        assert_eq!(stable.money_taken_by.as_deref(), Some("Ben"));
    }

    #[test]
    fn events_record_the_full_lifecycle() {
        let conn = memory_db();
        insert_fund_request(&conn, &pending("r1", 10)).expect("insert");
        transition_status(&conn, "r1", FundStatus::Approved, "admin", 200).expect("approve");
        record_disbursal(&conn, "r1", "Ben", "admin", 300).expect("disburse");

        let events = load_request_events(&conn, "r1").expect("events");
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].from_status, None);
        assert_eq!(events[1].to_status, FundStatus::Approved);
        assert_eq!(events[2].note.as_deref(), Some("Ben"));
        assert_eq!(last_activity_at(&conn).expect("last activity"), Some(300));
    }

    #[test]
    fn status_filter_is_applied_in_the_query() {
        let conn = memory_db();
        insert_fund_request(&conn, &pending("r1", 10)).expect("insert");
        insert_fund_request(&conn, &pending("r2", 20)).expect("insert");
        transition_status(&conn, "r2", FundStatus::Rejected, "admin", 200).expect("reject");

        let rejected = load_requests(&conn, StatusFilter::Only(FundStatus::Rejected)).expect("load");
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].id, "r2");
        assert_eq!(load_requests(&conn, StatusFilter::All).expect("load").len(), 2);
    }
}
