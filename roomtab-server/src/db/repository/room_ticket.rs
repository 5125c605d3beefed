//! Room Ticket Repository

use super::RepoResult;
use shared::models::{RoomTicket, TicketStatus};
use sqlx::{SqliteConnection, SqlitePool};

const TICKET_SELECT: &str = "SELECT id, room_number, guest_name, status, external_order_id, \
                             remote_state, created_at, updated_at FROM room_ticket";

pub async fn find_open_by_room(pool: &SqlitePool, room: &str) -> RepoResult<Option<RoomTicket>> {
    let sql = format!("{TICKET_SELECT} WHERE room_number = ? AND status = 'OPEN'");
    let row = sqlx::query_as::<_, RoomTicket>(&sql)
        .bind(room)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<RoomTicket>> {
    let sql = format!("{TICKET_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, RoomTicket>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert a new ticket row. The partial unique index on
/// `(room_number) WHERE status = 'OPEN'` rejects a second open ticket for
/// the same room with `RepoError::Duplicate`.
pub async fn insert(conn: &mut SqliteConnection, ticket: &RoomTicket) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO room_ticket (id, room_number, guest_name, status, external_order_id, \
         remote_state, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&ticket.id)
    .bind(&ticket.room_number)
    .bind(&ticket.guest_name)
    .bind(ticket.status)
    .bind(&ticket.external_order_id)
    .bind(&ticket.remote_state)
    .bind(ticket.created_at)
    .bind(ticket.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn set_status(
    conn: &mut SqliteConnection,
    id: &str,
    status: TicketStatus,
    now: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("UPDATE room_ticket SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected())
}

/// Record the POS-side order state last seen for this ticket.
pub async fn set_remote_state(
    conn: &mut SqliteConnection,
    id: &str,
    remote_state: &str,
    now: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("UPDATE room_ticket SET remote_state = ?, updated_at = ? WHERE id = ?")
        .bind(remote_state)
        .bind(now)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected())
}

/// Transition the room's open ticket to COMPLETED.
pub async fn complete_open(conn: &mut SqliteConnection, room: &str, now: i64) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE room_ticket SET status = 'COMPLETED', updated_at = ? \
         WHERE room_number = ? AND status = 'OPEN'",
    )
    .bind(now)
    .bind(room)
    .execute(&mut *conn)
    .await?;
    Ok(rows.rows_affected())
}

/// Remove open rows that lost their POS order linkage. Create-time cleanup
/// only; never a guest-facing operation.
pub async fn delete_unlinked_open(conn: &mut SqliteConnection, room: &str) -> RepoResult<u64> {
    let rows = sqlx::query(
        "DELETE FROM room_ticket WHERE room_number = ? AND status = 'OPEN' \
         AND (external_order_id IS NULL OR external_order_id = '')",
    )
    .bind(room)
    .execute(&mut *conn)
    .await?;
    Ok(rows.rows_affected())
}

pub async fn delete(conn: &mut SqliteConnection, id: &str) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM room_ticket WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected())
}
