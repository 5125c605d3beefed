//! TicketManager — room ticket lifecycle
//!
//! Owns the per-room open-ticket invariants across two systems that cannot
//! be transactionally joined:
//!
//! - at most one OPEN ticket per room (partial unique index on the store)
//! - every OPEN ticket is linked to a POS order; a row that loses the
//!   linkage heals to CANCELED on the next read
//!
//! The POS mutation always happens before the local commit ("remote
//! first"): a local OPEN row only exists once the POS order is confirmed.
//! The inverse window remains: a POS order can be created and the local
//! insert fail, leaving an orphaned POS order. No compensating cancel is
//! issued; the orphan is logged with its order id.

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::db::repository::{RepoError, RepoResult, room_ticket};
use crate::pos::{PosClient, PosError};
use shared::item::ItemInput;
use shared::models::{OrderLineItem, OrderSnapshot, RoomTicket, TicketStatus, TicketView};
use shared::util::now_millis;

#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    #[error("POS unreachable: {0}")]
    RemoteUnavailable(String),

    #[error("POS rejected order request ({status}): {message}")]
    RemoteRejected { status: u16, message: String },

    #[error("store error: {0}")]
    Store(#[from] RepoError),

    #[error("no valid line items in request")]
    NoValidItems,
}

impl From<PosError> for TicketError {
    fn from(e: PosError) -> Self {
        match e {
            PosError::Unavailable(msg) => TicketError::RemoteUnavailable(msg),
            PosError::Rejected { status, message } => {
                TicketError::RemoteRejected { status, message }
            }
            PosError::OrderNotFound(id) => TicketError::RemoteRejected {
                status: 404,
                message: format!("order {id} not found"),
            },
        }
    }
}

pub struct TicketManager {
    pool: SqlitePool,
    pos: Arc<dyn PosClient>,
}

impl TicketManager {
    pub fn new(pool: SqlitePool, pos: Arc<dyn PosClient>) -> Self {
        Self { pool, pos }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Self-healing read of the room's open ticket.
    ///
    /// Every read is a reconciliation point: if the POS no longer knows
    /// the linked order, or reports it as not open, the local row is
    /// corrected to CANCELED before "no ticket" is returned. A POS
    /// transport failure propagates instead, since healing on an outage
    /// would cancel valid tickets.
    pub async fn get_ticket(&self, room: &str) -> Result<Option<TicketView>, TicketError> {
        let Some(mut ticket) = room_ticket::find_open_by_room(&self.pool, room).await? else {
            return Ok(None);
        };

        let Some(order_id) = ticket
            .external_order_id
            .clone()
            .filter(|id| !id.is_empty())
        else {
            tracing::warn!(room = %room, ticket_id = %ticket.id, "Open ticket has no POS order, healing to CANCELED");
            self.cancel_local(&ticket.id).await?;
            return Ok(None);
        };

        let order = match self.pos.get_order(&order_id).await {
            Ok(order) => order,
            Err(PosError::OrderNotFound(_)) => {
                tracing::warn!(room = %room, order_id = %order_id, "POS order vanished, healing ticket to CANCELED");
                self.cancel_local(&ticket.id).await?;
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if !order.is_open() {
            tracing::info!(room = %room, order_id = %order_id, state = %order.state, "POS order no longer open, healing ticket to CANCELED");
            self.cancel_local(&ticket.id).await?;
            return Ok(None);
        }

        // Still open remotely; record state drift on the local row
        if ticket.remote_state.as_deref() != Some(order.state.as_str()) {
            let now = now_millis();
            let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
            room_ticket::set_remote_state(&mut tx, &ticket.id, &order.state, now).await?;
            tx.commit().await.map_err(RepoError::from)?;
            ticket.remote_state = Some(order.state.clone());
            ticket.updated_at = now;
        }

        Ok(Some(TicketView {
            ticket,
            remote: order,
        }))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Idempotent ticket creation.
    ///
    /// An existing valid OPEN ticket is returned unchanged. Otherwise the
    /// POS order is created first, outside any local transaction, and the
    /// local row inserted afterwards.
    pub async fn create_ticket(&self, room: &str, guest_name: &str) -> Result<TicketView, TicketError> {
        if let Some(view) = self.get_ticket(room).await? {
            return Ok(view);
        }

        // Purge invalid leftovers so the open-ticket index cannot reject
        // the re-insert
        self.purge_unlinked(room).await?;

        // Irrevocable external side effect: never inside a local
        // transaction
        let order = self.pos.create_order(room, guest_name).await?;

        let ticket = RoomTicket::open(room, guest_name, &order.id);
        match self.insert_ticket(&ticket).await {
            Ok(()) => {}
            Err(RepoError::Duplicate(_)) => {
                // A concurrent create for this room won the index race; our
                // POS order is now an orphan. Return the winner's ticket.
                tracing::warn!(
                    room = %room,
                    order_id = %order.id,
                    "Concurrent ticket creation detected, orphaned POS order left behind"
                );
                return match self.get_ticket(room).await? {
                    Some(view) => Ok(view),
                    None => Err(TicketError::Store(RepoError::Duplicate(format!(
                        "open ticket for room {room} was created concurrently"
                    )))),
                };
            }
            Err(e) => {
                // POS order exists with no local counterpart. No
                // compensating remote cancel is issued; reconcile manually.
                tracing::error!(
                    room = %room,
                    order_id = %order.id,
                    error = %e,
                    "Failed to persist ticket, POS order is orphaned"
                );
                return Err(e.into());
            }
        }

        tracing::info!(room = %room, ticket_id = %ticket.id, order_id = %order.id, "Ticket opened");
        Ok(TicketView {
            ticket,
            remote: order,
        })
    }

    /// Normalize inputs, resolve the room's ticket (creating one if
    /// needed), and append the items to the linked POS order.
    ///
    /// On POS failure after the ticket exists, the caller gets the
    /// best-known ticket state from a recovery read rather than the error;
    /// only if that read also fails does the call fail outright.
    pub async fn add_items(
        &self,
        room: &str,
        guest_name: &str,
        inputs: Vec<ItemInput>,
    ) -> Result<TicketView, TicketError> {
        let (items, dropped) = shared::item::normalize_items(inputs);
        for err in &dropped {
            tracing::warn!(room = %room, error = %err, "Dropping unusable line item");
        }
        if items.is_empty() {
            return Err(TicketError::NoValidItems);
        }

        let view = self.create_ticket(room, guest_name).await?;
        let Some(order_id) = view
            .ticket
            .external_order_id
            .clone()
            .filter(|id| !id.is_empty())
        else {
            // Unreachable through create_ticket, which only returns linked
            // tickets
            return Err(TicketError::Store(RepoError::Validation(format!(
                "open ticket for room {room} has no POS order"
            ))));
        };

        let lines: Vec<OrderLineItem> = items.into_iter().map(OrderLineItem::from).collect();

        match self.pos.append_line_items(&order_id, &lines).await {
            Ok(order) => {
                self.touch_after_append(&view.ticket.id, &order).await;
                Ok(TicketView {
                    ticket: view.ticket,
                    remote: order,
                })
            }
            Err(e) => {
                tracing::warn!(room = %room, order_id = %order_id, error = %e, "Append failed, returning recovery read");
                match self.get_ticket(room).await {
                    Ok(Some(recovered)) => Ok(recovered),
                    _ => Err(e.into()),
                }
            }
        }
    }

    /// Transition the room's open ticket to COMPLETED. Local only: payment
    /// capture and POS settlement are separate flows.
    pub async fn checkout(&self, room: &str) -> Result<bool, TicketError> {
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        let completed = room_ticket::complete_open(&mut tx, room, now_millis()).await?;
        tx.commit().await.map_err(RepoError::from)?;

        if completed > 0 {
            tracing::info!(room = %room, "Ticket checked out");
        }
        Ok(completed > 0)
    }

    /// Remove a ticket row. Cleanup path only, never guest-facing.
    pub async fn delete_ticket(&self, ticket_id: &str) -> Result<bool, TicketError> {
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        let deleted = room_ticket::delete(&mut tx, ticket_id).await?;
        tx.commit().await.map_err(RepoError::from)?;
        Ok(deleted > 0)
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    async fn cancel_local(&self, ticket_id: &str) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;
        room_ticket::set_status(&mut tx, ticket_id, TicketStatus::Canceled, now_millis()).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn purge_unlinked(&self, room: &str) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;
        let purged = room_ticket::delete_unlinked_open(&mut tx, room).await?;
        tx.commit().await?;
        if purged > 0 {
            tracing::warn!(room = %room, purged, "Purged open ticket rows without POS linkage");
        }
        Ok(())
    }

    async fn insert_ticket(&self, ticket: &RoomTicket) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;
        room_ticket::insert(&mut tx, ticket).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Keep the local heartbeat and remote state current after a
    /// successful append. Best-effort: the POS already accepted the items.
    async fn touch_after_append(&self, ticket_id: &str, order: &OrderSnapshot) {
        let result: RepoResult<()> = async {
            let mut tx = self.pool.begin().await?;
            room_ticket::set_remote_state(&mut tx, ticket_id, &order.state, now_millis()).await?;
            tx.commit().await?;
            Ok(())
        }
        .await;
        if let Err(e) = result {
            tracing::warn!(ticket_id = %ticket_id, error = %e, "Failed to record remote state after append");
        }
    }
}
