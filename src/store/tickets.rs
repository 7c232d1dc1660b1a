use crate::models::{NewSupportTicket, SupportTicket, TicketStatus};

use super::{Store, StoreError};

impl Store {
    pub async fn create_ticket(&self, new_ticket: NewSupportTicket) -> Result<i64, StoreError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO support_tickets \
             (customer_name, customer_email, issue_description, priority, status) \
             VALUES ($1, $2, $3, $4, 'open') RETURNING id",
        )
        .bind(&new_ticket.customer_name)
        .bind(&new_ticket.customer_email)
        .bind(&new_ticket.issue_description)
        .bind(new_ticket.priority)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn get_ticket(&self, id: i64) -> Result<SupportTicket, StoreError> {
        sqlx::query_as::<_, SupportTicket>(
            "SELECT id, customer_name, customer_email, issue_description, priority, status, \
             created_at, updated_at, resolved_at FROM support_tickets WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::UnknownTicket(id))
    }

    pub async fn list_tickets(&self, status: Option<TicketStatus>) -> Result<Vec<SupportTicket>, StoreError> {
        let tickets = match status {
            Some(status) => {
                sqlx::query_as::<_, SupportTicket>(
                    "SELECT id, customer_name, customer_email, issue_description, priority, \
                     status, created_at, updated_at, resolved_at FROM support_tickets \
                     WHERE status = $1 ORDER BY created_at DESC",
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, SupportTicket>(
                    "SELECT id, customer_name, customer_email, issue_description, priority, \
                     status, created_at, updated_at, resolved_at FROM support_tickets \
                     ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(tickets)
    }

    /// `resolved_at` is set iff the new status is `resolved`; otherwise only
    /// `updated_at` changes.
    pub async fn update_ticket_status(&self, id: i64, new_status: TicketStatus) -> Result<(), StoreError> {
        let result = if new_status == TicketStatus::Resolved {
            sqlx::query(
                "UPDATE support_tickets SET status = $1, updated_at = now(), resolved_at = now() \
                 WHERE id = $2",
            )
            .bind(new_status)
            .bind(id)
            .execute(&self.pool)
            .await?
        } else {
            sqlx::query("UPDATE support_tickets SET status = $1, updated_at = now() WHERE id = $2")
                .bind(new_status)
                .bind(id)
                .execute(&self.pool)
                .await?
        };

        if result.rows_affected() == 0 {
            return Err(StoreError::UnknownTicket(id));
        }
        Ok(())
    }
}
