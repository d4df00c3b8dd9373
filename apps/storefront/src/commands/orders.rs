//! # Order History Commands
//!
//! The customer's view of their orders: list, detail, cancel, invoice.

use std::path::{Path, PathBuf};

use pharmacy_core::{Actor, Order, StatusChange};
use tracing::{debug, info, warn};

use crate::commands::{load, Screen};
use crate::error::{AppError, AppResult};
use crate::AppContext;

/// Loads the signed-in user's orders.
pub async fn my_orders(ctx: &AppContext) -> Screen<Vec<Order>> {
    load("order_history", async {
        ctx.session()?;
        Ok::<_, AppError>(ctx.api().my_orders().await?)
    })
    .await
}

/// Loads one order.
pub async fn order_detail(ctx: &AppContext, order_id: &str) -> Screen<Order> {
    debug!(order_id = %order_id, "order_detail command");
    load("order", async {
        ctx.session()?;
        Ok::<_, AppError>(ctx.api().order(order_id).await?)
    })
    .await
}

/// Cancels an order.
///
/// The current status is read first and the lifecycle is checked locally:
/// a delivered, rejected or already cancelled order is refused without a
/// request, as is a second cancel while the first is still waiting. When
/// the backend reply carries no order the change is applied to the order
/// read beforehand.
pub async fn cancel_order(ctx: &AppContext, order_id: &str) -> AppResult<Order> {
    let user = ctx.session()?;
    let actor = Actor::from_is_admin(user.is_admin);
    let _in_flight = ctx.mutations.begin(format!("order:{order_id}"))?;
    let api = ctx.api();

    let mut order = api.order(order_id).await?;
    debug!(order_id = %order_id, status = %order.status, "cancel_order command");

    if let Err(err) = order.check(&StatusChange::Cancel, actor) {
        warn!(order_id = %order_id, error = %err, "Cancel refused");
        return Err(err.into());
    }

    let response = api.cancel_order(order_id).await?;
    let order = match response.order {
        Some(updated) => updated,
        None => {
            order.apply(&StatusChange::Cancel, actor)?;
            order
        }
    };

    info!(order_id = %order_id, "Order cancelled");
    Ok(order)
}

/// File name an invoice is saved under.
pub fn invoice_file_name(order_id: &str) -> String {
    format!("invoice_{order_id}.pdf")
}

/// Downloads the invoice PDF into `dir` (or the configured download dir).
///
/// ## Returns
/// Path of the written `invoice_<id>.pdf`.
pub async fn download_invoice(
    ctx: &AppContext,
    order_id: &str,
    dir: Option<&Path>,
) -> AppResult<PathBuf> {
    debug!(order_id = %order_id, "download_invoice command");
    ctx.session()?;

    let bytes = ctx.api().order_report(order_id).await?;

    let dir = dir.map_or_else(|| ctx.config.download_dir(), Path::to_path_buf);
    let path = dir.join(invoice_file_name(order_id));

    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::internal(format!("Could not create {}: {e}", dir.display())))?;
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| AppError::internal(format!("Could not save {}: {e}", path.display())))?;

    info!(order_id = %order_id, bytes = bytes.len(), path = %path.display(), "Invoice saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_file_name() {
        assert_eq!(invoice_file_name("65a1f0"), "invoice_65a1f0.pdf");
    }
}
