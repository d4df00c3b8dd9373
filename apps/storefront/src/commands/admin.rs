//! # Admin Commands
//!
//! The back-office: order review, user management, catalogue editing.
//! Every command here requires a signed-in administrator and refuses
//! without a request otherwise.
//!
//! ## Order Review
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  approve_order ──┐                                                      │
//! │  reject_order  ──┼──► update_order_status(change)                       │
//! │  deliver_order ──┘          │                                           │
//! │                             ├── 1. admin session                        │
//! │                             ├── 2. reject reason non-empty              │
//! │                             ├── 3. no other change of this order open   │
//! │                             ├── 4. GET order, check lifecycle           │
//! │                             └── 5. PUT /api/orders/{id}/status          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pharmacy_client::UserUpdate;
use pharmacy_core::validation::{validate_email, validate_reject_reason, validate_required};
use pharmacy_core::{Actor, Order, Product, ProductInput, StatusChange, User};
use tracing::{debug, info, warn};

use crate::commands::{load, Screen};
use crate::error::{AppError, AppResult};
use crate::AppContext;

// =============================================================================
// Orders
// =============================================================================

/// Loads every order (admin order list).
pub async fn all_orders(ctx: &AppContext) -> Screen<Vec<Order>> {
    load("admin_orders", async {
        ctx.require_admin()?;
        Ok::<_, AppError>(ctx.api().all_orders().await?)
    })
    .await
}

/// Applies a status change to an order.
///
/// A failed change leaves the order as it was and reports why.
pub async fn update_order_status(
    ctx: &AppContext,
    order_id: &str,
    change: StatusChange,
) -> AppResult<Order> {
    let admin = ctx.require_admin()?;
    let target = change.target();
    debug!(order_id = %order_id, status = %target, "update_order_status command");

    if let StatusChange::Reject { reason } = &change {
        validate_reject_reason(reason)?;
    }

    let _in_flight = ctx.mutations.begin(format!("order:{order_id}"))?;
    let api = ctx.api();
    let mut order = api.order(order_id).await?;
    let actor = Actor::from_is_admin(admin.is_admin);

    if let Err(err) = order.check(&change, actor) {
        warn!(order_id = %order_id, error = %err, "Status change refused");
        return Err(err.into());
    }

    let response = api
        .update_order_status(order_id, target, change.reason())
        .await?;
    let order = match response.order {
        Some(updated) => updated,
        None => {
            order.apply(&change, actor)?;
            order
        }
    };

    info!(order_id = %order_id, status = %order.status, "Order status updated");
    Ok(order)
}

/// Approves a pending order.
pub async fn approve_order(ctx: &AppContext, order_id: &str) -> AppResult<Order> {
    update_order_status(ctx, order_id, StatusChange::Approve).await
}

/// Rejects a pending order; `reason` is shown to the customer.
pub async fn reject_order(ctx: &AppContext, order_id: &str, reason: &str) -> AppResult<Order> {
    update_order_status(
        ctx,
        order_id,
        StatusChange::Reject {
            reason: reason.to_string(),
        },
    )
    .await
}

/// Marks an order delivered.
pub async fn deliver_order(ctx: &AppContext, order_id: &str) -> AppResult<Order> {
    update_order_status(ctx, order_id, StatusChange::Deliver).await
}

/// Deletes an order.
pub async fn delete_order(ctx: &AppContext, order_id: &str) -> AppResult<String> {
    debug!(order_id = %order_id, "delete_order command");
    ctx.require_admin()?;
    let reply = ctx.api().delete_order(order_id).await?;
    info!(order_id = %order_id, "Order deleted");
    Ok(reply.message)
}

// =============================================================================
// Users
// =============================================================================

/// Loads every user.
pub async fn list_users(ctx: &AppContext) -> Screen<Vec<User>> {
    load("admin_users", async {
        ctx.require_admin()?;
        Ok::<_, AppError>(ctx.api().users().await?)
    })
    .await
}

/// Loads one user.
pub async fn user_detail(ctx: &AppContext, user_id: &str) -> Screen<User> {
    load("admin_user", async {
        ctx.require_admin()?;
        Ok::<_, AppError>(ctx.api().user(user_id).await?)
    })
    .await
}

/// Updates a user's name, email and admin flag.
pub async fn update_user(
    ctx: &AppContext,
    user_id: &str,
    name: &str,
    email: &str,
    is_admin: bool,
) -> AppResult<String> {
    debug!(user_id = %user_id, is_admin, "update_user command");
    ctx.require_admin()?;

    let name = validate_required("name", name)?;
    let email = validate_email(email)?;
    let update = UserUpdate {
        name: &name,
        email: &email,
        is_admin,
    };

    let reply = ctx.api().update_user(user_id, &update).await?;
    info!(user_id = %user_id, "User updated");
    Ok(reply.message)
}

/// Deletes a user. An administrator cannot delete their own account.
pub async fn delete_user(ctx: &AppContext, user_id: &str) -> AppResult<String> {
    debug!(user_id = %user_id, "delete_user command");
    let admin = ctx.require_admin()?;
    if admin.id == user_id {
        return Err(AppError::forbidden("You cannot delete your own account"));
    }

    let reply = ctx.api().delete_user(user_id).await?;
    info!(user_id = %user_id, "User deleted");
    Ok(reply.message)
}

// =============================================================================
// Products
// =============================================================================

fn validate_product(input: &ProductInput) -> AppResult<()> {
    validate_required("name", &input.name)?;
    validate_required("slug", &input.slug)?;
    if input.price.is_negative() {
        return Err(AppError::validation("price cannot be negative"));
    }
    Ok(())
}

/// Creates a product.
pub async fn create_product(ctx: &AppContext, input: &ProductInput) -> AppResult<Product> {
    debug!(slug = %input.slug, "create_product command");
    ctx.require_admin()?;
    validate_product(input)?;

    let created = ctx.api().create_product(input).await?;
    info!(product_id = %created.product.id, "Product created");
    Ok(created.product)
}

/// Replaces a product's editable fields.
pub async fn update_product(
    ctx: &AppContext,
    product_id: &str,
    input: &ProductInput,
) -> AppResult<String> {
    debug!(product_id = %product_id, "update_product command");
    ctx.require_admin()?;
    validate_product(input)?;

    let reply = ctx.api().update_product(product_id, input).await?;
    info!(product_id = %product_id, "Product updated");
    Ok(reply.message)
}

/// Deletes a product.
pub async fn delete_product(ctx: &AppContext, product_id: &str) -> AppResult<String> {
    debug!(product_id = %product_id, "delete_product command");
    ctx.require_admin()?;

    let reply = ctx.api().delete_product(product_id).await?;
    info!(product_id = %product_id, "Product deleted");
    Ok(reply.message)
}
