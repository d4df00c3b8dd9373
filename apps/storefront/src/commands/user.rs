//! # Account Commands
//!
//! Sign in/up/out, profile editing and the password reset flow. The session
//! lives in the store under `userInfo`.

use pharmacy_client::ProfileUpdate;
use pharmacy_core::validation::{validate_email, validate_password_match, validate_required};
use pharmacy_core::{StoreAction, UserInfo};
use tracing::{debug, info};

use crate::error::AppResult;
use crate::AppContext;

/// Signs in and stores the session.
pub async fn signin(ctx: &AppContext, email: &str, password: &str) -> AppResult<UserInfo> {
    let email = validate_email(email)?;
    validate_required("password", password)?;
    debug!(email = %email, "signin command");

    let user = ctx.client.anonymous().signin(&email, password).await?;
    ctx.store
        .dispatch(StoreAction::UserSignin(user.clone()))
        .await?;

    info!(user = %user.id, is_admin = user.is_admin, "Signed in");
    Ok(user)
}

/// Creates an account and signs it in.
pub async fn signup(
    ctx: &AppContext,
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> AppResult<UserInfo> {
    let name = validate_required("name", name)?;
    let email = validate_email(email)?;
    validate_required("password", password)?;
    validate_password_match(password, confirm_password)?;
    debug!(email = %email, "signup command");

    let user = ctx.client.anonymous().signup(&name, &email, password).await?;
    ctx.store
        .dispatch(StoreAction::UserSignin(user.clone()))
        .await?;

    info!(user = %user.id, "Account created");
    Ok(user)
}

/// Signs out, dropping the session, cart, address and payment method.
pub async fn signout(ctx: &AppContext) -> AppResult<()> {
    debug!("signout command");
    ctx.store.dispatch(StoreAction::UserSignout).await?;
    info!("Signed out");
    Ok(())
}

/// Updates name, email and optionally the password.
///
/// An empty `password` leaves it unchanged; otherwise it must match
/// `confirm_password`. The refreshed session replaces the stored one.
pub async fn update_profile(
    ctx: &AppContext,
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> AppResult<UserInfo> {
    ctx.session()?;
    let name = validate_required("name", name)?;
    let email = validate_email(email)?;
    validate_password_match(password, confirm_password)?;
    debug!(email = %email, changes_password = !password.is_empty(), "update_profile command");

    let update = ProfileUpdate {
        name: &name,
        email: &email,
        password: (!password.is_empty()).then_some(password),
    };
    let user = ctx.api().update_profile(&update).await?;
    ctx.store
        .dispatch(StoreAction::UserSignin(user.clone()))
        .await?;

    info!(user = %user.id, "Profile updated");
    Ok(user)
}

/// Asks the backend to email a reset link.
pub async fn forget_password(ctx: &AppContext, email: &str) -> AppResult<String> {
    let email = validate_email(email)?;
    debug!(email = %email, "forget_password command");
    let reply = ctx.client.anonymous().forget_password(&email).await?;
    Ok(reply.message)
}

/// Sets a new password using the token from the reset email.
pub async fn reset_password(
    ctx: &AppContext,
    reset_token: &str,
    password: &str,
    confirm_password: &str,
) -> AppResult<String> {
    validate_required("token", reset_token)?;
    validate_required("password", password)?;
    validate_password_match(password, confirm_password)?;
    debug!("reset_password command");

    let reply = ctx
        .client
        .anonymous()
        .reset_password(password, reset_token)
        .await?;
    info!("Password reset");
    Ok(reply.message)
}
