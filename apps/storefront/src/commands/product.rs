//! # Product Commands
//!
//! Home screen, product detail and reviews.

use pharmacy_client::NewReview;
use pharmacy_core::validation::validate_review;
use pharmacy_core::{Product, ReviewSummary};
use serde::Serialize;
use tracing::{debug, info};

use crate::commands::{load, Screen};
use crate::error::{AppError, AppResult};
use crate::AppContext;

/// Data behind the home screen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeScreen {
    pub products: Vec<Product>,
    pub categories: Vec<String>,
}

/// Loads the catalogue and the category list.
pub async fn home(ctx: &AppContext) -> Screen<HomeScreen> {
    load("home", async {
        let api = ctx.api();
        let products = api.list_products().await?;
        let categories = api.categories().await?;
        Ok::<_, AppError>(HomeScreen {
            products,
            categories,
        })
    })
    .await
}

/// Loads one product by its slug.
pub async fn product_detail(ctx: &AppContext, slug: &str) -> Screen<Product> {
    debug!(slug = %slug, "product_detail command");
    load("product", async { Ok::<_, AppError>(ctx.api().product_by_slug(slug).await?) }).await
}

/// Posts a review as the signed-in user.
///
/// ## Rules
/// - Must be signed in
/// - Rating 1..=5 and a non-empty comment, checked before any request
///
/// ## Returns
/// The new review with the product's refreshed count and rating.
pub async fn create_review(
    ctx: &AppContext,
    product_id: &str,
    rating: u8,
    comment: &str,
) -> AppResult<ReviewSummary> {
    debug!(product_id = %product_id, rating, "create_review command");

    let user = ctx.session()?;
    let comment = validate_review(rating, comment)?;

    let review = NewReview {
        rating,
        comment: &comment,
        name: &user.name,
    };
    let summary = ctx.api().create_review(product_id, &review).await?;

    info!(
        product_id = %product_id,
        num_reviews = summary.num_reviews,
        rating = summary.rating,
        "Review posted"
    );
    Ok(summary)
}
