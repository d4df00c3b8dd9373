//! Pharmacy storefront CLI.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! pharmacy products
//! pharmacy search "vitamin c"
//!
//! # Shop
//! pharmacy signin -e amina@example.com -p secret
//! pharmacy cart add 65a1f0
//! pharmacy shipping --full-name Amina --address "12 Nile St" --city Cairo --postal-code 11511 --country Egypt
//! pharmacy payment PayPal
//! pharmacy place-order
//!
//! # Back-office
//! pharmacy admin reject 65b2 --reason "Prescription expired"
//! ```
//!
//! Failures print one line to stderr and exit with status 1.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pharmacy_core::{CartPricing, GeoLocation, Money, Order, ProductInput, ShippingAddress};
use pharmacy_storefront::commands::{admin, cart, checkout, orders, product, search, user, Screen};
use pharmacy_storefront::error::{AppError, AppResult};
use pharmacy_storefront::state::StorefrontConfig;
use pharmacy_storefront::{init_tracing, AppContext};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "pharmacy")]
#[command(author, version, about = "Pharmacy storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalogue and categories
    Products,
    /// Show one product
    Product { slug: String },
    /// Review a product
    Review {
        product_id: String,
        #[arg(short, long)]
        rating: u8,
        #[arg(short, long)]
        comment: String,
    },
    /// Search the catalogue
    Search { query: String },
    /// Show the suggestions the search box would offer
    Suggest { query: String },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Save the shipping address
    Shipping(ShippingArgs),
    /// Pin the delivery point
    Location {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(long)]
        address: Option<String>,
    },
    /// Choose the payment method
    Payment { method: String },
    /// Show the order summary
    Preview,
    /// Place the order
    PlaceOrder,
    /// Order history
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Back-office
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Sign in
    Signin {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Create an account
    Signup {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(short, long)]
        confirm: String,
    },
    /// Sign out and forget the cart
    Signout,
    /// Update the profile
    Profile {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long, default_value = "")]
        password: String,
        #[arg(short, long, default_value = "")]
        confirm: String,
    },
    /// Email a password reset link
    ForgetPassword {
        #[arg(short, long)]
        email: String,
    },
    /// Set a new password with a reset token
    ResetPassword {
        #[arg(short, long)]
        token: String,
        #[arg(short, long)]
        password: String,
        #[arg(short, long)]
        confirm: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with totals
    Show,
    /// Add one unit of a product
    Add { product_id: String },
    /// Set a line's quantity
    Update { product_id: String, quantity: u32 },
    /// Remove a line
    Remove { product_id: String },
    /// Empty the cart
    Clear,
}

#[derive(Args)]
struct ShippingArgs {
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    postal_code: String,
    #[arg(long)]
    country: String,
    /// Prescription image to upload with the address
    #[arg(long)]
    prescription: Option<PathBuf>,
}

#[derive(Subcommand)]
enum OrderAction {
    /// List my orders
    List,
    /// Show one order
    Show { order_id: String },
    /// Cancel an order
    Cancel { order_id: String },
    /// Download the invoice PDF
    Invoice {
        order_id: String,
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ProductArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    slug: String,
    /// Unit price, e.g. 12.50
    #[arg(long)]
    price: f64,
    #[arg(long, default_value_t = 0)]
    stock: u32,
    #[arg(long, default_value = "")]
    category: String,
    #[arg(long, default_value = "")]
    brand: String,
    #[arg(long, default_value = "")]
    image: String,
    #[arg(long, default_value = "")]
    description: String,
}

impl From<ProductArgs> for ProductInput {
    fn from(args: ProductArgs) -> Self {
        ProductInput {
            name: args.name,
            slug: args.slug,
            price: Money::from_decimal(args.price),
            images: Vec::new(),
            image: args.image,
            category: args.category,
            brand: args.brand,
            count_in_stock: args.stock,
            description: args.description,
        }
    }
}

#[derive(Subcommand)]
enum AdminAction {
    /// List all orders
    Orders,
    /// Approve a pending order
    Approve { order_id: String },
    /// Reject a pending order
    Reject {
        order_id: String,
        #[arg(short, long)]
        reason: String,
    },
    /// Mark an order delivered
    Deliver { order_id: String },
    /// Delete an order
    DeleteOrder { order_id: String },
    /// List users
    Users,
    /// Show one user
    User { user_id: String },
    /// Update a user
    UpdateUser {
        user_id: String,
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(long)]
        admin: bool,
    },
    /// Delete a user
    DeleteUser { user_id: String },
    /// Create a product
    CreateProduct(ProductArgs),
    /// Update a product
    UpdateProduct {
        product_id: String,
        #[command(flatten)]
        product: ProductArgs,
    },
    /// Delete a product
    DeleteProduct { product_id: String },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::debug!(code = ?e.code, "Command failed");
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = StorefrontConfig::load()?;
    let ctx = AppContext::init(config).await?;
    let result = execute(&ctx, cli.command).await;
    ctx.shutdown().await;
    result
}

async fn execute(ctx: &AppContext, command: Commands) -> AppResult<()> {
    match command {
        Commands::Products => print_json(&loaded(product::home(ctx).await)?),
        Commands::Product { slug } => {
            print_json(&loaded(product::product_detail(ctx, &slug).await)?)
        }
        Commands::Review {
            product_id,
            rating,
            comment,
        } => print_json(&product::create_review(ctx, &product_id, rating, &comment).await?),
        Commands::Search { query } => print_json(&loaded(search::search(ctx, &query).await)?),
        Commands::Suggest { query } => suggest(ctx, &query).await,
        Commands::Cart { action } => {
            let view = match action {
                CartAction::Show => cart::get_cart(ctx),
                CartAction::Add { product_id } => cart::add_to_cart(ctx, &product_id).await?,
                CartAction::Update {
                    product_id,
                    quantity,
                } => cart::update_quantity(ctx, &product_id, quantity).await?,
                CartAction::Remove { product_id } => {
                    cart::remove_from_cart(ctx, &product_id).await?
                }
                CartAction::Clear => cart::clear_cart(ctx).await?,
            };
            print_cart(ctx, &view);
            Ok(())
        }
        Commands::Shipping(args) => {
            let address = ShippingAddress {
                full_name: args.full_name,
                address: args.address,
                city: args.city,
                postal_code: args.postal_code,
                country: args.country,
                ..Default::default()
            };
            let saved =
                checkout::save_shipping_address(ctx, address, args.prescription.as_deref()).await?;
            print_json(&saved)
        }
        Commands::Location { lat, lng, address } => {
            let location = GeoLocation {
                lat,
                lng,
                address,
                name: None,
            };
            print_json(&checkout::save_map_location(ctx, location).await?)
        }
        Commands::Payment { method } => {
            let method = checkout::save_payment_method(ctx, &method).await?;
            println!("Payment method: {method}");
            Ok(())
        }
        Commands::Preview => {
            let preview = checkout::preview_order(ctx)?;
            print_json(&preview)
        }
        Commands::PlaceOrder => {
            let order = checkout::place_order(ctx).await?;
            println!(
                "Order {} placed, total {}",
                order.id,
                ctx.config.format_currency(order.total_price)
            );
            Ok(())
        }
        Commands::Orders { action } => match action {
            OrderAction::List => print_json(&loaded(orders::my_orders(ctx).await)?),
            OrderAction::Show { order_id } => {
                let order = loaded(orders::order_detail(ctx, &order_id).await)?;
                print_json(&order)?;
                print_status(&order);
                print_totals(ctx, &order.pricing());
                Ok(())
            }
            OrderAction::Cancel { order_id } => {
                print_status(&orders::cancel_order(ctx, &order_id).await?);
                Ok(())
            }
            OrderAction::Invoice { order_id, dir } => {
                let path = orders::download_invoice(ctx, &order_id, dir.as_deref()).await?;
                println!("Saved {}", path.display());
                Ok(())
            }
        },
        Commands::Admin { action } => execute_admin(ctx, action).await,
        Commands::Signin { email, password } => {
            let session = user::signin(ctx, &email, &password).await?;
            println!("Signed in as {}", session.name);
            Ok(())
        }
        Commands::Signup {
            name,
            email,
            password,
            confirm,
        } => {
            let session = user::signup(ctx, &name, &email, &password, &confirm).await?;
            println!("Welcome, {}", session.name);
            Ok(())
        }
        Commands::Signout => {
            user::signout(ctx).await?;
            println!("Signed out");
            Ok(())
        }
        Commands::Profile {
            name,
            email,
            password,
            confirm,
        } => {
            user::update_profile(ctx, &name, &email, &password, &confirm).await?;
            println!("User updated successfully");
            Ok(())
        }
        Commands::ForgetPassword { email } => {
            println!("{}", user::forget_password(ctx, &email).await?);
            Ok(())
        }
        Commands::ResetPassword {
            token,
            password,
            confirm,
        } => {
            println!("{}", user::reset_password(ctx, &token, &password, &confirm).await?);
            Ok(())
        }
    }
}

async fn execute_admin(ctx: &AppContext, action: AdminAction) -> AppResult<()> {
    match action {
        AdminAction::Orders => print_json(&loaded(admin::all_orders(ctx).await)?),
        AdminAction::Approve { order_id } => {
            print_status(&admin::approve_order(ctx, &order_id).await?);
            Ok(())
        }
        AdminAction::Reject { order_id, reason } => {
            print_status(&admin::reject_order(ctx, &order_id, &reason).await?);
            Ok(())
        }
        AdminAction::Deliver { order_id } => {
            print_status(&admin::deliver_order(ctx, &order_id).await?);
            Ok(())
        }
        AdminAction::DeleteOrder { order_id } => {
            print_message(admin::delete_order(ctx, &order_id).await?)
        }
        AdminAction::Users => print_json(&loaded(admin::list_users(ctx).await)?),
        AdminAction::User { user_id } => {
            print_json(&loaded(admin::user_detail(ctx, &user_id).await)?)
        }
        AdminAction::UpdateUser {
            user_id,
            name,
            email,
            admin: is_admin,
        } => print_message(admin::update_user(ctx, &user_id, &name, &email, is_admin).await?),
        AdminAction::DeleteUser { user_id } => {
            print_message(admin::delete_user(ctx, &user_id).await?)
        }
        AdminAction::CreateProduct(args) => {
            let created = admin::create_product(ctx, &args.into()).await?;
            println!("Product {} created", created.id);
            Ok(())
        }
        AdminAction::UpdateProduct {
            product_id,
            product,
        } => print_message(admin::update_product(ctx, &product_id, &product.into()).await?),
        AdminAction::DeleteProduct { product_id } => {
            print_message(admin::delete_product(ctx, &product_id).await?)
        }
    }
}

async fn suggest(ctx: &AppContext, query: &str) -> AppResult<()> {
    let suggestions = search::SearchSuggestions::from_context(ctx);
    let mut results = suggestions.subscribe();
    suggestions.on_input(query);

    if !query.trim().is_empty() {
        let wait = ctx.config.debounce() + ctx.config.request_timeout();
        tokio::time::timeout(wait, results.changed())
            .await
            .map_err(|_| AppError::internal("Timed out waiting for suggestions"))?
            .map_err(|_| AppError::internal("Suggestions closed"))?;
    }

    for product in suggestions.current() {
        println!("{}  {}", product.slug, product.name);
    }
    Ok(())
}

/// Unwraps a finished screen load.
fn loaded<T>(state: Screen<T>) -> AppResult<T> {
    state
        .into_result()
        .unwrap_or_else(|| Err(AppError::internal("Request did not finish")))
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| AppError::internal(e.to_string()))?;
    println!("{text}");
    Ok(())
}

fn print_message(message: String) -> AppResult<()> {
    println!("{message}");
    Ok(())
}

fn print_status(order: &Order) {
    match order.reject_reason() {
        Some(reason) => println!("Order {} is {}: {reason}", order.id, order.status),
        None => println!("Order {} is {}", order.id, order.status),
    }
}

fn print_cart(ctx: &AppContext, view: &cart::CartView) {
    let fmt = |m: Money| ctx.config.format_currency(m);

    for item in &view.items {
        println!(
            "{:<32} x{:<3} {:>10}",
            item.name,
            item.quantity,
            fmt(item.line_total())
        );
    }
    println!("Units:      {}", view.item_count);
    print_totals(ctx, &view.pricing);
}

fn print_totals(ctx: &AppContext, pricing: &CartPricing) {
    let fmt = |m: Money| ctx.config.format_currency(m);

    println!("Items:      {}", fmt(pricing.items_price));
    println!("Shipping:   {}", fmt(pricing.shipping_price));
    println!("Discount:   {}", fmt(pricing.discount_price));
    println!("Total:      {}", fmt(pricing.total_price));
}
