// Stockroom — CLI Module
//
// Command-line shell using clap derive macros. Stands in for the excluded
// rendering/session layer: it authenticates the caller, invokes the store,
// and prints the result. No inventory logic lives here.

mod commands;

use clap::{Args, Parser, Subcommand};

pub use commands::execute;

/// Stockroom — role-gated inventory management over SQLite.
#[derive(Parser, Debug)]
#[command(name = "stockroom")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Credentials supplied with every mutating command.
#[derive(Args, Debug)]
pub struct AuthArgs {
    /// Username to authenticate as.
    #[arg(long)]
    pub username: String,

    /// Password for the account.
    /// For production use, prefer piping from a secret manager to avoid
    /// shell history exposure.
    #[arg(long)]
    pub password: String,
}

/// Product field values for add and update.
#[derive(Args, Debug)]
pub struct ProductArgs {
    /// Product name (required, non-empty).
    #[arg(long)]
    pub name: String,

    /// Stock-keeping unit, a free-text identifier.
    #[arg(long)]
    pub sku: Option<String>,

    /// Free-text description.
    #[arg(long)]
    pub description: Option<String>,

    /// Units in stock.
    #[arg(long, default_value_t = 0)]
    pub quantity: i64,

    /// Unit price.
    #[arg(long, default_value_t = 0.0)]
    pub price: f64,

    /// Product category.
    #[arg(long)]
    pub category: Option<String>,

    /// Brand name.
    #[arg(long)]
    pub brand: Option<String>,

    /// Supplier name.
    #[arg(long)]
    pub supplier: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Stockroom: create the database and seed default accounts.
    Init,

    /// Verify a username/password pair and report the account's role.
    Login {
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Add a new product to the inventory (admin only).
    Add {
        #[command(flatten)]
        auth: AuthArgs,

        #[command(flatten)]
        product: ProductArgs,
    },

    /// List all products, newest first.
    List {
        /// Sort alphabetically by name instead of newest first.
        #[arg(long)]
        by_name: bool,

        /// Emit the listing as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Search products by case-insensitive substring
    /// (matches name, supplier, SKU, category, or brand).
    Search {
        /// The search term. Empty returns the full listing.
        term: String,
    },

    /// Overwrite an existing product's fields (admin only).
    Update {
        /// The id of the product to update.
        id: i64,

        #[command(flatten)]
        auth: AuthArgs,

        #[command(flatten)]
        product: ProductArgs,
    },

    /// Permanently delete a product by id (admin only).
    Delete {
        /// The id of the product to delete.
        id: i64,

        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Show aggregate inventory statistics.
    Stats,
}
