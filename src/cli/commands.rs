// Stockroom — CLI Command Handlers
//
// Each function handles one CLI subcommand. They coordinate between the
// auth (credential verification) and store (inventory) modules. Every
// command opens the database, performs its operation, and drops the
// handle on return — including the error paths.

use std::path::PathBuf;

use zeroize::Zeroizing;

use crate::auth::{AuthContext, SqliteUserStore, UserStore};
use crate::error::AppError;
use crate::store::{
    Database, InventoryStore, Product, ProductFields, ProductOrder, SqliteInventoryStore,
};

use super::{AuthArgs, Commands, ProductArgs};

/// Default directory for Stockroom data files.
fn data_dir() -> PathBuf {
    let base = dirs_next::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("stockroom")
}

/// Path to the database file.
fn db_path() -> PathBuf {
    data_dir().join("stockroom.db")
}

/// Execute the parsed CLI command.
pub fn execute(command: Commands) -> Result<(), AppError> {
    match command {
        Commands::Init => cmd_init(),
        Commands::Login { auth } => cmd_login(auth),
        Commands::Add { auth, product } => cmd_add(auth, product),
        Commands::List { by_name, json } => cmd_list(by_name, json),
        Commands::Search { term } => cmd_search(term),
        Commands::Update { id, auth, product } => cmd_update(id, auth, product),
        Commands::Delete { id, auth } => cmd_delete(id, auth),
        Commands::Stats => cmd_stats(),
    }
}

// ─── Init ────────────────────────────────────────────────────────────────────

fn cmd_init() -> Result<(), AppError> {
    let dir = data_dir();
    std::fs::create_dir_all(&dir)?;

    let path = db_path();
    let db = Database::open(&path)?;

    let users = SqliteUserStore::new(&db);
    users.seed_default_accounts()?;

    println!("✓ Stockroom initialized successfully");
    println!("  Database: {}", path.display());
    println!("  Accounts: {} users", users.user_count()?);
    println!();
    println!("Next: log in with `stockroom login --username admin --password <password>`");

    Ok(())
}

// ─── Login ───────────────────────────────────────────────────────────────────

fn cmd_login(auth: AuthArgs) -> Result<(), AppError> {
    let db = open_db()?;
    let ctx = authenticate(&db, auth)?;

    println!("✓ Authenticated as {}", ctx.user());

    Ok(())
}

// ─── Add ─────────────────────────────────────────────────────────────────────

fn cmd_add(auth: AuthArgs, product: ProductArgs) -> Result<(), AppError> {
    let db = open_db()?;
    let ctx = authenticate(&db, auth)?;
    let store = SqliteInventoryStore::new(&db);

    let created = store.create(product_fields(product), &ctx)?;

    println!("✓ Product added");
    println!("  {}", created);

    Ok(())
}

// ─── List & Search ───────────────────────────────────────────────────────────

fn cmd_list(by_name: bool, json: bool) -> Result<(), AppError> {
    let db = open_db()?;
    let store = SqliteInventoryStore::new(&db);

    let order = if by_name {
        ProductOrder::NameAscending
    } else {
        ProductOrder::NewestFirst
    };
    let products = store.list_all(order)?;

    if json {
        let out = serde_json::to_string_pretty(&products)
            .map_err(|e| AppError::Other(format!("Failed to serialize listing: {}", e)))?;
        println!("{}", out);
        return Ok(());
    }

    print_product_table(&products);

    Ok(())
}

fn cmd_search(term: String) -> Result<(), AppError> {
    let db = open_db()?;
    let store = SqliteInventoryStore::new(&db);

    let products = store.search(&term)?;

    if products.is_empty() {
        println!("No products match '{}'.", term.trim());
        return Ok(());
    }

    print_product_table(&products);

    Ok(())
}

// ─── Update ──────────────────────────────────────────────────────────────────

fn cmd_update(id: i64, auth: AuthArgs, product: ProductArgs) -> Result<(), AppError> {
    let db = open_db()?;
    let ctx = authenticate(&db, auth)?;
    let store = SqliteInventoryStore::new(&db);

    let updated = store.update(id, product_fields(product), &ctx)?;

    println!("✓ Product {} updated", id);
    println!("  {}", updated);

    Ok(())
}

// ─── Delete ──────────────────────────────────────────────────────────────────

fn cmd_delete(id: i64, auth: AuthArgs) -> Result<(), AppError> {
    let db = open_db()?;
    let ctx = authenticate(&db, auth)?;
    let store = SqliteInventoryStore::new(&db);

    store.delete(id, &ctx)?;

    println!("✓ Product {} deleted", id);

    Ok(())
}

// ─── Stats ───────────────────────────────────────────────────────────────────

fn cmd_stats() -> Result<(), AppError> {
    let db = open_db()?;
    let store = SqliteInventoryStore::new(&db);

    let stats = store.statistics()?;

    println!("Inventory statistics:\n");
    println!("  Products:    {}", stats.total_products);
    println!("  Units:       {}", stats.total_units);
    println!("  Total value: {:.2}", stats.total_value);

    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Open the database, failing with a hint if `init` has not been run.
fn open_db() -> Result<Database, AppError> {
    let path = db_path();
    if !path.exists() {
        return Err(AppError::Other(format!(
            "Database not found at {}. Run `stockroom init` first.",
            path.display()
        )));
    }

    Ok(Database::open(&path)?)
}

/// Verify the supplied credentials and build the authentication context
/// passed into role-gated store operations.
fn authenticate(db: &Database, auth: AuthArgs) -> Result<AuthContext, AppError> {
    let password = Zeroizing::new(auth.password);
    let users = SqliteUserStore::new(db);
    let user = users.verify_credentials(&auth.username, &password)?;
    Ok(AuthContext::new(user))
}

fn product_fields(args: ProductArgs) -> ProductFields {
    ProductFields {
        name: args.name,
        sku: args.sku,
        description: args.description,
        quantity: args.quantity,
        price: args.price,
        category: args.category,
        brand: args.brand,
        supplier: args.supplier,
    }
}

fn print_product_table(products: &[Product]) {
    if products.is_empty() {
        println!("No products in the inventory yet.");
        println!("Add one with: stockroom add --username <u> --password <p> --name <name>");
        return;
    }

    println!("Products ({}):\n", products.len());
    for p in products {
        println!(
            "  {:>5} │ {:20} │ qty {:>6} │ {:>10.2} │ {:12} │ {}",
            p.id,
            p.name,
            p.quantity,
            p.price,
            p.supplier.as_deref().unwrap_or("-"),
            p.added_at.format("%Y-%m-%d %H:%M"),
        );
    }
}
