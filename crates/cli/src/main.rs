//! Till CLI - point-of-sale cart, checkout and order history.
//!
//! # Usage
//!
//! ```bash
//! # Ring up a sale
//! TILL_ROLE=staff till cart add coffee "House Coffee" 5.99 --qty 2
//! TILL_ROLE=staff till checkout --customer "Ada Lovelace" --payment cash
//!
//! # Review and cancel orders
//! till --role manager orders list
//! till --role manager orders status ORD-123456 cancelled
//!
//! # Inspect permissions
//! till perms manager
//! till access manager 2 admin 1
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and edit the saved cart
//! - `checkout` - Record the cart as an order
//! - `orders` - List, show, update and delete orders
//! - `perms` - List a role's permissions
//! - `access` - Show what one user may do to another

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use till_core::{OrderStatus, PaymentMethod, Role};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod storage;

use commands::{CommandError, Context};
use config::{LogFormat, TillConfig};

#[derive(Parser)]
#[command(name = "till")]
#[command(author, version, about = "Till point-of-sale tools")]
struct Cli {
    /// Act as this role (overrides `TILL_ROLE`)
    #[arg(long, global = true)]
    role: Option<Role>,

    /// Data directory (overrides `TILL_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Record the cart as an order
    Checkout {
        /// Customer name (blank means walk-in)
        #[arg(short, long, default_value = "")]
        customer: String,

        /// Payment method (cash, credit card, debit card, mobile payment, other)
        #[arg(short, long, default_value = "cash")]
        payment: PaymentMethod,

        /// Keep the cart after checkout
        #[arg(long)]
        keep: bool,
    },
    /// Manage recorded orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// List permissions of a role (default: the signed-in role)
    Perms {
        role: Option<Role>,
    },
    /// Show which user-management actions an actor may take on a target
    Access {
        actor_role: Role,
        actor_id: String,
        target_role: Role,
        target_id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print lines and totals
    Show,
    /// Add units of a product
    Add {
        id: String,
        name: String,
        /// Unit price, e.g. 5.99
        #[arg(allow_negative_numbers = true)]
        price: Decimal,
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        qty: i64,
    },
    /// Remove a product's line
    Remove { id: String },
    /// Set a line's quantity
    Qty {
        id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Set the tax rate in percent
    Tax {
        #[arg(allow_negative_numbers = true)]
        percent: Decimal,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders, newest first
    List,
    /// Print one order
    Show { id: String },
    /// Change an order's status
    Status { id: String, status: OrderStatus },
    /// Delete an order
    Delete { id: String },
}

fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = match TillConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::Pretty);
            tracing::error!("Command failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(role) = cli.role {
        config.role = Some(role);
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    init_tracing(config.log_format);

    let ctx = Context::new(config);
    let mut out = io::stdout().lock();
    let result = run(&ctx, &mut out, cli.command).and_then(|()| Ok(out.flush()?));

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn run(ctx: &Context, out: &mut impl Write, command: Commands) -> Result<(), CommandError> {
    match command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(ctx, out)?,
            CartAction::Add {
                id,
                name,
                price,
                qty,
            } => commands::cart::add(ctx, out, &id, &name, price, qty)?,
            CartAction::Remove { id } => commands::cart::remove(ctx, out, &id)?,
            CartAction::Qty { id, quantity } => {
                commands::cart::set_quantity(ctx, out, &id, quantity)?;
            }
            CartAction::Clear => commands::cart::clear(ctx, out)?,
            CartAction::Tax { percent } => commands::cart::set_tax_rate(ctx, out, percent)?,
        },
        Commands::Checkout {
            customer,
            payment,
            keep,
        } => commands::cart::checkout(ctx, out, &customer, payment, keep)?,
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(ctx, out)?,
            OrdersAction::Show { id } => commands::orders::show(ctx, out, &id)?,
            OrdersAction::Status { id, status } => {
                commands::orders::set_status(ctx, out, &id, status)?;
            }
            OrdersAction::Delete { id } => commands::orders::delete(ctx, out, &id)?,
        },
        Commands::Perms { role } => commands::access::permissions(ctx, out, role)?,
        Commands::Access {
            actor_role,
            actor_id,
            target_role,
            target_id,
        } => commands::access::matrix(out, actor_role, &actor_id, target_role, &target_id)?,
    }
    Ok(())
}
