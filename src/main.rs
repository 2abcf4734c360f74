//! Command line checkout for the tally basket pricing engine.
//!
//! Takes product names as positional arguments, prices them against the
//! product and promotion catalogs, and prints a summary. Rejected product
//! names are reported but never fatal; only a catalog that fails to load
//! ends the run with a nonzero exit code.

#![expect(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "user-facing command line output"
)]

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use rusty_money::iso;

use tally::{
    basket::Basket,
    catalog::Catalog,
    receipt::{Receipt, ReceiptError, format_price},
};

/// Price a basket of products against a catalog of promotions.
#[derive(Debug, Parser)]
#[command(name = "tally")]
struct Args {
    /// Product names to add to the basket, in order
    products: Vec<String>,

    /// Path to the products catalog file
    #[arg(long, value_name = "PATH", default_value = "data/products.yml")]
    products_catalog: PathBuf,

    /// Path to the promotions catalog file
    #[arg(long, value_name = "PATH", default_value = "data/promotions.yml")]
    promotions_catalog: PathBuf,

    /// Print an itemised receipt table after the summary
    #[arg(long)]
    table: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let catalog = match Catalog::from_paths(
        &args.products_catalog,
        &args.promotions_catalog,
        iso::GBP,
    ) {
        Ok(catalog) => catalog,
        Err(error) => {
            eprintln!("Failed to load catalog: {error}");
            return ExitCode::FAILURE;
        }
    };

    match run(&catalog, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Failed to price basket: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(catalog: &Catalog<'_>, args: &Args) -> Result<(), ReceiptError> {
    let mut basket = Basket::new(catalog);

    for name in &args.products {
        basket.add(name);
    }

    basket.apply_promotions();

    let receipt = Receipt::from_basket(&basket)?;

    for name in basket.invalid() {
        println!("Product \"{name}\" is an invalid product as it is not in the product data.");
    }

    for name in basket.unavailable() {
        println!("Product \"{name}\" is unavailable for purchase.");
    }

    println!("Subtotal: {}", format_price(&receipt.subtotal()));

    if receipt.promotion_discounts().is_empty() {
        println!("(No offers available)");
    }

    for discount in receipt.promotion_discounts() {
        println!("{}: {}", discount.name, format_price(&discount.amount));
    }

    println!("Total price: {}", format_price(&receipt.total()));

    if args.table {
        println!("{}", receipt.to_table());
    }

    Ok(())
}
