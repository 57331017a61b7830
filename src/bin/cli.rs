//! compdir CLI Client
//!
//! Command-line interface for interacting with a compdir server.

use clap::{Args, Parser, Subcommand};
use compdir::network::Client;
use compdir::protocol::KeySelector;
use compdir::{Company, DirError};

/// compdir CLI
#[derive(Parser, Debug)]
#[command(name = "compdir-cli")]
#[command(about = "CLI for the compdir company directory")]
struct Cli {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every company
    List,

    /// Show one company
    Get(Selector),

    /// Add a company, or update the one with the same tax id
    Add {
        /// 12-digit tax id
        tax_id: String,

        /// Company name
        name: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, default_value = "")]
        address: String,

        #[arg(long, default_value = "")]
        representative: String,
    },

    /// Delete a company
    Del(Selector),

    /// Ping the server
    Ping,
}

#[derive(Args, Debug)]
struct Selector {
    /// Tax id of the company
    #[arg(long, required_unless_present = "name")]
    tax_id: Option<String>,

    /// Name of the company (used when no tax id is given)
    #[arg(long)]
    name: Option<String>,
}

impl From<Selector> for KeySelector {
    fn from(s: Selector) -> Self {
        KeySelector {
            tax_id: s.tax_id,
            name: s.name,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        let code = if e.is_client_error() { 2 } else { 1 };
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<(), DirError> {
    let mut client = Client::connect(&cli.server)?;

    match cli.command {
        Commands::List => {
            for company in client.list()? {
                print_company(&company);
            }
        }
        Commands::Get(selector) => print_company(&client.get(selector.into())?),
        Commands::Add {
            tax_id,
            name,
            phone,
            address,
            representative,
        } => {
            client.add(Company::new(tax_id, name, phone, address, representative))?;
            println!("OK");
        }
        Commands::Del(selector) => {
            client.delete(selector.into())?;
            println!("OK");
        }
        Commands::Ping => {
            client.ping()?;
            println!("PONG");
        }
    }

    Ok(())
}

fn print_company(c: &Company) {
    println!(
        "{}\t{}\t{}\t{}\t{}",
        c.tax_id, c.name, c.phone, c.address, c.representative
    );
}
