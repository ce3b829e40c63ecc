use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use emi::api::{CalcArgs, build_emi_response, build_inputs, run_http_server};

#[derive(Parser, Debug)]
#[command(name = "emi", about = "Loan EMI calculator (monthly installment, total interest, payable)")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the calculator page and its JSON API
    Serve {
        #[arg(long, env = "EMI_PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Evaluate one set of inputs and print the result
    Calc(CalcArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("emi=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match Cli::parse().command {
        Command::Serve { port } => {
            if let Err(e) = run_http_server(port).await {
                tracing::error!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Calc(args) => {
            let raw = match build_inputs(&args) {
                Ok(raw) => raw,
                Err(e) => {
                    eprintln!("Invalid input: {e}");
                    std::process::exit(2);
                }
            };
            let response = build_emi_response(&raw);
            if args.json {
                match serde_json::to_string_pretty(&response) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("Failed to serialize result: {e}");
                        std::process::exit(1);
                    }
                }
                return;
            }

            let display = &response.display;
            println!("Monthly EMI           ₹{}", display.periodic_payment);
            println!("Principal amount      ₹{}", display.principal);
            println!("Total interest        ₹{}", display.total_interest);
            println!("Total amount payable  ₹{}", display.total_payable);
            println!(
                "Principal {}% / Interest {}%",
                display.principal_share, display.interest_share
            );
        }
    }
}
