use clap::Parser;
use electrolyte_design_lib::{run, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("error: {e}");
            if let Some(details) = &e.details {
                eprintln!("  {details}");
            }
            std::process::exit(1);
        }
    }
}
