use clap::Parser;
use pal_infrastructure::tracing::init_tracing;
use std::process::{ExitCode, Termination};

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Run the web server (the default)
    Serve(pal_server::Run),
}

#[derive(clap::Parser, Debug)]
#[command(
    author,
    version = env!("CARGO_PKG_VERSION"),
    about = "pald",
    long_about = None,
    args_conflicts_with_subcommands = true
)]
pub struct Pald {
    #[command(subcommand)]
    pub(crate) command: Option<Command>,

    #[command(flatten)]
    pub run: pal_server::Run,
}

impl Pald {
    async fn run(self) -> ExitCode {
        match self.run_command().await {
            Ok(code) => code,
            Err(err) => {
                log::error!("Error: {err}");
                for (n, err) in err.chain().skip(1).enumerate() {
                    if n == 0 {
                        log::error!("Caused by:");
                    }
                    log::error!("\t{err}");
                }

                ExitCode::FAILURE
            }
        }
    }

    async fn run_command(self) -> anyhow::Result<ExitCode> {
        let run = match self.command {
            Some(Command::Serve(run)) => run,
            None => self.run,
        };

        run.run().await
    }
}

#[actix_web::main]
async fn main() -> impl Termination {
    init_tracing();
    Pald::parse().run().await
}
