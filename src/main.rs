use std::net::SocketAddr;
use std::time::Instant;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use runlet::config::{ExecPolicy, ServiceConfig};
use runlet::exec::{validate, ProcessSupervisor};
use runlet::server;
use runlet::server::response::translate;
use runlet::shutdown;

#[derive(Parser, Debug)]
#[command(name = "runlet")]
#[command(version)]
#[command(about = "Runs untrusted Python snippets in supervised interpreter processes")]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the HTTP execution server
    Serve(ServeArgs),

    /// Execute one snippet locally and print the result
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value = "8080")]
    port: u16,

    #[command(flatten)]
    policy: PolicyArgs,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// The snippet to execute (e.g. "print('hello')")
    code: String,

    #[command(flatten)]
    policy: PolicyArgs,
}

#[derive(Parser, Debug)]
struct PolicyArgs {
    /// Interpreter binary, resolved via PATH
    #[arg(long, default_value = "python3")]
    interpreter: String,

    /// Wall-clock deadline per execution, in milliseconds
    #[arg(long, default_value = "30000")]
    timeout_ms: u64,
}

impl PolicyArgs {
    fn into_policy(self) -> ExecPolicy {
        ExecPolicy::new(self.interpreter, self.timeout_ms)
    }
}

async fn run_server(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let listen_addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let config = ServiceConfig::new(listen_addr, args.policy.into_policy());

    tracing::info!(
        listen_addr = %config.listen_addr,
        interpreter = %config.policy.interpreter,
        timeout_ms = config.policy.timeout_ms,
        "Starting runlet"
    );

    let shutdown = shutdown::install_shutdown_handler();
    server::serve(config, shutdown).await?;

    Ok(())
}

async fn run_once(args: RunArgs) {
    let policy = args.policy.into_policy();

    let code = match validate(Some(&args.code)) {
        Ok(code) => code,
        Err(reason) => {
            eprintln!("Error: {}", reason.public_message());
            std::process::exit(1);
        }
    };

    let supervisor = ProcessSupervisor::new(policy);
    let cancel = CancellationToken::new();

    let started = Instant::now();
    let outcome = supervisor.run(Uuid::new_v4(), &code, &cancel).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let resp = translate(outcome, elapsed_ms, supervisor.policy());
    if resp.success {
        println!("{}", resp.output.unwrap_or_default());
    } else {
        eprintln!("Error: {}", resp.error.unwrap_or_default());
        std::process::exit(1);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    match args.command {
        Commands::Serve(serve_args) => {
            run_server(serve_args).await?;
        }
        Commands::Run(run_args) => {
            run_once(run_args).await;
        }
    }

    Ok(())
}
