use clap::Parser;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use winfreq::cli_main::{Cli, Commands};
use winfreq::config::RunConfig;
use winfreq::pipeline;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: tracing subscriber already set");
    }

    match cli.command {
        Commands::Count(args) => {
            let result = RunConfig::from_args(&args).and_then(|config| {
                info!("Counting windows of {}", config.input.display());
                pipeline::run(&config)
            });
            match result {
                Ok(summary) => {
                    println!("Elapsed time: {:.3} seconds", summary.elapsed_secs);
                    println!("Memory used: {} KB", summary.peak_rss_kb);
                    println!("Backend: {}", summary.backend);
                    println!("Cores used: {}", summary.core_hint);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(e.exit_code());
                }
            }
        }

        Commands::Devices => {
            match winfreq::gpu::get_gpu_info() {
                Some(info) => print!("{}", info),
                None => println!("No OpenCL devices found (or built without --features gpu)"),
            }
            println!("GPU available: {}", winfreq::gpu::is_gpu_available());
        }
    }
}
