use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, info};

use crate::config::ModelRegistry;
use crate::fetch::HttpDownloader;
use crate::serve::ServeRequest;
use crate::system::ForegroundRunner;

mod config;
mod error;
mod fetch;
mod render;
mod serve;
mod slurm;
mod system;

/// Prepare and submit the SLURM job that serves a together model
#[derive(Debug, Parser)]
#[command(name = "together-node", version, about)]
struct Args {
    /// Model to serve, resolved against the model registry
    #[arg(long)]
    model: String,

    /// SLURM partition to submit to
    #[arg(long)]
    queue: Option<String>,

    /// Home directory, holds the hf cache
    #[arg(long)]
    home_dir: PathBuf,

    /// Data directory, holds weights, images, logs and scripts
    #[arg(long)]
    data_dir: PathBuf,

    /// Run the model under docker
    #[arg(long)]
    docker: bool,

    /// Run the model under singularity
    #[arg(long)]
    singularity: bool,

    /// Environment modules to load before the run command
    #[arg(long)]
    modules: Option<String>,

    /// Gpu request, passed through verbatim to the --gpus directive
    #[arg(long, default_value = "")]
    gpus: String,

    /// Account to bill the job to
    #[arg(long)]
    account: Option<String>,

    /// Port the model server listens on
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Command the job runs after setup
    #[arg(long, default_value = "")]
    run_command: String,

    /// JSON model registry to use instead of the bundled one
    #[arg(long)]
    models_file: Option<PathBuf>,

    /// Submit the written script with sbatch
    #[arg(long)]
    submit: bool,
}

fn main() {
    env_logger::init();
    info!("starting up :)");

    let args = Args::parse();
    let registry = match &args.models_file {
        Some(path) => match ModelRegistry::from_file(path) {
            Ok(registry) => registry,
            Err(err) => {
                error!("{err:#}");
                process::exit(1);
            }
        },
        None => ModelRegistry::bundled(),
    };

    let request = ServeRequest {
        model_name: args.model,
        queue_name: args.queue,
        home_dir: args.home_dir,
        data_dir: args.data_dir,
        use_docker: args.docker,
        use_singularity: args.singularity,
        modules: args.modules,
        gpus: args.gpus,
        account: args.account,
        port: args.port,
        run_command: args.run_command,
        submit: args.submit,
    };

    if let Err(err) = serve::serve_model(&request, &registry, &HttpDownloader::new(), &ForegroundRunner) {
        error!("{err}");
        process::exit(1);
    }
}
