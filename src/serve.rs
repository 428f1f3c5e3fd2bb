//! End-to-end preparation of one model's SLURM submission

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::config::ModelRegistry;
use crate::error::SubmitError;
use crate::fetch::Downloader;
use crate::slurm::script;
use crate::system::CommandRunner;

/// Subdirectories expected under the data directory
const DATA_SUBDIRS: [&str; 4] = ["weights", "scratch", "images", "logs"];
/// Subdirectories expected under the home directory
const HOME_SUBDIRS: [&str; 1] = ["hf"];

/// Container runtime used to execute the served model
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContainerRuntime {
    Docker,
    Singularity,
}

impl ContainerRuntime {
    /// Exactly one runtime must be requested; both and neither are fatal
    /// for the submission.
    pub fn from_flags(use_docker: bool, use_singularity: bool) -> Result<Self, SubmitError> {
        match (use_docker, use_singularity) {
            (true, true) => Err(SubmitError::BothRuntimes),
            (false, false) => Err(SubmitError::NoRuntime),
            (true, false) => Ok(ContainerRuntime::Docker),
            (false, true) => Ok(ContainerRuntime::Singularity),
        }
    }
}

impl fmt::Display for ContainerRuntime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ContainerRuntime::Docker => write!(f, "Docker"),
            ContainerRuntime::Singularity => write!(f, "Singularity"),
        }
    }
}

/// Everything a caller supplies for one submission.
///
/// Built once per call and read afterwards, never mutated.
#[derive(Debug, Clone)]
pub struct ServeRequest {
    pub model_name: String,
    pub queue_name: Option<String>,
    pub home_dir: PathBuf,
    pub data_dir: PathBuf,
    pub use_docker: bool,
    pub use_singularity: bool,
    pub modules: Option<String>,
    pub gpus: String,
    pub account: Option<String>,
    pub port: u16,
    pub run_command: String,
    pub submit: bool,
}

/// Prepare the job that serves one model: directory layout, container
/// runtime validation, artifact downloads, script composition and write,
/// and sbatch dispatch when requested.
pub fn serve_model(
    request: &ServeRequest,
    registry: &ModelRegistry,
    downloader: &dyn Downloader,
    runner: &dyn CommandRunner,
) -> Result<(), SubmitError> {
    ensure_layout(&request.data_dir, &request.home_dir)?;

    let runtime = ContainerRuntime::from_flags(request.use_docker, request.use_singularity)?;
    info!("Containerization: {runtime}");
    info!("Model server will listen on port {}", request.port);

    if runtime == ContainerRuntime::Singularity {
        download_model_and_weights(
            &request.model_name,
            &request.data_dir,
            registry,
            downloader,
            runner,
        )?;
    }

    let script = script::generate_submission_script(
        &request.model_name,
        &request.data_dir,
        request.modules.as_deref(),
        request.account.as_deref(),
        &request.gpus,
        request.queue_name.as_deref(),
        &request.run_command,
    )?;

    let scripts_dir = request.data_dir.join("scripts");
    fs::create_dir_all(&scripts_dir)?;
    let script_path = scripts_dir.join(format!("{}.slurm", request.model_name));
    info!("Writing submission script to {}", script_path.display());
    fs::write(&script_path, &script)?;

    if request.submit {
        let job_id = submit_script(&script_path, runner)?;
        info!("SLURM job id: {job_id}");
    }

    Ok(())
}

/// Create any missing data and home subdirectories. Safe to repeat.
fn ensure_layout(data_dir: &Path, home_dir: &Path) -> Result<(), SubmitError> {
    for subdir in DATA_SUBDIRS {
        fs::create_dir_all(data_dir.join(subdir))?;
    }
    for subdir in HOME_SUBDIRS {
        fs::create_dir_all(home_dir.join(subdir))?;
    }
    Ok(())
}

/// Fetch the singularity image, and the model weights unless a weights
/// directory for this model already exists.
///
/// An existing weights directory is trusted as-is; its contents are not
/// re-checked. Two submissions for the same model racing on the weights
/// directory are not guarded against.
fn download_model_and_weights(
    model_name: &str,
    data_dir: &Path,
    registry: &ModelRegistry,
    downloader: &dyn Downloader,
    runner: &dyn CommandRunner,
) -> Result<(), SubmitError> {
    let model_config = registry
        .lookup(model_name)
        .ok_or_else(|| SubmitError::UnknownModel(model_name.to_string()))?;

    let images_dir = data_dir.join("images");
    fs::create_dir_all(&images_dir)?;
    downloader.fetch(&model_config.singularity_image_url, &images_dir)?;

    let weights_dir = data_dir.join("weights").join(model_name);
    if weights_dir.exists() {
        info!(
            "Weights already exist at {}, skipping download",
            weights_dir.display()
        );
        return Ok(());
    }

    fs::create_dir_all(&weights_dir)?;
    let archive = downloader.fetch(&model_config.weights_url, &weights_dir)?;
    info!("Decompressing the weights to {}...", weights_dir.display());
    runner.run(&format!(
        "tar -xf {} -C {}",
        archive.display(),
        weights_dir.display()
    ))?;
    fs::remove_file(&archive)?;

    Ok(())
}

/// Hand the written script to sbatch and return the job id it reports
fn submit_script(script_path: &Path, runner: &dyn CommandRunner) -> Result<String, SubmitError> {
    let output = runner.run(&format!("sbatch --parsable {}", script_path.display()))?;
    Ok(output.stdout.trim().to_string())
}
