use std::path::Path;

use crate::render::{render, TemplateError};
use crate::slurm::header;

/// included submission script template
static SUBMIT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/submit.txt"));

/// Render the complete submission script: directive header, module setup
/// line, then the run command.
///
/// The run command is substituted verbatim in the same single rendering
/// pass as the header and is never inspected or escaped, so a command
/// containing a literal `{{...}}` token ends up in the script untouched.
/// An empty run command produces a syntactically valid no-op script.
pub fn generate_submission_script(
    model_name: &str,
    data_dir: &Path,
    modules: Option<&str>,
    account: Option<&str>,
    gpus: &str,
    queue_name: Option<&str>,
    run_command: &str,
) -> Result<String, TemplateError> {
    let head = header::generate_header(model_name, data_dir, gpus, account, queue_name).render();
    let modules_line = match modules.filter(|modules| !modules.is_empty()) {
        Some(modules) => format!("module load {modules}"),
        None => String::new(),
    };

    render(
        SUBMIT,
        &[
            ("slurm_head", head.as_str()),
            ("modules", modules_line.as_str()),
            ("command", run_command),
        ],
    )
}
