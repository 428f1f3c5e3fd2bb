use std::path::Path;

/// Insertion-ordered set of #SBATCH directives.
///
/// Line order in the rendered header is exactly insertion order, so two
/// identical job specifications always render identical headers.
#[derive(Debug)]
pub struct DirectiveSet {
    directives: Vec<(&'static str, String)>,
}

impl DirectiveSet {
    fn new() -> Self {
        Self {
            directives: Vec::new(),
        }
    }

    fn push(&mut self, key: &'static str, value: impl Into<String>) {
        self.directives.push((key, value.into()));
    }

    /// One `#SBATCH --key=value` line per directive
    pub fn render(&self) -> String {
        let mut header = String::new();
        for (key, value) in &self.directives {
            header.push_str(&format!("#SBATCH --{key}={value}\n"));
        }
        header
    }
}

/// Directives for the job serving one model: a fixed base block, then
/// account and partition when supplied and non-empty.
///
/// The gpu request is passed through verbatim, so an empty request still
/// emits `--gpus=`. The `%j` in the log paths is expanded by SLURM at
/// run time, not here. Nothing is validated at this layer.
pub fn generate_header(
    model_name: &str,
    data_dir: &Path,
    gpus: &str,
    account: Option<&str>,
    queue_name: Option<&str>,
) -> DirectiveSet {
    let mut directives = DirectiveSet::new();
    directives.push("job-name", format!("together-{model_name}"));
    directives.push("time", "1:00:00");
    directives.push("ntasks", "1");
    directives.push("cpus-per-task", "4");
    directives.push("mem-per-cpu", "8G");
    directives.push(
        "output",
        format!("{}/logs/together-{model_name}-%j.out", data_dir.display()),
    );
    directives.push(
        "error",
        format!("{}/logs/together-{model_name}-%j.err", data_dir.display()),
    );
    directives.push("gpus", gpus);

    if let Some(account) = account.filter(|account| !account.is_empty()) {
        directives.push("account", account);
    }
    if let Some(queue_name) = queue_name.filter(|queue_name| !queue_name.is_empty()) {
        directives.push("partition", queue_name);
    }

    directives
}
