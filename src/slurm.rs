//! Build SLURM submission scripts

/// Ordered #SBATCH directive block derived from job parameters
pub mod header;

/// Assemble the final submission script text
pub mod script;
