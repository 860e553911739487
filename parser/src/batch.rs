//! Parallel parsing of many captured outputs.
//!
//! A batch manifest lists `(kind, vrf, input file)` jobs. Jobs run on a
//! dedicated rayon pool and results come back in manifest order.
//!
//! # Example YAML
//!
//! ```yaml
//! jobs:
//!   - kind: rp-mapping
//!     input: r1/rp_mapping.txt
//!   - kind: bsr-router
//!     vrf: VRF1
//!     input: r1/bsr_router_vrf1.txt
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};

use pim_show_core::CommandKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigError, EngineConfig};
use crate::engine::ShowParser;
use crate::report::ParseRun;
use crate::source::SourceError;

/// Errors that abort a whole batch.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to create thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// One captured output to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchJob {
    pub kind: CommandKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vrf: Option<String>,
    /// File holding the raw device output.
    pub input: PathBuf,
}

/// A list of jobs, usually loaded from YAML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchManifest {
    pub jobs: Vec<BatchJob>,
}

impl BatchManifest {
    /// Loads a manifest, resolving relative inputs against the manifest's
    /// directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BatchError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let mut manifest: Self = serde_yaml::from_reader(BufReader::new(file))?;
        if let Some(base) = path.parent() {
            for job in &mut manifest.jobs {
                if job.input.is_relative() {
                    job.input = base.join(&job.input);
                }
            }
        }
        Ok(manifest)
    }
}

/// Result of one job.
#[derive(Debug)]
pub struct BatchOutcome {
    pub job: BatchJob,
    pub run: ParseRun,
}

/// Parses every job in parallel and returns outcomes in job order.
///
/// Per-job failures (unreadable input, empty output, missing keys) are
/// carried in each outcome; only pool or configuration problems abort the
/// batch.
pub fn parse_batch(jobs: &[BatchJob], config: &EngineConfig) -> Result<Vec<BatchOutcome>, BatchError> {
    use rayon::prelude::*;

    let parser = ShowParser::with_config(config)?;
    let threads = config
        .jobs
        .filter(|jobs| *jobs > 0)
        .unwrap_or_else(rayon::current_num_threads);
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    debug!(jobs = jobs.len(), threads, "Starting batch parse");

    let outcomes = pool.install(|| {
        jobs.par_iter()
            .map(|job| BatchOutcome {
                job: job.clone(),
                run: parse_job(&parser, job),
            })
            .collect()
    });
    Ok(outcomes)
}

fn parse_job(parser: &ShowParser, job: &BatchJob) -> ParseRun {
    let source = |_: &str| {
        std::fs::read_to_string(&job.input).map_err(|source| SourceError::Read {
            path: job.input.clone(),
            source,
        })
    };
    parser.parse_with_report(job.kind, &source, job.vrf.as_deref())
}
