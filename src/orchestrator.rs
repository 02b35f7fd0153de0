//! Batch orchestrator.
//!
//! Discovers the run directories of a collection, partitions them
//! round-robin across a fixed number of workers and has every worker analyze
//! its runs in order, each run as an isolated process. A failed run is
//! logged and skipped; it never stops other runs or other workers.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{error, info, warn};

use crate::error::{AnalysisError, Result};

/// Result of analyzing one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded,
    /// The analysis ran and exited unsuccessfully (`None` if killed by a signal)
    Failed { exit_code: Option<i32> },
    /// The analysis could not be started at all
    SpawnFailed(String),
}

/// Performs the analysis of a single run directory
pub trait RunAnalyzer: Sync {
    fn analyze(&self, run_dir: &Path) -> RunOutcome;
}

/// Runs the per-run analysis entrypoint as a child process with inherited stdio
#[derive(Debug, Clone)]
pub struct SubprocessAnalyzer {
    entrypoint: PathBuf,
    extra_args: Vec<OsString>,
}

impl SubprocessAnalyzer {
    pub fn new(entrypoint: impl Into<PathBuf>) -> Self {
        Self {
            entrypoint: entrypoint.into(),
            extra_args: Vec::new(),
        }
    }

    /// Arguments passed after the run directory on every invocation
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl RunAnalyzer for SubprocessAnalyzer {
    fn analyze(&self, run_dir: &Path) -> RunOutcome {
        let status = Command::new(&self.entrypoint)
            .arg(run_dir)
            .args(&self.extra_args)
            .status();

        match status {
            Ok(status) if status.success() => RunOutcome::Succeeded,
            Ok(status) => RunOutcome::Failed {
                exit_code: status.code(),
            },
            Err(e) => RunOutcome::SpawnFailed(format!(
                "Failed to start {}: {}",
                self.entrypoint.display(),
                e
            )),
        }
    }
}

/// List the run directories of a collection, sorted by path.
///
/// The collection is scanned once; runs added later are not picked up.
pub fn discover_runs(collection_dir: &Path) -> Result<Vec<PathBuf>> {
    if !collection_dir.is_dir() {
        return Err(AnalysisError::Usage(format!(
            "The folder path does not exist: {}",
            collection_dir.display()
        )));
    }

    let mut runs = Vec::new();
    for entry in fs::read_dir(collection_dir).map_err(|e| AnalysisError::io(collection_dir, e))? {
        let entry = entry.map_err(|e| AnalysisError::io(collection_dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            runs.push(path);
        }
    }
    runs.sort();

    info!("Discovered {} runs in {}", runs.len(), collection_dir.display());
    Ok(runs)
}

/// Assign item `i` to worker `i % workers`, preserving order within each worker
pub fn partition_round_robin<T>(items: Vec<T>, workers: usize) -> Vec<Vec<T>> {
    let mut partitions: Vec<Vec<T>> = (0..workers).map(|_| Vec::new()).collect();
    if workers == 0 {
        return partitions;
    }
    for (index, item) in items.into_iter().enumerate() {
        partitions[index % workers].push(item);
    }
    partitions
}

/// Analyze one worker's queue strictly in order, printing progress after each run
fn run_worker<A: RunAnalyzer + ?Sized>(worker: usize, queue: &[PathBuf], analyzer: &A) {
    let total = queue.len();
    for (index, run_dir) in queue.iter().enumerate() {
        match analyzer.analyze(run_dir) {
            RunOutcome::Succeeded => {}
            RunOutcome::Failed { exit_code } => warn!(
                "Worker {}: analysis of {} failed (exit code {:?})",
                worker,
                run_dir.display(),
                exit_code
            ),
            RunOutcome::SpawnFailed(reason) => error!("Worker {}: {}", worker, reason),
        }
        println!("Progress {}/{} (worker {}: {})", index + 1, total, worker, run_dir.display());
    }
}

/// Dispatch pre-partitioned queues onto a pool of `queues.len()` threads and
/// wait until every queue is drained
pub fn dispatch<A: RunAnalyzer + ?Sized>(queues: &[Vec<PathBuf>], analyzer: &A) -> Result<()> {
    if queues.is_empty() {
        return Err(AnalysisError::Usage(
            "Number of workers must be at least 1".to_string(),
        ));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(queues.len())
        .thread_name(|i| format!("analysis-worker-{}", i))
        .build()?;

    pool.scope(|scope| {
        for (worker, queue) in queues.iter().enumerate() {
            scope.spawn(move |_| run_worker(worker, queue, analyzer));
        }
    });

    Ok(())
}

/// Discover, partition and analyze every run of a collection
pub fn run_batch<A: RunAnalyzer + ?Sized>(
    collection_dir: &Path,
    workers: usize,
    analyzer: &A,
) -> Result<()> {
    if workers == 0 {
        return Err(AnalysisError::Usage(
            "Number of workers must be at least 1".to_string(),
        ));
    }

    let runs = discover_runs(collection_dir)?;
    let total = runs.len();
    let queues = partition_round_robin(runs, workers);
    info!("Analyzing {} runs on {} workers", total, workers);

    dispatch(&queues, analyzer)?;

    info!("Batch analysis of {} finished", collection_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records the order in which runs were analyzed, failing runs named "bad*"
    struct Recorder {
        calls: Mutex<Vec<PathBuf>>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl RunAnalyzer for Recorder {
        fn analyze(&self, run_dir: &Path) -> RunOutcome {
            self.calls.lock().unwrap().push(run_dir.to_path_buf());
            let name = run_dir.file_name().unwrap().to_string_lossy();
            if name.starts_with("bad") {
                RunOutcome::Failed { exit_code: Some(1) }
            } else {
                RunOutcome::Succeeded
            }
        }
    }

    #[test]
    fn test_partition_round_robin() {
        let partitions = partition_round_robin((0..7).collect(), 3);
        assert_eq!(partitions, vec![vec![0, 3, 6], vec![1, 4], vec![2, 5]]);
    }

    #[test]
    fn test_partition_is_complete() {
        for workers in 1..6 {
            for runs in 0..12 {
                let partitions = partition_round_robin((0..runs).collect(), workers);
                assert_eq!(partitions.len(), workers);
                assert_eq!(partitions.iter().map(Vec::len).sum::<usize>(), runs);

                let mut all: Vec<usize> = partitions.into_iter().flatten().collect();
                all.sort();
                assert_eq!(all, (0..runs).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn test_more_workers_than_runs() {
        let partitions = partition_round_robin(vec!["a", "b"], 4);
        assert_eq!(partitions, vec![vec!["a"], vec!["b"], vec![], vec![]]);
    }

    #[test]
    fn test_discover_runs_ignores_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("run_b")).unwrap();
        fs::create_dir(dir.path().join("run_a")).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a run").unwrap();

        let runs = discover_runs(dir.path()).unwrap();
        assert_eq!(runs, vec![dir.path().join("run_a"), dir.path().join("run_b")]);
    }

    #[test]
    fn test_discover_missing_collection() {
        assert!(matches!(
            discover_runs(Path::new("/nonexistent/collection")),
            Err(AnalysisError::Usage(_))
        ));
    }

    #[test]
    fn test_failures_do_not_stop_the_batch() {
        let dir = TempDir::new().unwrap();
        for name in ["bad_0", "run_1", "bad_2", "run_3", "run_4"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }

        let recorder = Recorder::new();
        run_batch(dir.path(), 2, &recorder).unwrap();

        let calls = recorder.calls.into_inner().unwrap();
        assert_eq!(calls.len(), 5);
    }

    #[test]
    fn test_each_worker_keeps_assignment_order() {
        let dir = TempDir::new().unwrap();
        for i in 0..9 {
            fs::create_dir(dir.path().join(format!("run_{}", i))).unwrap();
        }
        let queues = partition_round_robin(discover_runs(dir.path()).unwrap(), 3);

        let recorder = Recorder::new();
        dispatch(&queues, &recorder).unwrap();
        let calls = recorder.calls.into_inner().unwrap();

        assert_eq!(calls.len(), 9);
        for queue in &queues {
            let positions: Vec<usize> = queue
                .iter()
                .map(|run| calls.iter().position(|r| r == run).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_zero_workers_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            run_batch(dir.path(), 0, &Recorder::new()),
            Err(AnalysisError::Usage(_))
        ));
    }

    #[test]
    fn test_spawn_failure_is_reported() {
        let analyzer = SubprocessAnalyzer::new("/nonexistent/floodns-analyze");
        assert!(matches!(
            analyzer.analyze(Path::new(".")),
            RunOutcome::SpawnFailed(_)
        ));
    }
}
