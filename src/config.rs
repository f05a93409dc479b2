use crate::parallel::ExecutionPolicy;

/// Configuration for the [`KMeans`](crate::KMeans) runner
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Maximum number of assignment/update iterations
    pub max_iters: usize,

    /// How the phases of each iteration are scheduled.
    /// `Sequential` runs the plain single-threaded kernel.
    pub execution: ExecutionPolicy,

    /// Size of a fresh thread pool built for `Parallel` runs.
    /// Ignored for `Sequential` and when `execution` already carries a `Pool`;
    /// `None` keeps rayon's global pool.
    pub num_threads: Option<usize>,

    /// Log a summary of every run at `info` level
    pub verbose: bool,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            max_iters: 300,
            execution: ExecutionPolicy::Parallel,
            num_threads: None,
            verbose: false,
        }
    }
}

impl KMeansConfig {
    /// Create a new configuration with the specified iteration budget
    pub fn new(max_iters: usize) -> Self {
        Self {
            max_iters,
            ..Default::default()
        }
    }

    /// Set the maximum number of iterations
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the execution policy
    pub fn with_execution(mut self, execution: ExecutionPolicy) -> Self {
        self.execution = execution;
        self
    }

    /// Run on the calling thread only
    pub fn sequential(self) -> Self {
        self.with_execution(ExecutionPolicy::Sequential)
    }

    /// Set the number of worker threads for parallel runs
    pub fn with_num_threads(mut self, num_threads: Option<usize>) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Set verbose mode
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
