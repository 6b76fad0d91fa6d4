/// Configuration for the bundled dispatch simulator.
///
/// These knobs belong to the driver, not the core: the balancer itself takes
/// only a worker count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Number of workers in the pool.
    pub workers: usize,
    /// Number of simulated dispatch events to generate.
    pub requests: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            requests: 100,
        }
    }
}

impl SimConfig {
    pub fn new(workers: usize, requests: usize) -> Self {
        Self { workers, requests }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_requests(mut self, requests: usize) -> Self {
        self.requests = requests;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_config_default() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.workers, 5);
        assert_eq!(cfg.requests, 100);
    }

    #[test]
    fn sim_config_builders() {
        let cfg = SimConfig::default().with_workers(8).with_requests(250);
        assert_eq!(cfg.workers, 8);
        assert_eq!(cfg.requests, 250);
    }

    #[test]
    fn sim_config_new() {
        let cfg = SimConfig::new(3, 30);
        assert_eq!(cfg, SimConfig::default().with_workers(3).with_requests(30));
    }
}
