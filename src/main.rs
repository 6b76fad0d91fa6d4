use clap::Parser;
use tracing_subscriber::EnvFilter;

use dispatch_lite::balancer::Balancer;
use dispatch_lite::config::SimConfig;
use dispatch_lite::error::DispatchError;

#[derive(Parser, Debug)]
#[command(name = "dispatch-lite")]
#[command(version)]
#[command(about = "Simulates load-aware job dispatch over a worker pool")]
struct Args {
    /// Number of workers in the pool
    #[arg(long, short = 'w', default_value = "5")]
    workers: usize,

    /// Number of simulated dispatch events
    #[arg(long, short = 'r', default_value = "100")]
    requests: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = SimConfig::new(args.workers, args.requests);
    tracing::info!(workers = config.workers, requests = config.requests, "starting simulation");

    let mut balancer = Balancer::new(config.workers);

    simulate_dispatch(&mut balancer, config.requests);
    simulate_completion(&mut balancer);
}

/// Feeds `requests` units of work into the pool, printing the per-worker
/// pending counts after every event.
fn simulate_dispatch(balancer: &mut Balancer, requests: usize) {
    for _ in 0..requests {
        match balancer.dispatch() {
            Ok(_) => print_loads(balancer),
            Err(err) => {
                tracing::error!(%err, "dispatch failed");
                return;
            }
        }
    }
}

/// Drains the pool back to idle, one completion at a time, sweeping the
/// workers round-robin in id order.
fn simulate_completion(balancer: &mut Balancer) {
    while balancer.total_pending() > 0 {
        for worker in balancer.snapshot() {
            match balancer.complete(worker.id) {
                Ok(()) => print_loads(balancer),
                // A worker that is already idle this sweep is fine to skip.
                Err(DispatchError::WorkerIdle(_)) => continue,
                Err(err) => {
                    tracing::error!(%err, "completion failed");
                    return;
                }
            }
        }
    }
}

/// Prints each worker's pending count and the pool mean on one line.
fn print_loads(balancer: &Balancer) {
    let view = balancer.snapshot();
    let mut line = String::new();
    let mut sum = 0u64;
    for worker in &view {
        line.push_str(&format!("{:3}", worker.pending));
        sum += worker.pending;
    }
    let avg = sum as f64 / view.len() as f64;
    println!("{line}   {avg:.2}");
}
