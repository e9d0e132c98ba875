use std::env;
use std::io;
use std::process;

use clap::Parser;
use log::info;

use sgemm_layout_bench::blas::{DefaultKernel, Sgemm};
use sgemm_layout_bench::cli::{execute, BenchArgs};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // --help and --version exit here; every other argument is accepted
    let args = BenchArgs::parse();
    let program = env::args()
        .next()
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

    let kernel = DefaultKernel::new();
    info!("backend {}", kernel.name());

    let stdout = io::stdout();
    if let Err(err) = execute(&kernel, &program, &args, &mut stdout.lock()) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}
