use holder_core::{run_holder_macro, HolderConfig, MemoryHost, MeshKernel, COMPLETION_MESSAGES};
use std::process::ExitCode;
use tracing::{debug, error, info};

fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only the completion lines.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let kernel = MeshKernel::default();
    let mut host = MemoryHost::headless(&kernel);
    let config = HolderConfig::default();
    info!(version = holder_core::version(), segments = kernel.segments, "building HEPA filter holder");

    let report = match run_holder_macro(&mut host, &kernel, &config) {
        Ok(report) => report,
        Err(e) => {
            error!("holder macro failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(snapshot) = host.snapshot() {
        match snapshot.to_json() {
            Ok(json) => debug!("document snapshot:\n{}", json),
            Err(e) => debug!("could not serialise snapshot: {}", e),
        }
    }

    debug!(object = %report.object, document = ?report.document, "holder placed");
    for line in COMPLETION_MESSAGES {
        println!("{}", line);
    }
    ExitCode::SUCCESS
}
