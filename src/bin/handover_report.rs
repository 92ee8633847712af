use std::process::ExitCode;

use sim_charts::reports::{run, ReportKind};

fn main() -> ExitCode {
    sim_charts::init_logging();
    run(ReportKind::Handover)
}
