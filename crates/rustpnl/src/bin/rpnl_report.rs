//! rpnl-report - Generate P&L reports from journal entry exports.
//!
//! Thin wrapper around [`rustpnl::cmd::report_cmd`].

fn main() -> std::process::ExitCode {
    rustpnl::cmd::report_cmd::main()
}
