use super::RunReport;

pub fn print_summary(report: &RunReport) {
    eprintln!(
        "{}: executed={} resumed={} propagated={} timeouts={} data_errors={}",
        report.config,
        report.executed,
        report.resumed,
        report.propagated,
        report.timeouts,
        report.data_errors
    );
}
