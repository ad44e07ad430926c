//! CSV output for result series.

use crate::driver::ResultSeries;
use crate::error::SimError;
use crate::workload::RequestDistribution;
use serde::Serialize;
use std::io;
use std::path::Path;

/// Conventional file name for one series, e.g. `uniform_8.csv`.
pub fn series_file_name(distribution: RequestDistribution, processors: usize) -> String {
    format!("{}_{}.csv", distribution.name(), processors)
}

fn writer_builder(headers: bool) -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder.has_headers(headers).terminator(csv::Terminator::Any(b'\n'));
    builder
}

/// One value per line, no header.
pub fn write_series<W: io::Write>(series: &ResultSeries, writer: W) -> Result<(), SimError> {
    let mut wtr = writer_builder(false).from_writer(writer);
    for value in series.values() {
        wtr.serialize(value)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_series_file(series: &ResultSeries, path: impl AsRef<Path>) -> Result<(), SimError> {
    let file = std::fs::File::create(path)?;
    write_series(series, io::BufWriter::new(file))
}

#[derive(Debug, Serialize)]
struct DetailedRecord {
    modules: usize,
    avg_access_time: f64,
    converged: bool,
    cycles: u64,
    accesses: u64,
}

/// Header plus one row per module count with the run's outcome.
pub fn write_detailed<W: io::Write>(series: &ResultSeries, writer: W) -> Result<(), SimError> {
    let mut wtr = writer_builder(true).from_writer(writer);
    for (i, outcome) in series.outcomes().iter().enumerate() {
        wtr.serialize(DetailedRecord {
            modules: i + 1,
            avg_access_time: outcome.series_value(),
            converged: outcome.is_converged(),
            cycles: outcome.cycles(),
            accesses: outcome.accesses(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::RunOutcome;

    fn sample() -> ResultSeries {
        ResultSeries::from_outcomes(vec![
            RunOutcome::Converged {
                average: 2.5,
                cycles: 40,
                accesses: 90,
            },
            RunOutcome::Exhausted {
                cycles: 100,
                accesses: 300,
            },
        ])
    }

    #[test]
    fn file_names_follow_distribution() {
        assert_eq!(series_file_name(RequestDistribution::Uniform, 8), "uniform_8.csv");
        assert_eq!(series_file_name(RequestDistribution::Clustered, 64), "normal_64.csv");
    }

    #[test]
    fn plain_series_one_value_per_line() {
        let mut out = Vec::new();
        write_series(&sample(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2.5\n-1.0\n");
    }

    #[test]
    fn detailed_series_has_header() {
        let mut out = Vec::new();
        write_detailed(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "modules,avg_access_time,converged,cycles,accesses");
        assert_eq!(lines[1], "1,2.5,true,40,90");
        assert_eq!(lines[2], "2,-1.0,false,100,300");
    }
}
