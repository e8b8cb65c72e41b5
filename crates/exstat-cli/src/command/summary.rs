use std::fmt;

use exstat::{Number, Summary};

use super::average::DataArg;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SummaryArg {
    #[clap(flatten)]
    data: DataArg,
}

#[derive(Debug, serde::Serialize)]
#[serde(transparent)]
struct SummaryReport(Summary);

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn row(f: &mut fmt::Formatter<'_>, label: &str, value: Option<&Number>) -> fmt::Result {
            match value {
                Some(value) => writeln!(f, "{label:<12}{value}"),
                None => writeln!(f, "{label:<12}-"),
            }
        }

        let s = &self.0;
        writeln!(f, "{:<12}{}", "count", s.count)?;
        row(f, "min", Some(&s.min))?;
        row(f, "max", Some(&s.max))?;
        row(f, "mean", Some(&s.mean))?;
        row(f, "median", Some(&s.median))?;
        row(f, "median_low", Some(&s.median_low))?;
        row(f, "median_high", Some(&s.median_high))?;
        row(f, "pvariance", Some(&s.pvariance))?;
        row(f, "pstdev", Some(&s.pstdev))?;
        row(f, "variance", s.variance.as_ref())?;
        row(f, "stdev", s.stdev.as_ref())?;
        let quartiles = s.quartiles.as_ref();
        row(f, "q1", quartiles.map(|q| &q.q1))?;
        row(f, "q3", quartiles.map(|q| &q.q3))?;
        write!(f, "{:<12}{}", "kind", s.mean.kind())
    }
}

pub(crate) fn run(arg: &SummaryArg) -> anyhow::Result<()> {
    let data = arg.data.input.read_numbers()?;
    eprintln!("Read {} values", data.len());
    let summary = Summary::new(data)?;
    arg.data.output.emit(&SummaryReport(summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_report() {
        let report = SummaryReport(Summary::new([1, 2, 4]).unwrap());
        let text = report.to_string();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "count       3");
        assert_eq!(lines[3], "mean        7/3");
        assert_eq!(lines[5], "median_low  2");
        assert_eq!(lines[11], "q1          3/2");
        assert_eq!(lines.last(), Some(&"kind        rational"));
    }

    #[test]
    fn test_missing_sample_statistics_print_dash() {
        let report = SummaryReport(Summary::new([7]).unwrap());
        let text = report.to_string();
        assert!(text.contains("variance    -"), "{text}");
        assert!(text.contains("q1          -"), "{text}");
    }

    #[test]
    fn test_json_report_is_flat() {
        let report = SummaryReport(Summary::new([1, 2, 4]).unwrap());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["count"], 3);
        assert_eq!(json["median_high"], 2);
    }
}
