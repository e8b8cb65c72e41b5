use std::fmt;

use exstat::{FiveNumber, QuartileScheme, Quartiles};

use super::average::DataArg;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct QuartilesArg {
    #[clap(flatten)]
    data: DataArg,
    /// Quartile convention: inclusive (tukey, hinges), exclusive (m&m, ti-85),
    /// m&s or minitab
    #[arg(long, default_value = "inclusive")]
    scheme: QuartileScheme,
    /// Also print the interquartile range
    #[arg(long, default_value_t = false)]
    iqr: bool,
}

#[derive(Debug, serde::Serialize)]
struct QuartilesReport {
    scheme: String,
    #[serde(flatten)]
    quartiles: Quartiles,
    #[serde(skip_serializing_if = "Option::is_none")]
    iqr: Option<exstat::Number>,
}

impl fmt::Display for QuartilesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Quartiles { q1, q2, q3 } = &self.quartiles;
        write!(f, "{q1}\t{q2}\t{q3}")?;
        if let Some(iqr) = &self.iqr {
            write!(f, "\t{iqr}")?;
        }
        Ok(())
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(transparent)]
struct FiveNumberReport(FiveNumber);

impl fmt::Display for FiveNumberReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let FiveNumber {
            minimum,
            lower_hinge,
            median,
            upper_hinge,
            maximum,
        } = &self.0;
        write!(
            f,
            "{minimum}\t{lower_hinge}\t{median}\t{upper_hinge}\t{maximum}"
        )
    }
}

pub(crate) fn run_fivenum(arg: &DataArg) -> anyhow::Result<()> {
    let data = arg.input.read_numbers()?;
    arg.output.emit(&FiveNumberReport(exstat::fivenum(data)?))
}

pub(crate) fn run(arg: &QuartilesArg) -> anyhow::Result<()> {
    let data = arg.data.input.read_numbers()?;
    let quartiles = exstat::quartiles(data, arg.scheme)?;
    let iqr = arg.iqr.then(|| quartiles.range()).transpose()?;
    arg.data.output.emit(&QuartilesReport {
        scheme: arg.scheme.to_string(),
        quartiles,
        iqr,
    })
}
