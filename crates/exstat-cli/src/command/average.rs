use exstat::{Number, StatisticsError};

use crate::{input::InputArg, util::OutputArg};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DataArg {
    #[clap(flatten)]
    pub input: InputArg,
    #[clap(flatten)]
    pub output: OutputArg,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SumArg {
    #[clap(flatten)]
    data: DataArg,
    /// Value the sum starts from
    #[arg(long, default_value = "0")]
    start: String,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct MedianGroupedArg {
    #[clap(flatten)]
    data: DataArg,
    /// Width of the class interval centred on each value
    #[arg(long, default_value = "1")]
    interval: String,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ModeArg {
    #[clap(flatten)]
    data: DataArg,
    /// Compare raw tokens as strings instead of parsing numbers
    #[arg(long, default_value_t = false)]
    nominal: bool,
}

pub(crate) fn run_with(
    arg: &DataArg,
    statistic: fn(Vec<Number>) -> Result<Number, StatisticsError>,
) -> anyhow::Result<()> {
    let data = arg.input.read_numbers()?;
    arg.output.emit(&statistic(data)?)
}

pub(crate) fn run_sum(arg: &SumArg) -> anyhow::Result<()> {
    let SumArg { data, start } = arg;
    let start = data.input.parse_flag("start", start)?;
    let values = data.input.read_numbers()?;
    data.output.emit(&exstat::sum(values, start)?)
}

pub(crate) fn run_median_grouped(arg: &MedianGroupedArg) -> anyhow::Result<()> {
    let MedianGroupedArg { data, interval } = arg;
    let interval = data.input.parse_flag("interval", interval)?;
    let values = data.input.read_numbers()?;
    data.output.emit(&exstat::median_grouped(values, interval)?)
}

pub(crate) fn run_mode(arg: &ModeArg) -> anyhow::Result<()> {
    let ModeArg { data, nominal } = arg;
    if *nominal {
        let words = data.input.read_words()?;
        data.output.emit(&exstat::mode(words)?)
    } else {
        let values = data.input.read_numbers()?;
        data.output.emit(&exstat::numeric_mode(values)?)
    }
}
