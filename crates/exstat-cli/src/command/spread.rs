use exstat::{MadScale, MedianRule, Number, StatisticsError};

use super::average::DataArg;

type Spread = fn(Vec<Number>, Option<Number>) -> Result<Number, StatisticsError>;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PopulationArg {
    #[clap(flatten)]
    data: DataArg,
    /// Known population mean (computed from the data when omitted)
    #[arg(long)]
    mu: Option<String>,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SampleArg {
    #[clap(flatten)]
    data: DataArg,
    /// Known sample mean (computed from the data when omitted)
    #[arg(long)]
    xbar: Option<String>,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct MadArg {
    #[clap(flatten)]
    data: DataArg,
    /// Center of the deviations (the median of the data when omitted)
    #[arg(long)]
    center: Option<String>,
    /// Middle value used by both medians for even counts: average, low or high
    #[arg(long, default_value = "average")]
    rule: MedianRule,
    /// Scale factor: none, normal, uniform or a number
    #[arg(long, default_value = "none")]
    scale: MadScale,
}

pub(crate) fn run_population(arg: &PopulationArg, statistic: Spread) -> anyhow::Result<()> {
    run(&arg.data, "mu", arg.mu.as_deref(), statistic)
}

pub(crate) fn run_sample(arg: &SampleArg, statistic: Spread) -> anyhow::Result<()> {
    run(&arg.data, "xbar", arg.xbar.as_deref(), statistic)
}

fn run(data: &DataArg, name: &str, center: Option<&str>, statistic: Spread) -> anyhow::Result<()> {
    let center = data.input.parse_option(name, center)?;
    let values = data.input.read_numbers()?;
    data.output.emit(&statistic(values, center)?)
}

pub(crate) fn run_mad(arg: &MadArg) -> anyhow::Result<()> {
    let MadArg {
        data,
        center,
        rule,
        scale,
    } = arg;
    let center = data.input.parse_option("center", center.as_deref())?;
    let values = data.input.read_numbers()?;
    data.output
        .emit(&exstat::mad(values, center, *rule, scale.clone())?)
}
