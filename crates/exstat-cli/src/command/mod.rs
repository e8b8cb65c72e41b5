use clap::{Parser, Subcommand};

use self::{
    average::{DataArg, MedianGroupedArg, ModeArg, SumArg},
    quartiles::QuartilesArg,
    spread::{MadArg, PopulationArg, SampleArg},
    summary::SummaryArg,
};

mod average;
mod quartiles;
mod spread;
mod summary;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Statistic to compute
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Print every summary statistic at once
    Summary(#[clap(flatten)] SummaryArg),
    /// High-precision sum of the data
    Sum(#[clap(flatten)] SumArg),
    /// Arithmetic mean
    Mean(#[clap(flatten)] DataArg),
    /// Median, averaging the middle two values for even counts
    Median(#[clap(flatten)] DataArg),
    /// Lower of the two middle values
    MedianLow(#[clap(flatten)] DataArg),
    /// Higher of the two middle values
    MedianHigh(#[clap(flatten)] DataArg),
    /// Median of data grouped into class intervals
    MedianGrouped(#[clap(flatten)] MedianGroupedArg),
    /// Single most common value
    Mode(#[clap(flatten)] ModeArg),
    /// Population variance
    Pvariance(#[clap(flatten)] PopulationArg),
    /// Sample variance
    Variance(#[clap(flatten)] SampleArg),
    /// Population standard deviation
    Pstdev(#[clap(flatten)] PopulationArg),
    /// Sample standard deviation
    Stdev(#[clap(flatten)] SampleArg),
    /// Median absolute deviation
    Mad(#[clap(flatten)] MadArg),
    /// Largest value minus the smallest
    Range(#[clap(flatten)] DataArg),
    /// First, second and third quartiles
    Quartiles(#[clap(flatten)] QuartilesArg),
    /// Mean of the lower and upper hinges
    Midhinge(#[clap(flatten)] DataArg),
    /// Tukey's trimean of the hinges and the median
    Trimean(#[clap(flatten)] DataArg),
    /// Minimum, lower hinge, median, upper hinge and maximum
    Fivenum(#[clap(flatten)] DataArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Summary(SummaryArg::default())) {
        Mode::Summary(arg) => summary::run(&arg)?,
        Mode::Sum(arg) => average::run_sum(&arg)?,
        Mode::Mean(arg) => average::run_with(&arg, exstat::mean)?,
        Mode::Median(arg) => average::run_with(&arg, exstat::median)?,
        Mode::MedianLow(arg) => average::run_with(&arg, exstat::median_low)?,
        Mode::MedianHigh(arg) => average::run_with(&arg, exstat::median_high)?,
        Mode::MedianGrouped(arg) => average::run_median_grouped(&arg)?,
        Mode::Mode(arg) => average::run_mode(&arg)?,
        Mode::Pvariance(arg) => spread::run_population(&arg, exstat::pvariance)?,
        Mode::Variance(arg) => spread::run_sample(&arg, exstat::variance)?,
        Mode::Pstdev(arg) => spread::run_population(&arg, exstat::pstdev)?,
        Mode::Stdev(arg) => spread::run_sample(&arg, exstat::stdev)?,
        Mode::Mad(arg) => spread::run_mad(&arg)?,
        Mode::Range(arg) => average::run_with(&arg, exstat::range)?,
        Mode::Quartiles(arg) => quartiles::run(&arg)?,
        Mode::Midhinge(arg) => average::run_with(&arg, exstat::midhinge)?,
        Mode::Trimean(arg) => average::run_with(&arg, exstat::trimean)?,
        Mode::Fivenum(arg) => quartiles::run_fivenum(&arg)?,
    }
    Ok(())
}
