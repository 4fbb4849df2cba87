use std::path;
use std::process;

use bytesize::ByteSize;
use clap::ArgEnum;
use env_logger;
use log;

use line_sort::{FileSorterBuilder, LineCodec, PassthroughCodec, Utf8RepairCodec};

fn main() {
    let arg_parser = build_arg_parser();

    let log_level: LogLevel = arg_parser.value_of_t_or_exit("log_level");
    init_logger(log_level);

    let codec: Codec = arg_parser.value_of_t_or_exit("codec");
    let tmp_dir: Option<&str> = arg_parser.value_of("tmp_dir");
    let threshold = arg_parser.value_of("threshold").expect("value has a default");
    let threshold = threshold.parse::<ByteSize>().expect("value is pre-validated").as_u64();

    let input = arg_parser.value_of("input").expect("value is required");
    let output = arg_parser.value_of("output").expect("value is required");

    let result = match codec {
        Codec::Utf8Repair => run_sort(input, output, threshold, tmp_dir, Utf8RepairCodec),
        Codec::Passthrough => run_sort(input, output, threshold, tmp_dir, PassthroughCodec),
    };

    if let Err(err) = result {
        log::error!("sorting failed: {}", err);
        process::exit(1);
    }
}

fn run_sort<C: LineCodec>(
    input: &str,
    output: &str,
    threshold: u64,
    tmp_dir: Option<&str>,
    codec: C,
) -> Result<(), line_sort::SortError> {
    let mut sorter_builder = FileSorterBuilder::new().with_threshold(threshold).with_codec(codec);

    if let Some(tmp_dir) = tmp_dir {
        sorter_builder = sorter_builder.with_tmp_dir(path::Path::new(tmp_dir));
    }

    let sorter = sorter_builder.build()?;
    sorter.sort(path::Path::new(input), path::Path::new(output))?;

    log::info!("{} sorted into {}", input, output);

    Ok(())
}

#[derive(Copy, Clone, clap::ArgEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn possible_values() -> impl Iterator<Item = clap::PossibleValue<'static>> {
        Self::value_variants().iter().filter_map(|v| v.to_possible_value())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <LogLevel as clap::ArgEnum>::from_str(s, false)
    }
}

#[derive(Copy, Clone, clap::ArgEnum)]
enum Codec {
    Utf8Repair,
    Passthrough,
}

impl Codec {
    pub fn possible_values() -> impl Iterator<Item = clap::PossibleValue<'static>> {
        Codec::value_variants().iter().filter_map(|v| v.to_possible_value())
    }
}

impl std::str::FromStr for Codec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Codec as clap::ArgEnum>::from_str(s, false)
    }
}

fn build_arg_parser() -> clap::ArgMatches {
    clap::App::new("line-sort")
        .about("external merge sort for large line-oriented text files")
        .arg(
            clap::Arg::new("input")
                .short('i')
                .long("input")
                .help("file to be sorted")
                .required(true)
                .takes_value(true),
        )
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("result file")
                .required(true)
                .takes_value(true),
        )
        .arg(
            clap::Arg::new("threshold")
                .short('m')
                .long("threshold")
                .help("maximum file size to be sorted directly in memory")
                .takes_value(true)
                .default_value("1KiB")
                .validator(|v| match v.parse::<ByteSize>() {
                    Ok(_) => Ok(()),
                    Err(err) => Err(format!("Threshold format incorrect: {}", err)),
                }),
        )
        .arg(
            clap::Arg::new("codec")
                .short('c')
                .long("codec")
                .help("line decoding strategy applied while splitting")
                .takes_value(true)
                .default_value("utf8-repair")
                .possible_values(Codec::possible_values()),
        )
        .arg(
            clap::Arg::new("log_level")
                .short('l')
                .long("loglevel")
                .help("logging level")
                .takes_value(true)
                .default_value("info")
                .possible_values(LogLevel::possible_values()),
        )
        .arg(
            clap::Arg::new("tmp_dir")
                .short('d')
                .long("tmp-dir")
                .help("directory to be used to store temporary data")
                .takes_value(true),
        )
        .get_matches()
}

fn init_logger(log_level: LogLevel) {
    env_logger::Builder::new()
        .filter_level(match log_level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        })
        .format_timestamp_millis()
        .init();
}
