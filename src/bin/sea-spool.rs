use anyhow::{bail, Result};
use clap::{ArgGroup, Parser};
use log::LevelFilter;
use sea_spool::{
    http::{HttpOptions, ReqwestClient, StreamDriver},
    s3::ObjectOptions,
    Destination, FilenameGenerator, Sink, SystemEnv, Template, DEFAULT_ROTATION_THRESHOLD,
    DEFAULT_TEMPLATE,
};
use std::{path::PathBuf, sync::Arc};

#[derive(Debug, Parser)]
#[clap(version, about = "Spool an HTTP stream into rotated files or S3 objects")]
#[clap(group(ArgGroup::new("destination").required(true).args(["path", "s3"])))]
struct Args {
    #[clap(long, help = "Write files into this existing directory")]
    path: Option<PathBuf>,
    #[clap(long, help = "Upload gzip objects into this S3 bucket")]
    s3: Option<String>,
    #[clap(
        long,
        default_value_t = DEFAULT_ROTATION_THRESHOLD,
        help = "Rotate once a unit exceeds this many bytes, at the next newline"
    )]
    buffer: u64,
    #[clap(long, help = "Username for HTTP basic auth")]
    user: Option<String>,
    #[clap(long, requires = "user", help = "Password for HTTP basic auth")]
    password: Option<String>,
    #[clap(
        long,
        default_value = DEFAULT_TEMPLATE,
        help = "Unit name template, e.g. `dump-$year$month$day-$index`. Fields: year, month, day, hour, minute, second, uuid, index, host"
    )]
    template: Template,
    #[clap(short, long, action = clap::ArgAction::Count, help = "More logging; repeat for more")]
    verbose: u8,
    #[clap(help = "The URL to stream from")]
    url: String,
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let Args {
        path,
        s3,
        buffer,
        user,
        password,
        template,
        verbose,
        url,
    } = Args::parse();

    env_logger::Builder::new()
        .filter_level(log_level(verbose))
        .parse_default_env()
        .init();

    let destination = match (path, s3) {
        (Some(path), _) => Destination::Path(path),
        (None, Some(bucket)) => Destination::S3(bucket),
        (None, None) => bail!("One of --path or --s3 is required"),
    };
    let origin = destination.connect(ObjectOptions::default())?;
    let names = FilenameGenerator::new(template, Arc::new(SystemEnv::new()?));

    let mut options = HttpOptions::default();
    if let Some(user) = user {
        options.set_basic_auth(user, password);
    }
    let driver = StreamDriver::new(ReqwestClient::new(options)?, url);

    let run = driver.run(|| Ok(Sink::new(origin.reopen(), names.clone(), buffer)));
    tokio::select! {
        res = run => match res {
            Ok(attempts) => log::info!("Stream completed after {attempts} attempt(s)"),
            Err(e) => {
                log::error!("{e}");
                return Err(e.into());
            }
        },
        _ = tokio::signal::ctrl_c() => log::error!("Program interrupted!"),
    }

    Ok(())
}
