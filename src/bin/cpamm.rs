use anyhow::{Context, Result};
use clap::Parser;
use cpamm::{
    entrypoint::run_command,
    utils::{cli::Args, conf::Conf, logger::setup_tracing},
};
use tracing::error;

fn main() -> Result<()> {
    let args = Args::parse();

    let conf = Conf::new(args.config_file.clone(), args.data_directory.clone())
        .context("reading config file")?;

    setup_tracing(conf.log_format.parse()?, conf.id.clone())?;

    match run_command(&args, &conf) {
        Ok(outcome) => {
            println!("{}", outcome.output);
            Ok(())
        }
        Err(e) => {
            error!("{:#}", e);
            Err(e)
        }
    }
}
