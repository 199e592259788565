use camino::Utf8PathBuf;
use clap::Parser;
use covid_feed::Result;
use covid_feed::config::DEFAULT_CONFIG_TOML;
use ohno::IntoAppError;
use std::fs;

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output configuration file path
    #[arg(value_name = "PATH", default_value = "covid-feed.toml")]
    pub output: Utf8PathBuf,
}

pub fn init_config(args: &InitArgs) -> Result<()> {
    fs::write(&args.output, DEFAULT_CONFIG_TOML)
        .into_app_err_with(|| format!("unable to write configuration file '{}'", args.output))?;
    println!("Generated default configuration file: {}", args.output);
    Ok(())
}
