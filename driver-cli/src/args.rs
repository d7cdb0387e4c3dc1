//! Command-line arguments.

use clap::Parser;
use plan_driver::request::{PlanningRequest, DEFAULT_PLAN_FILE};
use std::path::PathBuf;

/// Plan driver command line.
///
/// Without `--serve` the driver handles one request and exits with its exit
/// code. With `--serve` it answers newline-delimited JSON requests over TCP.
#[derive(Parser, Debug)]
#[command(
    name = "plan-driver",
    about = "Run the translate, search and validate planner stages",
    disable_version_flag = true
)]
pub struct Cli {
    /// Problem inputs, usually a domain and a problem file
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Comma-separated stages to run (translate, search, validate)
    #[arg(long, value_delimiter = ',', value_name = "STAGES", conflicts_with = "run_all")]
    pub components: Vec<String>,

    /// Run translate and search; the default without --components
    #[arg(long)]
    pub run_all: bool,

    /// Print the driver version and exit
    #[arg(long)]
    pub version: bool,

    /// List the known aliases and exit
    #[arg(long)]
    pub show_aliases: bool,

    /// Remove the intermediate file and plan files, then exit
    #[arg(long)]
    pub cleanup: bool,

    /// Serve requests over TCP instead of handling one
    #[arg(long)]
    pub serve: bool,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Intermediate file written by translate and read by search
    #[arg(long, value_name = "FILE")]
    pub sas_file: Option<PathBuf>,

    /// Plan file prefix
    #[arg(long, value_name = "FILE", default_value = DEFAULT_PLAN_FILE)]
    pub plan_file: PathBuf,

    /// Keep the intermediate file after search
    #[arg(long)]
    pub keep_sas_file: bool,

    /// Named search configuration
    #[arg(long, value_name = "NAME")]
    pub alias: Option<String>,

    /// Portfolio file to search with
    #[arg(long, value_name = "FILE")]
    pub portfolio: Option<PathBuf>,

    /// Cost bound for portfolio search
    #[arg(long, value_name = "BOUND")]
    pub portfolio_bound: Option<i64>,

    /// Stop portfolio search after the first plan
    #[arg(long)]
    pub portfolio_single_plan: bool,

    /// Options passed to the translator
    #[arg(long, num_args = 1.., allow_hyphen_values = true, value_name = "OPTION")]
    pub translate_options: Vec<String>,

    /// Options passed to the search engine
    #[arg(long, num_args = 1.., allow_hyphen_values = true, value_name = "OPTION")]
    pub search_options: Vec<String>,

    /// Options passed to the validator
    #[arg(long, num_args = 1.., allow_hyphen_values = true, value_name = "OPTION")]
    pub validate_options: Vec<String>,
}

impl Cli {
    /// Builds the request this command line describes.
    pub fn to_request(&self) -> PlanningRequest {
        PlanningRequest {
            run_all: self.run_all || self.components.is_empty(),
            components: self.components.clone(),
            version: self.version,
            show_aliases: self.show_aliases,
            cleanup: self.cleanup,
            keep_sas_file: self.keep_sas_file,
            sas_file: self.sas_file.clone(),
            plan_file: self.plan_file.clone(),
            inputs: self.inputs.clone(),
            alias: self.alias.clone(),
            translate_options: self.translate_options.clone(),
            search_options: self.search_options.clone(),
            validate_options: self.validate_options.clone(),
            portfolio: self.portfolio.clone(),
            portfolio_bound: self.portfolio_bound,
            portfolio_single_plan: self.portfolio_single_plan,
        }
    }
}
