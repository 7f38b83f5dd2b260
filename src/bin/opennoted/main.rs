mod app_constants;
mod app_setup;
mod cli;
mod routes;

use clap::{crate_name, Parser};
use log::info;
use opennote::config::figment::FigmentExt;
use opennote::error_exit;
use opennote::logging::{init_logging, UseSyslog};
use rocket::figment::Figment;
use crate::app_setup::build_rocket;
use crate::cli::CliConfig;

fn main() {
    let cli_config = CliConfig::parse();
    init_logging(UseSyslog::from(cli_config.syslog));

    info!("{} starting up", crate_name!());

    if !cli_config.config_file.exists() {
        error_exit!(
            "configuration file at {} does not exist",
            cli_config.config_file.display()
        )
    }
    let figment = Figment::from(rocket::Config::default())
        .setup_app_config(cli_config.config_file);

    let result = rocket::execute(build_rocket(figment).launch());
    if let Err(e) = result {
        error_exit!("failed to launch rocket: {}", e);
    }
}
