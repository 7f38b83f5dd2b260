use std::ffi::OsStr;
use std::path::PathBuf;
use boolean_enums::gen_boolean_enum;
use syslog::{BasicLogger, Facility};

gen_boolean_enum!(pub UseSyslog);

pub fn init_logging(use_syslog: UseSyslog) {
    if use_syslog.into() {
        init_logging_syslog()
    } else {
        init_logging_env()
    }
}

fn init_logging_syslog() {
    log
        ::set_boxed_logger(
            Box::new(
                BasicLogger::new(
                    // only 3164 has log crate integration at the moment
                    syslog::unix(
                        syslog::Formatter3164 {
                            facility: Facility::LOG_USER,
                            hostname: None,
                            process: std::env::args()
                                .next()
                                .and_then(|name|
                                    PathBuf::from(name)
                                        .file_name()
                                        .map(|n|
                                            OsStr::to_string_lossy(n)
                                                .into_owned()
                                        )
                                )
                                .unwrap_or_default(),
                            pid: std::process::id(),
                        }
                    ).unwrap_or_else(|e| {
                        eprintln!("syslog initialization failed: {e}");
                        std::process::exit(1)
                    })
                )
            )
        )
        .map(|()| log::set_max_level(log::LevelFilter::Info))
        .unwrap_or_else(|e| {
            eprintln!("syslog initialization failed: {e}");
            std::process::exit(1)
        });
}

fn init_logging_env() {
    env_logger::builder()
        .filter_level(
            if cfg!(debug_assertions) {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Info
            }
        )
        .parse_default_env()
        .init()
}
