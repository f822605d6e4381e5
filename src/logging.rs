use std::{env, fs::{File, OpenOptions}, io, str::FromStr as _};

use reopen::Reopen;
use simplelog::{Color, ColorChoice, CombinedLogger, ConfigBuilder, Level, LevelFilter, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use thiserror::Error;

const LOG_SINKS: [&str; 2] = ["app", "access"];

#[derive(Debug, Error)]
pub enum LogError {
    #[error("invalid log level for {var}: {value}")]
    InvalidLevel { var: String, value: String },
    #[error("unable to open log file for {var}: {path}")]
    OpenFile {
        var: String,
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("could not install log sinks")]
    Init(#[from] log::SetLoggerError),
}

/// Install one sink per log target (`<app_name>::app`, `<app_name>::access`).
///
/// `<SINK>_LOG` is either `stderr` (the default) or a file path; files are reopened on SIGHUP so
/// they can be rotated. `<SINK>_LOG_LEVEL` defaults to `info`.
pub fn logging_bootstrap(app_name: &str) -> Result<(), LogError> {
    let mut sinks = Vec::<Box<dyn SharedLogger>>::with_capacity(LOG_SINKS.len());

    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_time_format_rfc3339()
        .set_level_color(Level::Error, Some(Color::Red))
        .set_level_color(Level::Info, Some(Color::Green))
        .to_owned();

    for sink in LOG_SINKS {
        let env_var_name = format!("{}_LOG", sink.to_uppercase());
        let level_env_var_name = format!("{env_var_name}_LEVEL");
        let log_level = env::var(&level_env_var_name).unwrap_or(String::from("info"));
        let log_level = LevelFilter::from_str(&log_level).map_err(|_| LogError::InvalidLevel {
            var: level_env_var_name,
            value: log_level.clone(),
        })?;
        let config = config.clone().add_filter_allow(format!("{app_name}::{sink}")).build();
        let destination = env::var(&env_var_name).unwrap_or(String::from("stderr"));
        sinks.push(match destination.as_str() {
            "stderr" => TermLogger::new(log_level, config, TerminalMode::Stderr, ColorChoice::Auto) as Box<dyn SharedLogger>,
            file => {
                let file_name = String::from(file);
                let fd = Reopen::new(Box::new(move || open_log_file(&file_name))).map_err(|source| LogError::OpenFile {
                    var: env_var_name,
                    path: String::from(file),
                    source,
                })?;
                #[cfg(unix)]
                reopen_on_hangup(fd.handle());
                WriteLogger::new(log_level, config, fd)
            }
        });
    }
    CombinedLogger::init(sinks)?;
    Ok(())
}

#[cfg(unix)]
fn reopen_on_hangup(handle: reopen::Handle) {
    use tokio::signal::unix::{signal, SignalKind};

    actix_web::rt::spawn(async move {
        let Ok(mut hangup) = signal(SignalKind::hangup()) else {
            return;
        };
        while hangup.recv().await.is_some() {
            handle.reopen();
        }
    });
}

fn open_log_file(log_file: &str) -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
}
