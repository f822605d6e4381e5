use std::env;
use std::path::PathBuf;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::Context as _;

use userapi::config::Config;
use userapi::logging::logging_bootstrap;
use userapi::model::Store;
use userapi::{configure_api, ACCESS_TARGET, APP_NAME, APP_TARGET};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // First, get configuration; an explicit env file may be given as the only argument
    let env_file = env::args_os().nth(1).map(PathBuf::from);
    let config = Config::load(env_file.as_deref()).context("Unable to load configuration")?;

    // Setting logging sinks
    logging_bootstrap(APP_NAME).context("Unable to set up logging")?;

    // Then connect to database and migrate its structure
    let store = Store::connect(&config.database_url, config.max_connections)
        .await
        .with_context(|| format!("Unable to open database {}", config.database_url))?;

    log::info!(target: APP_TARGET, "Listening on {}:{}", config.bind_host, config.bind_port);

    // And then, web serve
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(store.clone()))
            .wrap(Logger::new(r#"%a %t "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#)
                .log_target(ACCESS_TARGET))
            .configure(configure_api)
    })
    .bind_auto_h2c((config.bind_host.as_str(), config.bind_port))?
    .run()
    .await?;
    Ok(())
}
