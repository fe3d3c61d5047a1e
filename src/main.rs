use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use sqlx::postgres::PgPoolOptions;

mod models;
pub mod pix;
mod repositories;
pub mod services;
pub mod settings;

fn init_logging() {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build();

    let config = log4rs::config::Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))
        .expect("Invalid logging configuration.");

    log4rs::init_config(config).expect("Could not initialize logging.");
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_logging();

    let config = settings::Settings::new().expect("Could not load config file.");
    let conn = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.postgres.url)
        .await
        .expect("Could not connect to database.");

    sqlx::migrate!()
        .run(&conn)
        .await
        .expect("Could not run database migrations.");

    log::info!("Starting services.");
    services::start_services(conn, config)
        .await
        .expect("Could not start services.");
}
