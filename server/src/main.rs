//! Development backend for tasko. Serves the task REST API from memory so the
//! terminal client can be run end to end without a real deployment.

use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;

mod error;
mod routes;
mod state;

use state::AppState;

#[derive(Parser)]
#[command(author, version, about = "In-memory tasko API server")]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "TASKO_BIND", default_value = "127.0.0.1:5000")]
    bind: String,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let cli = Cli::parse();

    let state = web::Data::new(AppState::new());
    log::info!("listening on {}", cli.bind);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
    })
    .bind(&cli.bind)?
    .run()
    .await
}
