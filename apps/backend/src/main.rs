use actix_web::{web, App, HttpServer};
use backend::routes;
use backend::state::app_state::AppState;
use backend::state::policy::ReclaimPolicy;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables are expected to be set by the runtime
    // environment (container env file or shell).
    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "8888".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        });

    let policy = ReclaimPolicy::from_env();
    let app_state = AppState::new(policy);

    tracing::info!(host = %host, port, ?policy, "starting game backend");

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
