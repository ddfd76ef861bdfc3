use actix_files::{Files, NamedFile};
use actix_web::{dev::{ServiceRequest, ServiceResponse, fn_service}, middleware, web, App, HttpServer, Responder};
use serde::Serialize;
use std::env;
use std::path::PathBuf;

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn health() -> impl Responder {
    web::Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Get port from environment or default to 8080
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);
    let dist_dir = PathBuf::from(env::var("DIST_DIR").unwrap_or_else(|_| "./dist".to_string()));

    println!("Serving {} on 0.0.0.0:{port}", dist_dir.display());

    HttpServer::new(move || {
        let index = dist_dir.join("index.html");
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .route("/healthz", web::get().to(health))
            .service(
                Files::new("/", &dist_dir)
                    .index_file("index.html")
                    // Unknown paths load the dashboard shell
                    .default_handler(fn_service(move |req: ServiceRequest| {
                        let index = index.clone();
                        async move {
                            let (req, _) = req.into_parts();
                            let file = NamedFile::open_async(index).await?;
                            let res = file.into_response(&req);
                            Ok(ServiceResponse::new(req, res))
                        }
                    })),
            )
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
