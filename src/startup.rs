use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;

use crate::auth::SessionManager;
use crate::logger::RequestLogger;
use crate::middleware::JwtMiddleware;
use crate::routes::{change_password, health_check, login, me, refresh, revoke};

pub fn run(listener: TcpListener, sessions: SessionManager) -> Result<Server, std::io::Error> {
    let sessions_data = web::Data::new(sessions.clone());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestLogger)
            .app_data(sessions_data.clone())
            .route("/health_check", web::get().to(health_check))
            // Protected routes (require an access token)
            .service(
                web::scope("/api/users")
                    .wrap(JwtMiddleware::new(sessions.clone()))
                    .route("/password", web::put().to(change_password)),
            )
            .service(
                web::scope("/api/me")
                    .wrap(JwtMiddleware::new(sessions.clone()))
                    .route("", web::get().to(me)),
            )
            // Public routes; refresh and revoke carry their own token
            .route("/api/login", web::post().to(login))
            .route("/api/refresh", web::post().to(refresh))
            .route("/api/revoke", web::post().to(revoke))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
