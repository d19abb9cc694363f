use actix_web::web;

use crate::controllers::*;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/status").route(web::get().to(status::check)))
        .service(web::resource("/registrations").route(web::post().to(registrations::create)))
        .service(
            web::resource("/registrations/{ticket_code}/check_in")
                .route(web::put().to(registrations::check_in)),
        )
        .service(web::resource("/registrations/{id}").route(web::get().to(registrations::show)))
        .service(web::resource("/payments").route(web::post().to(payments::create)))
        .service(web::resource("/webhooks/moolre").route(web::post().to(webhooks::moolre)))
        .service(web::resource("/events/{id}/broadcasts").route(web::post().to(broadcasts::create)));
}
