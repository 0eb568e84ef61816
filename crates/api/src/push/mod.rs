pub mod dispatch;
mod get_vapid_public_key;
mod send_test_push;
mod subscribe;
mod unsubscribe;

use actix_web::web;
use get_vapid_public_key::get_vapid_public_key_controller;
use send_test_push::send_test_push_controller;
use subscribe::subscribe_controller;
use unsubscribe::unsubscribe_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/push/vapid-public-key",
        web::get().to(get_vapid_public_key_controller),
    );
    cfg.route("/push/subscribe", web::post().to(subscribe_controller));
    cfg.route(
        "/push/unsubscribe/{subscription_id}",
        web::delete().to(unsubscribe_controller),
    );
    cfg.route(
        "/push/test/{user_id}",
        web::post().to(send_test_push_controller),
    );
}
