mod cancel_notification;
mod get_user_notifications;
pub mod process_pending_notifications;
mod schedule_notification;
pub mod sync_task_notifications;

use actix_web::web;
use cancel_notification::cancel_notification_controller;
use get_user_notifications::get_user_notifications_controller;
use schedule_notification::schedule_notification_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/notifications",
        web::post().to(schedule_notification_controller),
    );
    cfg.route(
        "/notifications/{notification_id}",
        web::delete().to(cancel_notification_controller),
    );
    cfg.route(
        "/users/{user_id}/notifications",
        web::get().to(get_user_notifications_controller),
    );
}
