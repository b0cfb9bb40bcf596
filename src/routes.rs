use crate::{
    api::{analytics, attendance, users},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use tracing::warn;

/// Milliseconds between replenished requests for a per-minute quota.
pub fn replenish_interval_ms(requests_per_min: u32) -> u64 {
    if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    }
}

fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(replenish_interval_ms(requests_per_min))
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_else(|| {
            warn!(requests_per_min, "Invalid rate limit, using governor defaults");
            GovernorConfig::default()
        });
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let login_limiter = build_limiter(config.rate_login_per_min);
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    // Public routes
    cfg.service(
        web::scope("/auth").service(
            web::resource("/login")
                .wrap(login_limiter)
                .route(web::post().to(handlers::login)),
        ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(web::resource("").route(web::get().to(attendance::list_today)))
                    // /attendance/analytics
                    .service(
                        web::resource("/analytics")
                            .route(web::get().to(analytics::analytics_dashboard)),
                    )
                    // /attendance/{user_id}/check-in
                    .service(
                        web::resource("/{user_id}/check-in")
                            .route(web::post().to(attendance::check_in)),
                    )
                    // /attendance/{user_id}/check-out
                    .service(
                        web::resource("/{user_id}/check-out")
                            .route(web::post().to(attendance::check_out)),
                    ),
            )
            .service(
                web::scope("/users")
                    // /users
                    .service(web::resource("").route(web::post().to(users::create_user)))
                    // /users/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(users::get_user))
                            .route(web::put().to(users::update_user))
                            .route(web::delete().to(users::delete_user)),
                    ),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replenish_interval_spreads_quota_over_a_minute() {
        assert_eq!(replenish_interval_ms(60), 1_000);
        assert_eq!(replenish_interval_ms(1_000), 60);
    }

    #[test]
    fn replenish_interval_never_zero() {
        assert_eq!(replenish_interval_ms(0), 1);
        assert_eq!(replenish_interval_ms(120_000), 1);
    }
}
