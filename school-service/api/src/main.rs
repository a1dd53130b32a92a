//! School Service Main Application
//!
//! Entry point: loads configuration, wires the database pool, the
//! notification queue and push gateway, every repository and service
//! implementation, and starts the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use school_service_api::create_router;
use school_service_api::state::AppState;
use school_service_infra::live_feed::LiveFeedHub;
use school_service_infra::repositories::{
    AchievementRepositoryImpl, AttendanceRepositoryImpl, ClassRepositoryImpl,
    CounselingNoteRepositoryImpl, DeviceRepositoryImpl, DisplayTokenRepositoryImpl,
    GradeRepositoryImpl, HomeroomNoteRepositoryImpl, NotificationRepositoryImpl,
    ParentStudentLinkRepositoryImpl, PermitDocumentRepositoryImpl, PlatformAdminRepositoryImpl,
    PushRegistrationRepositoryImpl, ScheduleRepositoryImpl, SchoolRepositoryImpl,
    StudentRepositoryImpl, UserRepositoryImpl, ViolationRepositoryImpl,
};
use school_service_infra::services::{
    run_delivery_worker, AttendanceIngressServiceImpl, AuthServiceImpl, DeliveryWorkerConfig,
    DeviceAuthenticatorImpl, DisplayTokenServiceImpl, NotificationServiceImpl,
    ScheduleServiceImpl,
};
use shared_config::Config;
use shared_context::SystemClock;
use shared_db::init_pool;
use shared_events::NatsQueue;
use shared_rate_limit::{InMemoryRateLimiter, RateLimiter, RedisRateLimiter};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "school_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = init_pool(&config.database_url, config.max_connections).await?;

    let clock = Arc::new(SystemClock) as Arc<dyn shared_context::Clock>;

    let school_repo = Arc::new(SchoolRepositoryImpl::new(pool.clone()));
    let user_repo = Arc::new(UserRepositoryImpl::new(pool.clone()));
    let class_repo = Arc::new(ClassRepositoryImpl::new(pool.clone()));
    let student_repo = Arc::new(StudentRepositoryImpl::new(pool.clone()));
    let parent_link_repo = Arc::new(ParentStudentLinkRepositoryImpl::new(pool.clone()));
    let device_repo = Arc::new(DeviceRepositoryImpl::new(pool.clone()));
    let display_token_repo = Arc::new(DisplayTokenRepositoryImpl::new(pool.clone()));
    let platform_admin_repo = Arc::new(PlatformAdminRepositoryImpl::new(pool.clone()));
    let schedule_repo = Arc::new(ScheduleRepositoryImpl::new(pool.clone()));
    let attendance_repo = Arc::new(AttendanceRepositoryImpl::new(pool.clone()));
    let notification_repo = Arc::new(NotificationRepositoryImpl::new(pool.clone()));
    let push_registration_repo = Arc::new(PushRegistrationRepositoryImpl::new(pool.clone()));
    let grade_repo = Arc::new(GradeRepositoryImpl::new(pool.clone()));
    let homeroom_note_repo = Arc::new(HomeroomNoteRepositoryImpl::new(pool.clone()));
    let counseling_note_repo = Arc::new(CounselingNoteRepositoryImpl::new(pool.clone()));
    let permit_repo = Arc::new(PermitDocumentRepositoryImpl::new(pool.clone()));
    let violation_repo = Arc::new(ViolationRepositoryImpl::new(pool.clone()));
    let achievement_repo = Arc::new(AchievementRepositoryImpl::new(pool.clone()));

    // The fan-out service persists `Notification` rows itself and only
    // enqueues best-effort afterwards, but its constructor still takes
    // the queue unconditionally, so unlike the teacher's optional event
    // consumers, NATS is required here rather than degraded around.
    let nats_url = config
        .nats_url
        .as_ref()
        .ok_or("NATS_URL is required: the notification service cannot be constructed without a queue")?;
    let queue = Arc::new(NatsQueue::connect(nats_url).await?);
    tracing::info!("connected to NATS at {}", nats_url);

    let notification_service = Arc::new(NotificationServiceImpl::new(
        notification_repo.clone(),
        queue.clone(),
        config.notification_queue_subject_prefix.clone(),
        clock.clone(),
    ));

    let device_authenticator = Arc::new(DeviceAuthenticatorImpl::new(device_repo.clone()));

    let auth_service = Arc::new(AuthServiceImpl::new(
        user_repo.clone(),
        school_repo.clone(),
        clock.clone(),
        config.jwt_secret.clone(),
        config.jwt_expiration,
        config.jwt_refresh_expiration,
    ));

    let schedule_service = Arc::new(ScheduleServiceImpl::new(schedule_repo.clone()));

    let attendance_service = Arc::new(AttendanceIngressServiceImpl::new(
        device_authenticator.clone(),
        school_repo.clone(),
        student_repo.clone(),
        class_repo.clone(),
        schedule_repo.clone(),
        attendance_repo.clone(),
        parent_link_repo.clone(),
        notification_service.clone(),
        clock.clone(),
    ));

    let display_token_service = Arc::new(DisplayTokenServiceImpl::new(
        display_token_repo.clone(),
        clock.clone(),
    ));

    let live_feed = LiveFeedHub::new();

    // The delivery worker needs both a queue and a push gateway; unlike
    // the notification service it is genuinely optional, so it only
    // starts when both are configured (mirrors the teacher's own
    // optional outbox-worker spawn).
    if let Some(push_gateway_url) = config.push_gateway_url.clone() {
        let api_key = config.push_gateway_api_key.clone().unwrap_or_default();
        let push_gateway = Arc::new(school_service_infra::push::HttpPushGateway::new(
            push_gateway_url,
            api_key,
        ));
        let worker_queue = queue.clone();
        let worker_push_reg_repo = push_registration_repo.clone();
        let worker_config = DeliveryWorkerConfig {
            subject: format!("{}.delivery", config.notification_queue_subject_prefix),
            initial_delay_ms: config.push_retry_initial_ms,
            factor: config.push_retry_factor,
            cap_ms: config.push_retry_cap_ms,
            max_retries: config.push_max_retries,
        };
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = run_delivery_worker(
                worker_queue,
                push_gateway,
                worker_push_reg_repo,
                worker_config,
                worker_cancel,
            )
            .await
            {
                tracing::error!(error = %e, "delivery worker exited");
            }
        });
        tracing::info!("delivery worker started");
    } else {
        tracing::warn!("PUSH_GATEWAY_URL not set, push delivery worker will not run");
    }

    let jwt_secret = config.jwt_secret.clone();

    let state = AppState {
        auth_service,
        schedule_service,
        attendance_service,
        display_token_service,
        notification_service,

        school_repo,
        user_repo,
        class_repo,
        student_repo,
        parent_link_repo,
        device_repo,
        display_token_repo,
        platform_admin_repo,

        notification_repo,
        push_registration_repo,

        grade_repo,
        homeroom_note_repo,
        counseling_note_repo,
        permit_repo,
        violation_repo,
        achievement_repo,

        live_feed,
        device_authenticator,
        clock,
        jwt_secret,
    };

    let login_limiter: Arc<dyn RateLimiter> = match &config.redis_url {
        Some(redis_url) => Arc::new(RedisRateLimiter::connect(redis_url).await?),
        None => {
            tracing::warn!("REDIS_URL not set, falling back to an in-memory login rate limiter (not safe across replicas)");
            Arc::new(InMemoryRateLimiter::new())
        }
    };

    let app = create_router(state, login_limiter);

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    tracing::info!("school service listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
