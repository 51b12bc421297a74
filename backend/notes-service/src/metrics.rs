use actix_web::{HttpResponse, Responder};
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, TextEncoder};

/// Handler that serialises Prometheus metrics in text format.
pub async fn metrics_handler() -> impl Responder {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => HttpResponse::Ok()
            .content_type(encoder.format_type())
            .body(buffer),
        Err(err) => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

/// Counter for completed Google logins
static OAUTH_LOGINS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("oauth_logins_total", "Total number of completed Google logins")
        .and_then(|c| {
            prometheus::default_registry().register(Box::new(c.clone()))?;
            Ok(c)
        })
        .unwrap_or_else(|e| {
            tracing::error!("failed to create oauth_logins counter: {}", e);
            IntCounter::new("dummy_oauth_logins", "dummy").expect("dummy counter")
        })
});

/// Counter for login attempts that failed at the provider handshake
static OAUTH_LOGIN_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "oauth_login_failures_total",
        "Total number of Google logins that failed during code exchange",
    )
    .and_then(|c| {
        prometheus::default_registry().register(Box::new(c.clone()))?;
        Ok(c)
    })
    .unwrap_or_else(|e| {
        tracing::error!("failed to create oauth_login_failures counter: {}", e);
        IntCounter::new("dummy_oauth_failures", "dummy").expect("dummy counter")
    })
});

/// Counter for created posts
static POSTS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("posts_created_total", "Total number of posts created")
        .and_then(|c| {
            prometheus::default_registry().register(Box::new(c.clone()))?;
            Ok(c)
        })
        .unwrap_or_else(|e| {
            tracing::error!("failed to create posts_created counter: {}", e);
            IntCounter::new("dummy_posts_created", "dummy").expect("dummy counter")
        })
});

/// Record the outcome of a login attempt
#[inline]
pub fn record_oauth_login(success: bool) {
    if success {
        OAUTH_LOGINS_TOTAL.inc();
    } else {
        OAUTH_LOGIN_FAILURES_TOTAL.inc();
    }
}

/// Increment created posts counter
#[inline]
pub fn inc_posts_created() {
    POSTS_CREATED_TOTAL.inc();
}
