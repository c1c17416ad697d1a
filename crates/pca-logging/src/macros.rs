//! ---
//! pca_section: "03-logging"
//! pca_subsection: "module"
//! pca_type: "source"
//! pca_scope: "code"
//! pca_description: "Context-enriched logging macros."
//! pca_version: "v0.0.0-prealpha"
//! pca_owner: "tbd"
//! ---
//! Macros emitting tracing events carrying a [`LogContext`](crate::LogContext).

/// Shared expansion for the level-specific macros.
#[doc(hidden)]
#[macro_export]
macro_rules! __pca_event {
    ($level:expr, $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            $level,
            device = ctx.device.unwrap_or(""),
            location = ctx.location.unwrap_or(""),
            trip = ctx.trip.unwrap_or_default(),
            fault_type = ctx.fault_type.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Emit an informational log enriched with study context.
#[macro_export]
macro_rules! pca_info {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__pca_event!(tracing::Level::INFO, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__pca_event!(tracing::Level::INFO, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a debug log enriched with study context.
#[macro_export]
macro_rules! pca_debug {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__pca_event!(tracing::Level::DEBUG, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__pca_event!(tracing::Level::DEBUG, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a warning enriched with study context.
#[macro_export]
macro_rules! pca_warn {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__pca_event!(tracing::Level::WARN, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__pca_event!(tracing::Level::WARN, $crate::LogContext::default(), $($arg)+)
    };
}
