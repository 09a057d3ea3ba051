/// Emits a notice: above info, below warn. Routed through a dedicated target.
macro_rules! notice {
    ($($arg:tt)+) => {
        ::tracing::info!(target: ::answer_domain::NOTICE_TARGET, $($arg)+)
    };
}
