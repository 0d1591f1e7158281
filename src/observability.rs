use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("omnichat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("omnichat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("omnichat.client.request_duration_seconds");

pub(crate) static SESSION_TURNS: Counter = Counter::new("omnichat.session.turns");
pub(crate) static SESSION_UNPRICED_TURNS: Counter =
    Counter::new("omnichat.session.unpriced_turns");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSION_TURNS);
    collector.register_counter(&SESSION_UNPRICED_TURNS);
}
