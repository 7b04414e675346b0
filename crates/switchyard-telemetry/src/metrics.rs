//! Metric name constants and recording helpers
//!
//! Instruments come from the global meter provider, which is a no-op until
//! [`crate::init`] installs an exporter.

use std::sync::LazyLock;

use opentelemetry::global;
use opentelemetry::metrics::Counter;

use crate::KeyValue;

/// Instrumentation scope for every Switchyard instrument
pub const METER_NAME: &str = "switchyard";

// Routing metric names
pub const ROUTING_DECISIONS: &str = "switchyard.routing.decisions";

// Parser metric names
pub const PARSER_RECOVERIES: &str = "switchyard.parser.recoveries";

static ROUTING_DECISION_COUNTER: LazyLock<Counter<u64>> = LazyLock::new(|| {
    global::meter(METER_NAME)
        .u64_counter(ROUTING_DECISIONS)
        .with_description("Routing decisions by provider, method and reason")
        .build()
});

static PARSER_RECOVERY_COUNTER: LazyLock<Counter<u64>> = LazyLock::new(|| {
    global::meter(METER_NAME)
        .u64_counter(PARSER_RECOVERIES)
        .with_description("Tool calls recovered from free-text model output")
        .build()
});

/// Count one routing decision
pub fn record_routing_decision(provider: &str, method: &str, reason: &str) {
    ROUTING_DECISION_COUNTER.add(
        1,
        &[
            KeyValue::new("provider", provider.to_owned()),
            KeyValue::new("method", method.to_owned()),
            KeyValue::new("reason", reason.to_owned()),
        ],
    );
}

/// Count tool calls recovered by a parser variant and extraction strategy
pub fn record_parser_recovery(variant: &str, strategy: &str, count: usize) {
    PARSER_RECOVERY_COUNTER.add(
        u64::try_from(count).unwrap_or(u64::MAX),
        &[
            KeyValue::new("variant", variant.to_owned()),
            KeyValue::new("strategy", strategy.to_owned()),
        ],
    );
}
