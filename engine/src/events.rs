use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything the outside world can observe happening at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    CardDealt,
    CardRevealed,
    ShoeShuffled,
    HandSplit,
    Doubled,
    Surrendered,
    InsuranceOffered,
    InsuranceTaken,
    PlayerBlackjack,
    DealerBlackjack,
    Bust,
    RoundEnded,
    BankrollChanged,
    /// Diagnostic: the shoe ran dry mid-round and the round was pushed.
    RoundVoided,
}

/// One observable state change.
///
/// Commands return their events as an ordered log; consumers pull, the
/// engine never pushes. Payloads are free-form JSON in the same spirit as
/// the hand-record metadata the transport serializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub payload: Value,
    pub ts: DateTime<Utc>,
}

impl Event {
    pub fn new(kind: EventKind, payload: Value) -> Self {
        Self {
            kind,
            payload,
            ts: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_round_trip_through_json() {
        let event = Event::new(EventKind::CardDealt, json!({"card": "A♠", "to": "player"}));
        let text = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&text).unwrap();
        assert_eq!(back, event);
    }
}
