//! Serves recorded interactions back to the replaying adapters.
//!
//! Each `port::method` pair is its own stream, so a command may interleave
//! filesystem and tracker calls differently from the recording as long as
//! the calls to any one method come in recorded order. Every call is
//! checked against the recorded input: each field the cassette recorded
//! must match the live call. Fields left out of the recording are not
//! checked, which lets hand-built cassettes pin only what a test cares
//! about.

use std::collections::{BTreeMap, VecDeque};

use serde_json::Value;
use thiserror::Error;

use super::format::{Cassette, Interaction};

/// Why a replayed call could not be served.
#[derive(Debug, Error, PartialEq)]
pub enum ReplayError {
    /// The cassette has nothing left for this method.
    #[error("Cassette exhausted: no {port}::{method} interaction left (still queued: [{left}])")]
    Exhausted {
        /// Port that was called.
        port: String,
        /// Method that was called.
        method: String,
        /// Streams that still hold interactions.
        left: String,
    },
    /// The live call disagrees with what was recorded.
    #[error("Cassette mismatch at seq {seq}: {port}::{method} recorded {recorded}, got {actual}")]
    InputMismatch {
        /// Sequence number of the recorded interaction.
        seq: u64,
        /// Port that was called.
        port: String,
        /// Method that was called.
        method: String,
        /// Recorded input.
        recorded: Value,
        /// Input of the live call.
        actual: Value,
    },
}

/// Recorded interactions grouped into per-method streams.
pub struct CassetteReplayer {
    streams: BTreeMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Groups a cassette's interactions by `port::method`, keeping order.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut streams: BTreeMap<(String, String), VecDeque<Interaction>> = BTreeMap::new();
        for interaction in &cassette.interactions {
            streams
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { streams }
    }

    /// Takes the next interaction for `port::method` after checking `input`
    /// against the recorded one.
    ///
    /// A mismatched interaction stays queued.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Exhausted`] when the stream is empty and
    /// [`ReplayError::InputMismatch`] when a recorded input field differs.
    pub fn next_interaction(
        &mut self,
        port: &str,
        method: &str,
        input: &Value,
    ) -> Result<Interaction, ReplayError> {
        let queue = self.streams.entry((port.to_string(), method.to_string())).or_default();
        match queue.pop_front() {
            Some(next) if input_matches(&next.input, input) => Ok(next),
            Some(next) => {
                let err = ReplayError::InputMismatch {
                    seq: next.seq,
                    port: port.to_string(),
                    method: method.to_string(),
                    recorded: next.input.clone(),
                    actual: input.clone(),
                };
                queue.push_front(next);
                Err(err)
            }
            None => Err(ReplayError::Exhausted {
                port: port.to_string(),
                method: method.to_string(),
                left: self.streams_left(),
            }),
        }
    }

    /// Interactions not yet served, across all ports.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.streams.values().map(VecDeque::len).sum()
    }

    fn streams_left(&self) -> String {
        self.streams
            .iter()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|((port, method), queue)| format!("{port}::{method} x{}", queue.len()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Every field of a recorded object input must equal the live field;
/// other recorded values must match exactly. `null` matches anything.
fn input_matches(recorded: &Value, actual: &Value) -> bool {
    match recorded {
        Value::Null => true,
        Value::Object(fields) => fields.iter().all(|(name, value)| actual.get(name) == Some(value)),
        other => other == actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn call(seq: u64, port: &str, method: &str, input: Value, output: Value) -> Interaction {
        Interaction { seq, port: port.into(), method: method.into(), input, output }
    }

    fn replayer(interactions: Vec<Interaction>) -> CassetteReplayer {
        CassetteReplayer::new(&Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        })
    }

    #[test]
    fn streams_are_independent_per_method() {
        let mut replayer = replayer(vec![
            call(0, "fs", "exists", json!({"path": "/a/spec.md"}), json!(true)),
            call(1, "issues", "list_issues", json!({"repo": null}), json!({"Ok": []})),
            call(2, "fs", "exists", json!({"path": "/a/plan.md"}), json!(false)),
        ]);

        let listed = replayer.next_interaction("issues", "list_issues", &json!({"repo": null}));
        assert_eq!(listed.unwrap().seq, 1);

        let spec = replayer.next_interaction("fs", "exists", &json!({"path": "/a/spec.md"}));
        assert_eq!(spec.unwrap().output, json!(true));
        let plan = replayer.next_interaction("fs", "exists", &json!({"path": "/a/plan.md"}));
        assert_eq!(plan.unwrap().output, json!(false));

        assert_eq!(replayer.remaining(), 0);
    }

    #[test]
    fn mismatched_input_is_reported_and_left_queued() {
        let recorded = json!({"path": "/a/tasks.md"});
        let mut replayer = replayer(vec![call(0, "fs", "read_bytes", recorded, json!({"Ok": ""}))]);

        let actual = json!({"path": "/b/tasks.md"});
        let err = replayer.next_interaction("fs", "read_bytes", &actual).unwrap_err();
        assert!(matches!(err, ReplayError::InputMismatch { seq: 0, .. }));
        assert!(err.to_string().contains("/b/tasks.md"));
        assert_eq!(replayer.remaining(), 1);
    }

    #[test]
    fn unrecorded_fields_are_not_checked() {
        let mut replayer = replayer(vec![
            call(0, "issues", "ensure_label", json!({"name": "task"}), json!({"Ok": null})),
            call(1, "issues", "create_issue", json!({}), json!({"Ok": "url"})),
        ]);
        let label = json!({"name": "task", "color": "0075ca", "repo": "o/r"});
        assert!(replayer.next_interaction("issues", "ensure_label", &label).is_ok());
        let draft = json!({"draft": {"title": "t"}, "repo": null});
        assert!(replayer.next_interaction("issues", "create_issue", &draft).is_ok());
    }

    #[test]
    fn exhausted_stream_names_what_is_left() {
        let mut replayer = replayer(vec![
            call(0, "fs", "exists", json!({}), json!(true)),
            call(1, "issues", "current_repo", json!({}), json!({"Ok": "o/r"})),
        ]);
        replayer.next_interaction("fs", "exists", &json!({"path": "/a"})).unwrap();

        let err = replayer.next_interaction("fs", "exists", &json!({"path": "/a"})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cassette exhausted: no fs::exists interaction left \
             (still queued: [issues::current_repo x1])"
        );
        assert!(matches!(
            replayer.next_interaction("shell", "run", &json!({})),
            Err(ReplayError::Exhausted { .. })
        ));
    }
}
