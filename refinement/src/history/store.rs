//! Append-only store holding the unified log and the two track logs.

use thiserror::Error;

use super::record::{RoundRecord, Track};

/// Error raised on an invalid append.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// A record arrived with a round number lower than the track's last.
    #[error("non-monotonic round {round} for {track} track (last appended round is {last})")]
    NonMonotonicRound { track: Track, round: u32, last: u32 },
}

/// In-memory history with a unified view and per-track projections.
///
/// `append` is the only mutation: a committed record lands in the unified
/// log and in its track's log and is never touched again. Round numbers
/// must be non-decreasing per track.
#[derive(Debug, Default, Clone)]
pub struct HistoryStore {
    unified: Vec<RoundRecord>,
    style: Vec<RoundRecord>,
    object: Vec<RoundRecord>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finalized record to the unified log and its track log.
    pub fn append(&mut self, record: RoundRecord) -> Result<(), HistoryError> {
        if let Some(last) = self.track(record.track).last().map(|r| r.round) {
            if record.round < last {
                return Err(HistoryError::NonMonotonicRound {
                    track: record.track,
                    round: record.round,
                    last,
                });
            }
        }

        match record.track {
            Track::Style => self.style.push(record.clone()),
            Track::Object => self.object.push(record.clone()),
        }
        self.unified.push(record);
        Ok(())
    }

    /// All committed records, in commit order.
    pub fn unified(&self) -> &[RoundRecord] {
        &self.unified
    }

    /// The named track's committed records, in commit order.
    pub fn track(&self, track: Track) -> &[RoundRecord] {
        match track {
            Track::Style => &self.style,
            Track::Object => &self.object,
        }
    }

    /// Number of committed records across both tracks.
    pub fn len(&self) -> usize {
        self.unified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unified.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(round: u32, track: Track) -> RoundRecord {
        RoundRecord::provisional(round, track, &format!("{} r{}", track, round), false)
            .with_ask("ask", false)
    }

    #[test]
    fn test_append_preserves_commit_order() {
        let mut store = HistoryStore::new();
        store.append(record(1, Track::Style)).unwrap();
        store.append(record(1, Track::Object)).unwrap();
        store.append(record(2, Track::Style)).unwrap();
        store.append(record(2, Track::Object)).unwrap();

        let rounds: Vec<(u32, Track)> =
            store.unified().iter().map(|r| (r.round, r.track)).collect();
        assert_eq!(
            rounds,
            vec![
                (1, Track::Style),
                (1, Track::Object),
                (2, Track::Style),
                (2, Track::Object),
            ]
        );
    }

    #[test]
    fn test_track_views_are_isolated() {
        let mut store = HistoryStore::new();
        store.append(record(1, Track::Style)).unwrap();
        store.append(record(1, Track::Object)).unwrap();
        store.append(record(2, Track::Style)).unwrap();

        assert_eq!(store.track(Track::Style).len(), 2);
        assert_eq!(store.track(Track::Object).len(), 1);
        assert!(store
            .track(Track::Style)
            .iter()
            .all(|r| r.track == Track::Style));
        assert!(store
            .track(Track::Object)
            .iter()
            .all(|r| r.track == Track::Object));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_rejects_lower_round_per_track() {
        let mut store = HistoryStore::new();
        store.append(record(2, Track::Style)).unwrap();

        let err = store.append(record(1, Track::Style)).unwrap_err();
        assert_eq!(
            err,
            HistoryError::NonMonotonicRound {
                track: Track::Style,
                round: 1,
                last: 2,
            }
        );
        // The object track is unaffected by the style track's high-water mark.
        store.append(record(1, Track::Object)).unwrap();
    }

    #[test]
    fn test_empty_store() {
        let store = HistoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.unified().len(), 0);
        assert_eq!(store.track(Track::Style).len(), 0);
    }

    #[test]
    fn test_error_display() {
        let err = HistoryError::NonMonotonicRound {
            track: Track::Object,
            round: 1,
            last: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("non-monotonic"));
        assert!(msg.contains("object"));
    }
}
