//! Per-event scan of the combined scintillator stream.
//!
//! The stream is expected to arrive grouped by run and event. Each time the
//! `(run, event)` key changes the open event is closed and summarised: how
//! many times each paddle fired, and the smallest gap between consecutive
//! hits on alternating paddles.
use strawscint_common::{Channel, EventKey, Hit, Time};
use tracing::trace;

/// Only the two paddles are counted.
pub(crate) const SCINT_CHANNELS: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct EventSummary {
    pub(crate) key: EventKey,
    /// Hits on channel 0 and channel 1.
    pub(crate) channel_counts: [u32; SCINT_CHANNELS],
    /// Smallest gap between consecutive hits on different paddles, if any.
    pub(crate) min_gap: Option<Time>,
}

#[derive(Debug)]
struct OpenEvent {
    key: EventKey,
    channel_counts: [u32; SCINT_CHANNELS],
    gaps: Vec<Time>,
}

impl OpenEvent {
    fn new(key: EventKey) -> Self {
        Self {
            key,
            channel_counts: Default::default(),
            gaps: Vec::new(),
        }
    }

    fn count(&mut self, channel: Channel) {
        match usize::try_from(channel)
            .ok()
            .and_then(|channel| self.channel_counts.get_mut(channel))
        {
            Some(count) => *count += 1,
            None => trace!("Ignoring hit on channel {channel} in {:?}", self.key),
        }
    }

    fn close(self) -> EventSummary {
        EventSummary {
            key: self.key,
            channel_counts: self.channel_counts,
            min_gap: self.gaps.iter().copied().min(),
        }
    }
}

/// The rolling state of the scan.
///
/// Feed every hit, in stream order, to [`DelayFold::push`], then call
/// [`DelayFold::finish`] to close the final event.
#[derive(Debug, Default)]
pub(crate) struct DelayFold {
    open: Option<OpenEvent>,
    previous: Option<Hit>,
}

impl DelayFold {
    /// Adds `hit` to the scan, returning the summary of the event it closed.
    pub(crate) fn push(&mut self, hit: &Hit) -> Option<EventSummary> {
        let key = hit.key();
        let closed = match self.open.take() {
            Some(open) if open.key == key => {
                self.open = Some(open);
                None
            }
            open => open.map(OpenEvent::close),
        };
        let open = self.open.get_or_insert_with(|| OpenEvent::new(key));

        // Only compare against the previous hit if it was in this event, which
        // also means it was in this run.
        if let Some(previous) = self.previous.filter(|previous| previous.key() == key) {
            if previous.channel != hit.channel {
                match hit.time.checked_sub(previous.time) {
                    Some(gap) => open.gaps.push(gap),
                    None => trace!(
                        "Gap from {} to {} in {key:?} is out of range",
                        previous.time,
                        hit.time
                    ),
                }
            }
        }
        open.count(hit.channel);
        self.previous = Some(*hit);

        closed
    }

    pub(crate) fn finish(self) -> Option<EventSummary> {
        self.open.map(OpenEvent::close)
    }
}

/// Iterator adapter yielding one [`EventSummary`] per event of the wrapped hits.
pub(crate) struct EventSummaries<I> {
    hits: I,
    fold: Option<DelayFold>,
}

impl<'a, I> Iterator for EventSummaries<I>
where
    I: Iterator<Item = &'a Hit>,
{
    type Item = EventSummary;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let fold = self.fold.as_mut()?;
            match self.hits.next() {
                Some(hit) => {
                    if let Some(summary) = fold.push(hit) {
                        return Some(summary);
                    }
                }
                None => return self.fold.take().and_then(DelayFold::finish),
            }
        }
    }
}

pub(crate) fn summarise_events<'a, I>(hits: I) -> EventSummaries<I::IntoIter>
where
    I: IntoIterator<Item = &'a Hit>,
{
    EventSummaries {
        hits: hits.into_iter(),
        fold: Some(DelayFold::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summaries(hits: &[Hit]) -> Vec<EventSummary> {
        summarise_events(hits).collect()
    }

    #[test]
    fn alternating_hits_give_minimum_gap() {
        let hits = [
            Hit::new(7, 1, 0, 10),
            Hit::new(7, 1, 1, 40),
            Hit::new(7, 1, 0, 55),
        ];

        let mut fold = DelayFold::default();
        assert!(hits.iter().all(|hit| fold.push(hit).is_none()));
        assert_eq!(fold.open.as_ref().map(|open| open.gaps.clone()), Some(vec![30, 15]));

        assert_eq!(
            fold.finish(),
            Some(EventSummary {
                key: EventKey::new(7, 1),
                channel_counts: [2, 1],
                min_gap: Some(15),
            })
        );
    }

    #[test]
    fn same_channel_hits_give_no_gap() {
        let hits = [
            Hit::new(1, 1, 0, 10),
            Hit::new(1, 1, 0, 20),
            Hit::new(1, 1, 1, 70),
            Hit::new(1, 1, 1, 71),
        ];
        let summary = summaries(&hits);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary.first().and_then(|s| s.min_gap), Some(50));
        assert_eq!(summary.first().map(|s| s.channel_counts), Some([2, 2]));
    }

    #[test]
    fn event_boundaries_close_and_reset() {
        let hits = [
            Hit::new(1, 1, 0, 100),
            Hit::new(1, 1, 1, 140),
            Hit::new(1, 2, 1, 5),
            Hit::new(1, 2, 1, 9),
            Hit::new(1, 3, 0, 1000),
        ];

        let mut fold = DelayFold::default();
        let closed: Vec<_> = hits.iter().filter_map(|hit| fold.push(hit)).collect();
        assert_eq!(
            closed,
            vec![
                EventSummary {
                    key: EventKey::new(1, 1),
                    channel_counts: [1, 1],
                    min_gap: Some(40),
                },
                EventSummary {
                    key: EventKey::new(1, 2),
                    channel_counts: [0, 2],
                    min_gap: None,
                },
            ]
        );
        assert_eq!(
            fold.finish(),
            Some(EventSummary {
                key: EventKey::new(1, 3),
                channel_counts: [1, 0],
                min_gap: None,
            })
        );
    }

    #[test]
    fn hits_are_never_compared_across_runs() {
        // Same event number in a new run, and the channel alternates
        let hits = [Hit::new(1, 4, 0, 100), Hit::new(2, 4, 1, 101)];
        let summary = summaries(&hits);
        assert_eq!(summary.len(), 2);
        assert!(summary.iter().all(|s| s.min_gap.is_none()));
    }

    #[test]
    fn other_channels_are_not_counted_but_still_alternate() {
        let hits = [Hit::new(1, 1, 0, 100), Hit::new(1, 1, 5, 103)];
        let summary = summaries(&hits);
        assert_eq!(
            summary,
            vec![EventSummary {
                key: EventKey::new(1, 1),
                channel_counts: [1, 0],
                min_gap: Some(3),
            }]
        );
    }

    #[test]
    fn out_of_range_gaps_are_skipped() {
        let hits = [
            Hit::new(1, 1, 0, Time::MIN),
            Hit::new(1, 1, 1, Time::MAX - 5),
            Hit::new(1, 1, 0, Time::MAX),
        ];
        assert_eq!(
            summaries(&hits),
            vec![EventSummary {
                key: EventKey::new(1, 1),
                channel_counts: [2, 1],
                min_gap: Some(5),
            }]
        );
    }

    #[test]
    fn empty_stream_has_no_events() {
        assert!(summaries(&[]).is_empty());
        assert_eq!(DelayFold::default().finish(), None);
    }
}
