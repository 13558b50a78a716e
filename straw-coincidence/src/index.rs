use std::collections::HashMap;
use strawscint_common::{cut::CutPolicy, EventKey, Hit, Time};

/// Straw hit times matched to one strike under one delay cut.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct StrawHitCluster {
    times: Vec<Time>,
}

impl StrawHitCluster {
    pub(crate) fn push(&mut self, time: Time) {
        self.times.push(time);
    }

    pub(crate) fn len(&self) -> usize {
        self.times.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub(crate) fn times(&self) -> &[Time] {
        &self.times
    }
}

/// A scintillator hit, together with the straws found after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ScintStrike {
    key: EventKey,
    time: Time,
    short_cut: StrawHitCluster,
    long_cut: StrawHitCluster,
}

impl ScintStrike {
    pub(crate) fn new(hit: &Hit) -> Self {
        Self {
            key: hit.key(),
            time: hit.time,
            short_cut: StrawHitCluster::default(),
            long_cut: StrawHitCluster::default(),
        }
    }

    pub(crate) fn key(&self) -> EventKey {
        self.key
    }

    pub(crate) fn time(&self) -> Time {
        self.time
    }

    pub(crate) fn cluster(&self, policy: CutPolicy) -> &StrawHitCluster {
        match policy {
            CutPolicy::Short => &self.short_cut,
            CutPolicy::Long => &self.long_cut,
        }
    }

    pub(crate) fn cluster_mut(&mut self, policy: CutPolicy) -> &mut StrawHitCluster {
        match policy {
            CutPolicy::Short => &mut self.short_cut,
            CutPolicy::Long => &mut self.long_cut,
        }
    }

    /// Delay of each straw in the cluster for `policy` after this strike.
    pub(crate) fn delays(&self, policy: CutPolicy) -> impl Iterator<Item = Time> + '_ {
        self.cluster(policy)
            .times()
            .iter()
            .map(move |time| time - self.time)
    }
}

/// Scintillator strikes grouped by the event they were recorded in.
///
/// Strikes keep the order they were inserted in, which need not be time
/// order. Coincidence windows are tested against every strike of an event, so
/// no sorting is required.
#[derive(Debug, Default)]
pub(crate) struct EventIndex {
    events: HashMap<EventKey, Vec<ScintStrike>>,
    strike_count: usize,
}

impl EventIndex {
    pub(crate) fn build<'a, I>(scint_hits: I) -> Self
    where
        I: IntoIterator<Item = &'a Hit>,
    {
        let mut index = Self::default();
        for hit in scint_hits {
            index.insert(ScintStrike::new(hit));
        }
        index
    }

    fn insert(&mut self, strike: ScintStrike) {
        self.events.entry(strike.key()).or_default().push(strike);
        self.strike_count += 1;
    }

    /// The strikes recorded in `key`, empty if there were none.
    #[cfg(test)]
    pub(crate) fn lookup(&self, key: &EventKey) -> &[ScintStrike] {
        self.events.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mutable counterpart of `lookup`, also empty if `key` has no strikes.
    pub(crate) fn lookup_mut(&mut self, key: &EventKey) -> &mut [ScintStrike] {
        match self.events.get_mut(key) {
            Some(strikes) => strikes.as_mut_slice(),
            None => &mut [],
        }
    }

    pub(crate) fn events(&self) -> impl Iterator<Item = (&EventKey, &[ScintStrike])> {
        self.events
            .iter()
            .map(|(key, strikes)| (key, strikes.as_slice()))
    }

    pub(crate) fn strikes(&self) -> impl Iterator<Item = &ScintStrike> {
        self.events.values().flatten()
    }

    pub(crate) fn len(&self) -> usize {
        self.strike_count
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.strike_count == 0
    }

    pub(crate) fn event_count(&self) -> usize {
        self.events.len()
    }
}
