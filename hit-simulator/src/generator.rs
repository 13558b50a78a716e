use anyhow::{Context, Result};
use rand::Rng;
use rand_distr::{Distribution, Exp, Poisson};
use strawscint_common::{Channel, EventNumber, Hit, RunNumber, Time};

/// Parameters of the synthetic detector.
#[derive(Clone, Debug)]
pub(crate) struct SimulationConfig {
    /// Mean number of scintillator strikes per event.
    pub(crate) mean_strikes: f64,
    /// Mean number of straw hits following each strike.
    pub(crate) mean_straws_per_strike: f64,
    /// Mean delay of a straw hit after its strike.
    pub(crate) mean_straw_delay: f64,
    /// Mean number of uncorrelated straw hits per event.
    pub(crate) mean_noise_straws: f64,
    /// Strikes and noise are spread uniformly over `[0, event_window)`.
    pub(crate) event_window: Time,
    pub(crate) straw_wires: Channel,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mean_strikes: 1.5,
            mean_straws_per_strike: 3.0,
            mean_straw_delay: 60.0,
            mean_noise_straws: 1.0,
            event_window: 1000,
            straw_wires: 64,
        }
    }
}

/// The hits of one simulated event, each list in time order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SimulatedEvent {
    pub(crate) scint: Vec<Hit>,
    pub(crate) straws: Vec<Hit>,
}

/// Poisson distributed count, where a mean of zero always gives zero.
#[derive(Debug)]
struct Count(Option<Poisson<f64>>);

impl Count {
    fn new(mean: f64, name: &str) -> Result<Self> {
        if mean == 0.0 {
            return Ok(Self(None));
        }
        Ok(Self(Some(Poisson::new(mean).with_context(|| {
            format!("failed to create poisson distribution of {name}")
        })?)))
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        self.0
            .as_ref()
            .map(|poisson| poisson.sample(rng) as usize)
            .unwrap_or_default()
    }
}

#[derive(Debug)]
pub(crate) struct HitGenerator<R> {
    strikes: Count,
    straws_per_strike: Count,
    noise_straws: Count,
    straw_delay: Exp<f64>,
    event_window: Time,
    straw_wires: Channel,
    rng: R,
}

impl<R> HitGenerator<R>
where
    R: Rng,
{
    pub(crate) fn new(config: &SimulationConfig, rng: R) -> Result<Self> {
        anyhow::ensure!(config.event_window > 0, "event window must be positive");
        anyhow::ensure!(config.straw_wires > 0, "there must be at least one straw wire");
        Ok(Self {
            strikes: Count::new(config.mean_strikes, "strikes")?,
            straws_per_strike: Count::new(config.mean_straws_per_strike, "straws per strike")?,
            noise_straws: Count::new(config.mean_noise_straws, "noise straws")?,
            straw_delay: Exp::new(1.0 / config.mean_straw_delay)
                .context("failed to create exponential distribution of straw delays")?,
            event_window: config.event_window,
            straw_wires: config.straw_wires,
            rng,
        })
    }

    fn straw(&mut self, run: RunNumber, event: EventNumber, time: Time) -> Hit {
        let wire = self.rng.random_range(0..self.straw_wires);
        Hit::new(run, event, wire, time)
    }

    pub(crate) fn event(&mut self, run: RunNumber, event: EventNumber) -> SimulatedEvent {
        let mut simulated = SimulatedEvent::default();

        for _ in 0..self.strikes.sample(&mut self.rng) {
            let paddle = if self.rng.random_bool(0.5) { 1 } else { 0 };
            let time = self.rng.random_range(0..self.event_window);
            simulated.scint.push(Hit::new(run, event, paddle, time));

            for _ in 0..self.straws_per_strike.sample(&mut self.rng) {
                // Straws always fire strictly after the strike.
                let delay = (self.straw_delay.sample(&mut self.rng).ceil() as Time).max(1);
                let straw = self.straw(run, event, time + delay);
                simulated.straws.push(straw);
            }
        }
        for _ in 0..self.noise_straws.sample(&mut self.rng) {
            let time = self.rng.random_range(0..self.event_window);
            let straw = self.straw(run, event, time);
            simulated.straws.push(straw);
        }

        simulated.scint.sort_by_key(|hit| hit.time);
        simulated.straws.sort_by_key(|hit| hit.time);
        simulated
    }
}
