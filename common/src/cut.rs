use crate::Time;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The two delay windows a straw hit is tested against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CutPolicy {
    #[strum(to_string = "short")]
    Short,
    #[strum(to_string = "long")]
    Long,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CutWidths {
    pub short: Time,
    pub long: Time,
}

impl Default for CutWidths {
    fn default() -> Self {
        Self {
            short: 75,
            long: 500,
        }
    }
}

impl CutWidths {
    pub fn width(&self, policy: CutPolicy) -> Time {
        match policy {
            CutPolicy::Short => self.short,
            CutPolicy::Long => self.long,
        }
    }

    /// True when `straw` lies strictly inside `(strike, strike + width)` for `policy`.
    ///
    /// The delay is compared against the width, so no window end is ever
    /// computed and extreme times cannot overflow.
    pub fn admits(&self, policy: CutPolicy, strike: Time, straw: Time) -> bool {
        straw
            .checked_sub(strike)
            .is_some_and(|delay| delay > 0 && delay < self.width(policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn window_is_open_at_both_ends() {
        let cuts = CutWidths::default();
        assert!(!cuts.admits(CutPolicy::Short, 1000, 1000));
        assert!(!cuts.admits(CutPolicy::Short, 1000, 1075));
        assert!(cuts.admits(CutPolicy::Short, 1000, 1074));
        assert!(cuts.admits(CutPolicy::Long, 1000, 1075));
        assert!(!cuts.admits(CutPolicy::Long, 1000, 999));
    }

    #[test]
    fn extreme_times_do_not_overflow() {
        let cuts = CutWidths::default();
        assert!(cuts.admits(CutPolicy::Long, Time::MAX - 10, Time::MAX));
        assert!(!cuts.admits(CutPolicy::Short, Time::MAX - 100, Time::MAX));
        assert!(!cuts.admits(CutPolicy::Long, Time::MIN, Time::MAX));
        assert!(!cuts.admits(CutPolicy::Long, Time::MAX, Time::MIN));

        let unbounded = CutWidths {
            short: 75,
            long: Time::MAX,
        };
        assert!(unbounded.admits(CutPolicy::Long, 1000, Time::MAX));
        assert!(!unbounded.admits(CutPolicy::Long, 1000, 1000));
    }

    #[test]
    fn policies_iterate_short_first() {
        assert_eq!(
            CutPolicy::iter().collect::<Vec<_>>(),
            vec![CutPolicy::Short, CutPolicy::Long]
        );
        assert_eq!(CutPolicy::Long.to_string(), "long");
    }
}
