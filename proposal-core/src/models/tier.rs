use serde::{Deserialize, Serialize};

/// Warranty duration offered on a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Ten,
    Fifteen,
    Twenty,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Ten, Tier::Fifteen, Tier::Twenty];

    pub fn years(&self) -> u32 {
        match self {
            Self::Ten => 10,
            Self::Fifteen => 15,
            Self::Twenty => 20,
        }
    }
}

/// One value per warranty tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierValues<T> {
    pub ten: T,
    pub fifteen: T,
    pub twenty: T,
}

impl<T> TierValues<T> {
    pub const fn new(
        ten: T,
        fifteen: T,
        twenty: T,
    ) -> Self {
        Self {
            ten,
            fifteen,
            twenty,
        }
    }

    pub fn get(
        &self,
        tier: Tier,
    ) -> &T {
        match tier {
            Tier::Ten => &self.ten,
            Tier::Fifteen => &self.fifteen,
            Tier::Twenty => &self.twenty,
        }
    }

    pub fn map<U>(
        self,
        mut f: impl FnMut(T) -> U,
    ) -> TierValues<U> {
        TierValues {
            ten: f(self.ten),
            fifteen: f(self.fifteen),
            twenty: f(self.twenty),
        }
    }
}

impl<T: Clone> TierValues<T> {
    pub fn splat(value: T) -> Self {
        Self {
            ten: value.clone(),
            fifteen: value.clone(),
            twenty: value,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn get_returns_value_for_each_tier() {
        let values = TierValues::new(1, 2, 3);

        let collected: Vec<_> = Tier::ALL.iter().map(|t| *values.get(*t)).collect();

        assert_eq!(collected, vec![1, 2, 3]);
    }

    #[test]
    fn map_applies_to_every_tier() {
        let values = TierValues::new(1, 2, 3).map(|v| v * 10);

        assert_eq!(values, TierValues::new(10, 20, 30));
    }

    #[test]
    fn years_match_tier() {
        assert_eq!(Tier::Fifteen.years(), 15);
    }
}
