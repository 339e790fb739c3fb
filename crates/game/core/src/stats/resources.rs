//! Resource pools (HP, MP).
//!
//! Current values are always kept inside `[0, maximum]`; every mutation goes
//! through a method that clamps and reports the amount actually applied.

/// Integer resource meter tracked per combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    current: u32,
    maximum: u32,
}

impl ResourceMeter {
    /// Builds a meter, clamping `current` to `maximum`.
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    pub fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn maximum(&self) -> u32 {
        self.maximum
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.maximum
    }

    /// Removes up to `amount`, returning what was actually removed.
    pub fn damage(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.current);
        self.current -= applied;
        applied
    }

    /// Adds up to `amount` without exceeding the maximum.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.maximum - self.current);
        self.current += applied;
        applied
    }

    /// Spends exactly `amount` or nothing at all.
    pub fn spend(&mut self, amount: u32) -> bool {
        if self.current < amount {
            return false;
        }
        self.current -= amount;
        true
    }

    pub fn refill(&mut self) {
        self.current = self.maximum;
    }

    /// Raises the ceiling without touching the current value.
    pub fn raise_maximum(&mut self, amount: u32) {
        self.maximum = self.maximum.saturating_add(amount);
    }

    /// Overwrites the current value, clamped to the maximum.
    pub fn set_current(&mut self, value: u32) {
        self.current = value.min(self.maximum);
    }
}
