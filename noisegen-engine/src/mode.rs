//! Algorithm modes and the radio-group flag word that selects them.
//!
//! The host publishes one bit per selectable option in a single `u32`, so a
//! block reads the whole selection with one atomic load. Resolution happens
//! once per block and makes the "nothing selected" and "several selected"
//! states explicit instead of leaving them to an if/else chain.

use core::fmt;
use core::str::FromStr;

use crate::error::EngineError;

/// Shapes served by the [`DistributionSelector`](crate::distribution::DistributionSelector).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DistributionType {
    Uniform,
    Normal,
    Bernoulli,
    Piecewise,
}

/// The noise algorithm driving a channel for one block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AlgorithmMode {
    Uniform,
    FastRecurrence,
    Interpolated,
    DistributionBased(DistributionType),
}

/// One selectable option, in priority order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ModeFlag {
    Uniform = 0,
    FastRecurrence = 1,
    Interpolated = 2,
    Normal = 3,
    Bernoulli = 4,
    Piecewise = 5,
}

impl ModeFlag {
    pub const COUNT: usize = 6;

    /// Every flag, highest priority first.
    pub const ALL: [ModeFlag; Self::COUNT] = [
        ModeFlag::Uniform,
        ModeFlag::FastRecurrence,
        ModeFlag::Interpolated,
        ModeFlag::Normal,
        ModeFlag::Bernoulli,
        ModeFlag::Piecewise,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn bit(self) -> u32 {
        1 << (self as u32)
    }

    #[inline]
    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    #[inline]
    pub fn mode(self) -> AlgorithmMode {
        match self {
            ModeFlag::Uniform => AlgorithmMode::Uniform,
            ModeFlag::FastRecurrence => AlgorithmMode::FastRecurrence,
            ModeFlag::Interpolated => AlgorithmMode::Interpolated,
            ModeFlag::Normal => AlgorithmMode::DistributionBased(DistributionType::Normal),
            ModeFlag::Bernoulli => AlgorithmMode::DistributionBased(DistributionType::Bernoulli),
            ModeFlag::Piecewise => AlgorithmMode::DistributionBased(DistributionType::Piecewise),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ModeFlag::Uniform => "uniform",
            ModeFlag::FastRecurrence => "fast",
            ModeFlag::Interpolated => "interpolated",
            ModeFlag::Normal => "normal",
            ModeFlag::Bernoulli => "bernoulli",
            ModeFlag::Piecewise => "piecewise",
        }
    }
}

impl From<AlgorithmMode> for ModeFlag {
    fn from(mode: AlgorithmMode) -> Self {
        match mode {
            AlgorithmMode::Uniform | AlgorithmMode::DistributionBased(DistributionType::Uniform) => {
                ModeFlag::Uniform
            }
            AlgorithmMode::FastRecurrence => ModeFlag::FastRecurrence,
            AlgorithmMode::Interpolated => ModeFlag::Interpolated,
            AlgorithmMode::DistributionBased(DistributionType::Normal) => ModeFlag::Normal,
            AlgorithmMode::DistributionBased(DistributionType::Bernoulli) => ModeFlag::Bernoulli,
            AlgorithmMode::DistributionBased(DistributionType::Piecewise) => ModeFlag::Piecewise,
        }
    }
}

impl fmt::Display for ModeFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModeFlag {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uniform" | "white" => Ok(ModeFlag::Uniform),
            "fast" | "fast-recurrence" => Ok(ModeFlag::FastRecurrence),
            "interpolated" | "interp" => Ok(ModeFlag::Interpolated),
            "normal" | "gaussian" => Ok(ModeFlag::Normal),
            "bernoulli" => Ok(ModeFlag::Bernoulli),
            "piecewise" => Ok(ModeFlag::Piecewise),
            _ => Err(EngineError::UnknownMode(s.to_string())),
        }
    }
}

/// Result of resolving a flag word.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// No flag asserted: the block is silent.
    None,
    /// Exactly one flag asserted.
    Single(AlgorithmMode),
    /// Several flags asserted: the highest-priority one wins.
    Conflict(AlgorithmMode),
}

impl Selection {
    #[inline]
    pub fn mode(self) -> Option<AlgorithmMode> {
        match self {
            Selection::None => None,
            Selection::Single(m) | Selection::Conflict(m) => Some(m),
        }
    }
}

/// Bitmask over [`ModeFlag`]s.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ModeFlags(u32);

impl ModeFlags {
    const VALID: u32 = (1 << ModeFlag::COUNT) - 1;

    pub const NONE: ModeFlags = ModeFlags(0);

    /// Radio-group word with only `flag` set.
    #[inline]
    pub fn only(flag: ModeFlag) -> Self {
        Self(flag.bit())
    }

    /// Unknown bits are dropped.
    #[inline]
    pub fn from_bits(bits: u32) -> Self {
        Self(bits & Self::VALID)
    }

    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn with(self, flag: ModeFlag, on: bool) -> Self {
        if on { Self(self.0 | flag.bit()) } else { Self(self.0 & !flag.bit()) }
    }

    #[inline]
    pub fn contains(self, flag: ModeFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Pick the active mode for a block.
    #[inline]
    pub fn resolve(self) -> Selection {
        let Some(first) = ModeFlag::ALL.into_iter().find(|f| self.contains(*f)) else {
            return Selection::None;
        };
        if self.count() == 1 {
            Selection::Single(first.mode())
        } else {
            Selection::Conflict(first.mode())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_flag_resolves_to_its_mode() {
        for flag in ModeFlag::ALL {
            assert_eq!(ModeFlags::only(flag).resolve(), Selection::Single(flag.mode()));
        }
    }

    #[test]
    fn empty_word_is_none() {
        assert_eq!(ModeFlags::NONE.resolve(), Selection::None);
        assert_eq!(ModeFlags::NONE.resolve().mode(), None);
    }

    #[test]
    fn conflict_picks_highest_priority() {
        let flags = ModeFlags::NONE
            .with(ModeFlag::Piecewise, true)
            .with(ModeFlag::Interpolated, true)
            .with(ModeFlag::Normal, true);
        assert_eq!(flags.resolve(), Selection::Conflict(AlgorithmMode::Interpolated));
    }

    #[test]
    fn unknown_bits_are_masked() {
        let flags = ModeFlags::from_bits(0xFFFF_FF00 | ModeFlag::Bernoulli.bit());
        assert_eq!(flags, ModeFlags::only(ModeFlag::Bernoulli));
    }

    #[test]
    fn with_clears_flags() {
        let flags = ModeFlags::only(ModeFlag::Normal).with(ModeFlag::Normal, false);
        assert_eq!(flags, ModeFlags::NONE);
    }

    #[test]
    fn parse_names() {
        assert_eq!("Fast".parse::<ModeFlag>().unwrap(), ModeFlag::FastRecurrence);
        assert_eq!("gaussian".parse::<ModeFlag>().unwrap(), ModeFlag::Normal);
        for flag in ModeFlag::ALL {
            assert_eq!(flag.name().parse::<ModeFlag>().unwrap(), flag);
        }
        assert!(matches!("pink".parse::<ModeFlag>(), Err(EngineError::UnknownMode(_))));
    }

    #[test]
    fn algorithm_mode_maps_back_to_flag() {
        for flag in ModeFlag::ALL {
            assert_eq!(ModeFlag::from(flag.mode()), flag);
        }
        assert_eq!(
            ModeFlag::from(AlgorithmMode::DistributionBased(DistributionType::Uniform)),
            ModeFlag::Uniform
        );
    }
}
