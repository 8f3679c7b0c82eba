//! Stage flags tracked by the efficiency configurer.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Set of stages already queued on a configurer.
///
/// MWR, Sharpe and information ratio are never prerequisites of anything,
/// so they have no flag.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CalculationStage(u16);

impl CalculationStage {
    pub const INITIALIZED: Self = Self(0);
    pub const GROWTH_RATES: Self = Self(1);
    pub const LIFE_TIME: Self = Self(1 << 1);
    pub const INCOME: Self = Self(1 << 2);
    pub const AVERAGE_PORTFOLIO: Self = Self(1 << 3);
    pub const TWR: Self = Self(1 << 4);
    pub const STD: Self = Self(1 << 5);
    pub const BENCHMARKS: Self = Self(1 << 6);

    const NAMES: [(Self, &'static str); 7] = [
        (Self::GROWTH_RATES, "growth rates"),
        (Self::LIFE_TIME, "life-time"),
        (Self::INCOME, "income"),
        (Self::AVERAGE_PORTFOLIO, "average portfolio"),
        (Self::TWR, "TWR"),
        (Self::STD, "STD"),
        (Self::BENCHMARKS, "benchmarks"),
    ];

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Flags in `self` that are not in `other`.
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn names(self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl BitOr for CalculationStage {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for CalculationStage {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Display for CalculationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("nothing");
        }
        f.write_str(&self.names().join(", "))
    }
}

impl fmt::Debug for CalculationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CalculationStage({})", self)
    }
}

/// Metrics a configurer can compute.
///
/// Variant order is the evaluation order used at finalization, so every
/// metric is evaluated after the metrics it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    LifeTime,
    Income,
    AveragePortfolio,
    Mwr,
    Twr,
    Std,
    SharpeRatio,
    InformationRatio,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::LifeTime => "Life-time",
            Metric::Income => "Income",
            Metric::AveragePortfolio => "Average portfolio",
            Metric::Mwr => "MWR",
            Metric::Twr => "TWR",
            Metric::Std => "STD",
            Metric::SharpeRatio => "Sharpe ratio",
            Metric::InformationRatio => "Information ratio",
        };
        f.write_str(name)
    }
}
