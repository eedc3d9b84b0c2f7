use rust_decimal::Decimal;

/// Hours per day which count as regular work; anything above is overtime.
pub const REGULAR_HOURS_PER_DAY: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoursSplit {
    pub total: Decimal,
    pub regular: Decimal,
    pub overtime: Decimal,
}

impl HoursSplit {
    pub fn from_total(total: Decimal) -> Self {
        let threshold = Decimal::from(REGULAR_HOURS_PER_DAY);
        Self {
            total,
            regular: total.min(threshold),
            overtime: (total - threshold).max(Decimal::ZERO),
        }
    }
}

impl FromIterator<Decimal> for HoursSplit {
    fn from_iter<I: IntoIterator<Item = Decimal>>(iter: I) -> Self {
        Self::from_total(iter.into_iter().sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_with_overtime() {
        let split: HoursSplit = [Decimal::new(300, 2), Decimal::new(400, 2), Decimal::new(200, 2)]
            .into_iter()
            .collect();
        assert_eq!(Decimal::new(9, 0), split.total);
        assert_eq!(Decimal::new(8, 0), split.regular);
        assert_eq!(Decimal::new(1, 0), split.overtime);
    }

    #[test]
    fn test_split_below_threshold() {
        let split = HoursSplit::from_total(Decimal::new(750, 2));
        assert_eq!(Decimal::new(750, 2), split.regular);
        assert_eq!(Decimal::ZERO, split.overtime);
    }

    #[test]
    fn test_split_exactly_at_threshold() {
        let split = HoursSplit::from_total(Decimal::new(8, 0));
        assert_eq!(Decimal::new(8, 0), split.regular);
        assert_eq!(Decimal::ZERO, split.overtime);
    }

    #[test]
    fn test_split_without_hours() {
        let split: HoursSplit = std::iter::empty().collect();
        assert_eq!(Decimal::ZERO, split.total);
        assert_eq!(Decimal::ZERO, split.regular);
        assert_eq!(Decimal::ZERO, split.overtime);
    }
}
