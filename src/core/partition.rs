//! Proportional partition of a circle into contiguous sectors.

use crate::domain::model::{Category, Direction, Sector};
use crate::utils::error::{InfographicError, Result};
use serde::{Deserialize, Serialize};

pub const FULL_TURN: f64 = 360.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartitionOptions {
    /// Degrees; 90 is the top of the circle.
    pub start_angle: f64,
    pub direction: Direction,
}

impl Default for PartitionOptions {
    fn default() -> Self {
        Self {
            start_angle: 90.0,
            direction: Direction::Clockwise,
        }
    }
}

/// Split a full turn among `categories` in proportion to their weights.
///
/// Sectors come back in input order. Each sector starts where the previous
/// one ended, and the last one ends exactly one full turn away from
/// `start_angle`.
///
/// Fails with [`InfographicError::InvalidInput`] when the list is empty or a
/// weight is not a finite positive number.
pub fn partition_sectors(
    categories: &[Category],
    start_angle: f64,
    direction: Direction,
) -> Result<Vec<Sector>> {
    if categories.is_empty() {
        return Err(InfographicError::invalid_input("category list is empty"));
    }
    if !start_angle.is_finite() {
        return Err(InfographicError::invalid_input(format!(
            "start angle {} is not finite",
            start_angle
        )));
    }

    for category in categories {
        if !category.weight.is_finite() || category.weight <= 0.0 {
            return Err(InfographicError::invalid_input(format!(
                "category '{}' has non-positive weight {}",
                category.name, category.weight
            )));
        }
    }

    // scale by the largest weight so huge finite weights cannot overflow the sum
    let largest = categories.iter().map(|c| c.weight).fold(0.0, f64::max);
    let total: f64 = categories.iter().map(|c| c.weight / largest).sum();

    let sign = direction.sign();
    let closure = start_angle + sign * FULL_TURN;
    let last = categories.len() - 1;

    let mut current = start_angle;
    let mut sectors = Vec::with_capacity(categories.len());

    for (i, category) in categories.iter().enumerate() {
        let span = category.weight / largest / total * FULL_TURN;
        // snap the final edge so the ring closes without drift
        let end = if i == last { closure } else { current + sign * span };

        sectors.push(Sector {
            category: category.clone(),
            start_angle: current,
            end_angle: end,
        });
        current = end;
    }

    tracing::debug!(
        "Partitioned {} categories from {}° {:?}",
        sectors.len(),
        start_angle,
        direction
    );

    Ok(sectors)
}

pub fn partition_with(categories: &[Category], options: PartitionOptions) -> Result<Vec<Sector>> {
    partition_sectors(categories, options.start_angle, options.direction)
}

pub fn total_weight(categories: &[Category]) -> f64 {
    categories.iter().map(|c| c.weight).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn fields() -> Vec<Category> {
        vec![
            Category::new("A", 6.0),
            Category::new("B", 5.0),
            Category::new("C", 4.0),
            Category::new("D", 2.0),
        ]
    }

    #[test]
    fn test_reference_partition_clockwise() {
        let sectors = partition_sectors(&fields(), 90.0, Direction::Clockwise).unwrap();

        let spans: Vec<f64> = sectors.iter().map(Sector::span).collect();
        let expected = [127.06, 105.88, 84.71, 42.35];
        for (span, want) in spans.iter().zip(expected) {
            assert!((span - want).abs() < 0.01, "span {} vs {}", span, want);
        }

        let boundaries = [90.0, -37.06, -142.94, -227.65];
        for (sector, want) in sectors.iter().zip(boundaries) {
            assert!((sector.start_angle - want).abs() < 0.01);
        }
        assert_eq!(sectors[3].end_angle, -270.0);
    }

    #[test]
    fn test_sectors_are_contiguous() {
        let sectors = partition_sectors(&fields(), 90.0, Direction::Clockwise).unwrap();
        for pair in sectors.windows(2) {
            assert_eq!(pair[0].end_angle, pair[1].start_angle);
        }
    }

    #[test]
    fn test_spans_sum_to_full_turn() {
        let sectors = partition_sectors(&fields(), 12.5, Direction::CounterClockwise).unwrap();
        let sum: f64 = sectors.iter().map(Sector::span).sum();
        assert!((sum - FULL_TURN).abs() < EPS);
        assert_eq!(sectors.last().unwrap().end_angle, 12.5 + FULL_TURN);
    }

    #[test]
    fn test_counter_clockwise_increases_angle() {
        let sectors = partition_sectors(&fields(), 0.0, Direction::CounterClockwise).unwrap();
        for sector in &sectors {
            assert!(sector.end_angle > sector.start_angle);
        }
    }

    #[test]
    fn test_single_category_is_full_circle() {
        let sectors = partition_sectors(&[Category::new("only", 3.0)], 90.0, Direction::Clockwise)
            .unwrap();
        assert_eq!(sectors.len(), 1);
        assert_eq!(sectors[0].start_angle, 90.0);
        assert_eq!(sectors[0].end_angle, -270.0);
        assert_eq!(sectors[0].span(), FULL_TURN);
    }

    #[test]
    fn test_empty_list_is_invalid() {
        let err = partition_sectors(&[], 90.0, Direction::Clockwise).unwrap_err();
        assert!(matches!(err, InfographicError::InvalidInput { .. }));
    }

    #[test]
    fn test_zero_and_negative_weights_are_invalid() {
        for bad in [0.0, -2.0, f64::NAN] {
            let categories = vec![Category::new("A", 1.0), Category::new("B", bad)];
            let err = partition_sectors(&categories, 90.0, Direction::Clockwise).unwrap_err();
            assert!(matches!(err, InfographicError::InvalidInput { .. }));
        }
    }

    #[test]
    fn test_huge_finite_weights_do_not_overflow() {
        let categories = vec![Category::new("A", f64::MAX), Category::new("B", f64::MAX)];
        let sectors = partition_sectors(&categories, 90.0, Direction::Clockwise).unwrap();

        assert_eq!(sectors.len(), 2);
        assert_eq!(sectors[0].span(), 180.0);
        assert_eq!(sectors[1].span(), 180.0);
        assert_eq!(sectors[0].end_angle, -90.0);
        assert_eq!(sectors[1].end_angle, -270.0);
    }

    #[test]
    fn test_partition_is_idempotent() {
        let first = partition_with(&fields(), PartitionOptions::default()).unwrap();
        let second = partition_with(&fields(), PartitionOptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_mid_angle_of_first_sector() {
        let sectors = partition_sectors(&fields(), 90.0, Direction::Clockwise).unwrap();
        let mid = sectors[0].mid_angle();
        assert!((mid - (90.0 - 127.0588235294 / 2.0)).abs() < 1e-6);
        let (x, y) = sectors[0].point_at(1.0);
        assert!(x > 0.0 && y > 0.0);
    }
}
