//! Five-star rating display.

/// Number of stars in a rating row.
pub const TOTAL_STARS: u8 = 5;

/// How a numeric rating splits into full, half and empty stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarRating {
    pub full: u8,
    pub half: bool,
    pub empty: u8,
}

impl StarRating {
    /// Split `rating` into stars: `floor(rating)` full stars, a half star if
    /// the remainder is at least 0.5, and empty stars up to five.
    ///
    /// Ratings outside `0..=5` (or NaN) are clamped.
    #[must_use]
    pub fn from_rating(rating: f64) -> Self {
        let clamped = if rating.is_nan() {
            0.0
        } else {
            rating.clamp(0.0, f64::from(TOTAL_STARS))
        };

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=5
        let full = clamped.floor() as u8;
        let half = full < TOTAL_STARS && clamped - f64::from(full) >= 0.5;
        let empty = TOTAL_STARS - full - u8::from(half);

        Self { full, half, empty }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_rating() {
        assert_eq!(
            StarRating::from_rating(3.0),
            StarRating {
                full: 3,
                half: false,
                empty: 2
            }
        );
    }

    #[test]
    fn test_half_star() {
        assert_eq!(
            StarRating::from_rating(4.56),
            StarRating {
                full: 4,
                half: true,
                empty: 0
            }
        );
        assert_eq!(
            StarRating::from_rating(2.49),
            StarRating {
                full: 2,
                half: false,
                empty: 3
            }
        );
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(StarRating::from_rating(7.0).full, 5);
        assert_eq!(StarRating::from_rating(-1.0).empty, 5);
        assert_eq!(StarRating::from_rating(f64::NAN).empty, 5);
    }
}
