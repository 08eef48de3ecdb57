/// Hours of day with elevated demand
pub const PEAK_HOURS: [u8; 5] = [12, 13, 19, 20, 21];

pub fn is_peak_hour(hour: u8) -> bool {
    PEAK_HOURS.contains(&hour)
}

/// Sunday (0) and Saturday (6)
pub fn is_weekend_day(day_of_week: u8) -> bool {
    day_of_week == 0 || day_of_week == 6
}

/// Combined demand multiplier; weekend and peak compound.
pub fn temporal_multiplier(
    is_weekend: bool,
    is_peak_hour: bool,
    weekend_multiplier: f64,
    peak_multiplier: f64,
) -> f64 {
    let mut multiplier = 1.0;
    if is_weekend {
        multiplier *= weekend_multiplier;
    }
    if is_peak_hour {
        multiplier *= peak_multiplier;
    }
    multiplier
}
