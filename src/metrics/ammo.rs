//! Ammo economy. Carried ammo excludes the loaded magazine.

pub fn num_magazines(carried: f64, magazine: f64) -> f64 {
    if magazine <= 0.0 {
        return 0.0;
    }
    carried / magazine + 1.0
}

pub fn num_reloads(carried: f64, magazine: f64) -> f64 {
    if magazine <= 0.0 {
        return 0.0;
    }
    (carried / magazine).ceil()
}

/// Time to empty every magazine, reloads included.
pub fn firing_duration(carried: f64, magazine: f64, time_to_fire_magazine: f64, reload: f64) -> f64 {
    num_magazines(carried, magazine) * time_to_fire_magazine + num_reloads(carried, magazine) * reload
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loaded_magazine_counts_once() {
        assert_eq!(num_magazines(440.0, 110.0), 5.0);
        assert_eq!(num_reloads(440.0, 110.0), 4.0);
        assert_eq!(num_reloads(450.0, 110.0), 5.0);
        assert_eq!(firing_duration(440.0, 110.0, 20.0, 5.0), 120.0);
    }
}
