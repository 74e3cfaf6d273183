//! Damage-over-time expectations for probabilistic procs.

/// Expected number of independent trials until the first success.
pub fn mean_rolls(probability: f64) -> f64 {
    if probability <= 0.0 {
        return f64::INFINITY;
    }
    1.0 / probability
}

/// Burst view of a proc DoT: DPS discounted by the share of a magazine fired after the first proc.
pub fn burst_dot_dps_per_magazine(probability: f64, dps: f64, magazine: f64) -> f64 {
    if magazine <= 0.0 {
        return 0.0;
    }
    let active = ((magazine - mean_rolls(probability)) / magazine).clamp(0.0, 1.0);
    dps * active
}

/// DPS discounted by the share of `window` seconds during which the DoT is active.
pub fn uptime_dot_dps(onset: f64, window: f64, dps: f64) -> f64 {
    if window <= 0.0 {
        return 0.0;
    }
    dps * ((window - onset) / window).clamp(0.0, 1.0)
}

/// DoT damage one enemy takes before it dies: ticks between the proc and death, up to `duration`.
pub fn average_dot_damage_per_enemy(onset: f64, duration: f64, dps: f64, time_to_kill: f64) -> f64 {
    let active = (time_to_kill - onset).max(0.0).min(duration);
    if active.is_nan() {
        return 0.0;
    }
    dps * active
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_rolls_is_reciprocal() {
        assert!((mean_rolls(0.3) - 10.0 / 3.0).abs() < 1e-12);
        assert!(mean_rolls(0.0).is_infinite());
    }

    #[test]
    fn burst_dot_never_goes_negative() {
        assert_eq!(burst_dot_dps_per_magazine(0.1, 10.0, 5.0), 0.0);
        let dps = burst_dot_dps_per_magazine(0.5, 10.0, 10.0);
        assert!((dps - 8.0).abs() < 1e-12);
    }

    #[test]
    fn uptime_is_clamped() {
        assert_eq!(uptime_dot_dps(12.0, 10.0, 11.0), 0.0);
        assert_eq!(uptime_dot_dps(-1.0, 10.0, 11.0), 11.0);
        assert!((uptime_dot_dps(2.5, 10.0, 10.0) - 7.5).abs() < 1e-12);
    }

    #[test]
    fn dot_damage_stops_at_death_or_expiry() {
        assert_eq!(average_dot_damage_per_enemy(1.0, 10.0, 10.0, 4.0), 30.0);
        assert_eq!(average_dot_damage_per_enemy(1.0, 2.0, 10.0, 4.0), 20.0);
        assert_eq!(average_dot_damage_per_enemy(5.0, 10.0, 10.0, 4.0), 0.0);
        assert_eq!(average_dot_damage_per_enemy(f64::INFINITY, 10.0, 10.0, 4.0), 0.0);
    }
}
