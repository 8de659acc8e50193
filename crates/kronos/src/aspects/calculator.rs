use crate::aspects::types::AspectKind;
use crate::orb::separation;

/// Signed orb of the separation `natal -> transit` relative to an aspect angle.
///
/// For a square both the waxing (90°) and waning (270°) targets are measured
/// and the nearer one wins. The sign only says whether the separation is past
/// the target angle; it does not know the transiting body's direction of
/// motion, so "applying" vs "separating" is approximate.
pub fn aspect_orb(natal_lon: f64, transit_lon: f64, aspect: AspectKind) -> f64 {
    let separation = separation(natal_lon, transit_lon);

    match aspect {
        AspectKind::Square => {
            let orb_waxing = (separation - 90.0).abs();
            let orb_waning = (separation - 270.0).abs();
            let orb = orb_waxing.min(orb_waning);
            if separation > aspect.angle() {
                orb
            } else {
                -orb
            }
        }
        AspectKind::Opposition => separation - aspect.angle(),
    }
}
