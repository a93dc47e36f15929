//! Spatial locator: snap a coordinate to the nearest network node.
//!
//! The R-tree is keyed in `[lat, lon]` degrees, and degree distance is not
//! ground distance away from the equator (a degree of longitude shrinks
//! with `cos(lat)`).  The locator therefore asks the index for every node
//! inside a degree envelope that contains the whole search circle, then
//! picks the smallest haversine distance among them.  Queries take `&self`
//! only and are safe to run from any number of threads.

use rstar::AABB;

use rr_core::geo::EARTH_RADIUS_M;
use rr_core::{GeoPoint, NodeId};

use crate::network::NetworkSnapshot;
use crate::{NetworkError, NetworkResult};

/// Slack added to every envelope edge, degrees.
const ENVELOPE_SLACK_DEG: f64 = 1e-9;

impl NetworkSnapshot {
    /// Nearest node to `pos` within `max_radius_m` metres.
    ///
    /// Ties in distance resolve to the lowest `NodeId`.  Fails with
    /// [`NetworkError::OutOfCoverage`] if the snapshot is empty or no node
    /// lies within the radius.
    pub fn nearest_node(&self, pos: GeoPoint, max_radius_m: f64) -> NetworkResult<NodeId> {
        let out_of_coverage = || NetworkError::OutOfCoverage { point: pos, radius_m: max_radius_m };

        if !pos.is_valid() || max_radius_m.is_nan() || max_radius_m < 0.0 {
            return Err(out_of_coverage());
        }

        search_envelopes(pos, max_radius_m)
            .iter()
            .flat_map(|envelope| self.spatial_idx.locate_in_envelope(envelope))
            .map(|e| (pos.distance_m(self.node_pos[e.id.index()]), e.id))
            .filter(|(d, _)| *d <= max_radius_m)
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, id)| id)
            .ok_or_else(out_of_coverage)
    }
}

/// Degree boxes that together cover every point within `radius_m` of
/// `pos`.  More than one box only when the circle crosses the antimeridian.
fn search_envelopes(pos: GeoPoint, radius_m: f64) -> Vec<AABB<[f64; 2]>> {
    let world = || AABB::from_corners([-90.0, -180.0], [90.0, 180.0]);

    // Angular radius of the search circle.
    let delta = radius_m / EARTH_RADIUS_M;
    if delta >= std::f64::consts::PI {
        return vec![world()];
    }

    let dlat = delta.to_degrees() + ENVELOPE_SLACK_DEG;
    let lat_lo = (pos.lat - dlat).max(-90.0);
    let lat_hi = (pos.lat + dlat).min(90.0);

    // Widest longitude reach of a spherical cap: sin(dlon) = sin(delta) / cos(lat).
    // A cap touching a pole spans every longitude.
    let cos_lat = pos.lat.to_radians().cos();
    let reach = delta.sin() / cos_lat;
    if lat_lo <= -90.0 || lat_hi >= 90.0 || !reach.is_finite() || reach >= 1.0 {
        return vec![AABB::from_corners([lat_lo, -180.0], [lat_hi, 180.0])];
    }
    let dlon = reach.asin().to_degrees() + ENVELOPE_SLACK_DEG;

    let (lon_lo, lon_hi) = (pos.lon - dlon, pos.lon + dlon);
    let mut envelopes = vec![AABB::from_corners([lat_lo, lon_lo.max(-180.0)], [lat_hi, lon_hi.min(180.0)])];
    if lon_lo < -180.0 {
        envelopes.push(AABB::from_corners([lat_lo, lon_lo + 360.0], [lat_hi, 180.0]));
    }
    if lon_hi > 180.0 {
        envelopes.push(AABB::from_corners([lat_lo, -180.0], [lat_hi, lon_hi - 360.0]));
    }
    envelopes
}
