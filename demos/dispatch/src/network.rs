//! Built-in synthetic network for the `demo` subcommand.
//!
//! A 5×5 street grid laid over the Mapo/Seodaemun area.  Every block is a
//! pair of one-way segments with different durations, so forward and
//! backward searches see different costs.  A few segments carry an explicit
//! risk; the rest fall back to `length * 0.1`.

use er_core::GeoPoint;
use er_spatial::EdgeRecord;
use er_trial::StationSpec;

const ROWS: usize = 5;
const COLS: usize = 5;
const ORIGIN: GeoPoint = GeoPoint { lon: 126.900, lat: 37.545 };
const STEP_DEG: f64 = 0.006;

fn key(r: usize, c: usize) -> String {
    format!("n{r}{c}")
}

fn pos(r: usize, c: usize) -> GeoPoint {
    GeoPoint::new(ORIGIN.lon + c as f64 * STEP_DEG, ORIGIN.lat + r as f64 * STEP_DEG)
}

/// Deterministic segment duration in seconds, spread across every band of
/// the duration → weight table.
fn duration(r: usize, c: usize, salt: usize) -> f64 {
    const BANDS: [f64; 6] = [35.0, 80.0, 150.0, 250.0, 350.0, 450.0];
    BANDS[(r * 7 + c * 3 + salt) % BANDS.len()]
}

/// Edge records for the grid, both directions of every block.
pub fn demo_edges() -> Vec<EdgeRecord> {
    let mut out = Vec::new();
    let mut push = |(r1, c1): (usize, usize), (r2, c2): (usize, usize), salt: usize| {
        let (u_pos, v_pos) = (pos(r1, c1), pos(r2, c2));
        let length = u_pos.distance_m(v_pos);
        // Arterials along row 2 are busier.
        let risk = (r1 == 2 && r2 == 2).then_some(length * 0.4);
        out.push(EdgeRecord {
            u: key(r1, c1),
            v: key(r2, c2),
            u_pos,
            v_pos,
            duration: duration(r1, c1, salt),
            length: Some(length),
            risk,
        });
    };

    for r in 0..ROWS {
        for c in 0..COLS {
            if c + 1 < COLS {
                push((r, c), (r, c + 1), 0);
                push((r, c + 1), (r, c), 1);
            }
            if r + 1 < ROWS {
                push((r, c), (r + 1, c), 2);
                push((r + 1, c), (r, c), 4);
            }
        }
    }
    out
}

/// Stations at three grid corners plus one given by coordinates.
pub fn demo_stations() -> Vec<StationSpec> {
    vec![
        StationSpec::at_node("Bukahyeon", key(0, 0)),
        StationSpec::at_node("Mapo Rescue", key(0, COLS - 1)),
        StationSpec::at_node("Gongdeok", key(ROWS - 1, 0)),
        StationSpec::at_coords("Seodaemun Rescue", GeoPoint::new(126.9245, 37.5685)),
    ]
}
