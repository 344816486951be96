//! Named device presets.
//!
//! A small catalog of pre-built devices that a driver or device-catalog
//! loader can look up by name and hand to the mapping pass. Each preset is
//! a process-wide read-only constant, built once on first access and never
//! mutated afterwards.

use std::sync::LazyLock;

use crate::device::Device;

/// Catalog names accepted by [`lookup`].
const PRESET_NAMES: &[&str] = &["rigetti-8q", "square-9q"];

static RIGETTI_8Q: LazyLock<Device> = LazyLock::new(|| {
    // Characterization data for the 8-qubit ring: per-qubit single-qubit
    // fidelities and one two-qubit fidelity per coupling.
    let sq_fidelity = vec![0.957, 0.951, 0.982, 0.970, 0.969, 0.962, 0.969, 0.932];
    let tq_fidelity = [
        ((0, 1), 0.92),
        ((1, 2), 0.91),
        ((2, 3), 0.82),
        ((3, 4), 0.87),
        ((4, 5), 0.67),
        ((5, 6), 0.93),
        ((6, 7), 0.93),
        ((0, 7), 0.92),
    ];

    let mut device = Device::ring("Rigetti 8Q", 8)
        .with_single_qubit_fidelities(sq_fidelity)
        .expect("preset fidelity data is valid");
    for ((q1, q2), fidelity) in tq_fidelity {
        device = device
            .with_two_qubit_fidelity(q1, q2, fidelity)
            .expect("preset edges lie on the ring");
    }
    device
});

static SQUARE_9Q: LazyLock<Device> = LazyLock::new(|| Device::grid("3x3 Square", 3, 3));

/// The Rigetti 8Q device: an 8-qubit ring (0-1-...-7-0, every qubit coupled
/// to exactly two others) with measured single- and two-qubit fidelities.
pub fn rigetti_8q() -> &'static Device {
    &RIGETTI_8Q
}

/// A 3×3 square-grid device with unit fidelities, row-major qubit indexing.
pub fn square_9q() -> &'static Device {
    &SQUARE_9Q
}

/// Look up a preset device by catalog name.
///
/// Returns `None` for names not in [`names()`].
pub fn lookup(name: &str) -> Option<&'static Device> {
    match name {
        "rigetti-8q" => Some(rigetti_8q()),
        "square-9q" => Some(square_9q()),
        _ => None,
    }
}

/// Catalog names of all available presets.
pub fn names() -> &'static [&'static str] {
    PRESET_NAMES
}
