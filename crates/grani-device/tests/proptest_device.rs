//! Property-based tests for the device topology model.
//!
//! Verifies the structural invariants that hold for every validly
//! constructed device: coupling symmetry, a false diagonal, normalized
//! edge storage, and the range-check / uncoupled-pair error split.

use grani_device::{Device, DeviceError};
use proptest::prelude::*;

/// Generate a device from an arbitrary valid edge list.
///
/// Generates devices with:
/// - 2-12 qubits
/// - 0-24 edges between distinct in-range qubits (duplicates welcome,
///   construction merges them)
fn arb_device() -> impl Strategy<Value = Device> {
    (2_u32..=12).prop_flat_map(|num_qubits| {
        prop::collection::vec(
            (0..num_qubits, 0..num_qubits).prop_filter("no self-loops", |(a, b)| a != b),
            0..=24,
        )
        .prop_map(move |edges| {
            Device::from_edges("prop", num_qubits, &edges).expect("edges are valid")
        })
    })
}

proptest! {
    /// `coupled` is symmetric over all in-range pairs.
    #[test]
    fn prop_coupled_symmetric(device in arb_device()) {
        let n = device.num_qubits();
        for i in 0..n {
            for j in 0..n {
                prop_assert_eq!(
                    device.coupled(i, j).unwrap(),
                    device.coupled(j, i).unwrap()
                );
            }
        }
    }

    /// No qubit is ever coupled to itself.
    #[test]
    fn prop_no_self_coupling(device in arb_device()) {
        for i in 0..device.num_qubits() {
            prop_assert!(!device.coupled(i, i).unwrap());
        }
    }

    /// Stored edges are normalized (lo, hi), sorted, and unique.
    #[test]
    fn prop_edges_normalized(device in arb_device()) {
        let edges = device.edges();
        for &(a, b) in edges {
            prop_assert!(a < b);
        }
        for window in edges.windows(2) {
            prop_assert!(window[0] < window[1]);
        }
    }

    /// Edges-only construction defaults every fidelity to 1.0, and every
    /// uncoupled in-range pair fails with the dedicated logic error.
    #[test]
    fn prop_default_fidelities(device in arb_device()) {
        let n = device.num_qubits();
        for i in 0..n {
            prop_assert_eq!(device.single_qubit_fidelity(i).unwrap(), 1.0);
        }
        for i in 0..n {
            for j in 0..n {
                if device.coupled(i, j).unwrap() {
                    prop_assert_eq!(device.two_qubit_fidelity(i, j).unwrap(), 1.0);
                } else {
                    prop_assert!(
                        matches!(
                            device.two_qubit_fidelity(i, j),
                            Err(DeviceError::NotCoupled { .. })
                        ),
                        "expected NotCoupled for uncoupled pair ({}, {})",
                        i,
                        j
                    );
                }
            }
        }
    }

    /// Every query rejects out-of-range indices with `QubitOutOfRange`.
    #[test]
    fn prop_out_of_range_rejected(device in arb_device(), offset in 0_u32..4) {
        let bad = device.num_qubits() + offset;
        prop_assert!(
            matches!(
                device.coupled(0, bad),
                Err(DeviceError::QubitOutOfRange { .. })
            ),
            "expected QubitOutOfRange from coupled(0, {})",
            bad
        );
        prop_assert!(
            matches!(
                device.coupled(bad, 0),
                Err(DeviceError::QubitOutOfRange { .. })
            ),
            "expected QubitOutOfRange from coupled({}, 0)",
            bad
        );
        prop_assert!(
            matches!(
                device.single_qubit_fidelity(bad),
                Err(DeviceError::QubitOutOfRange { .. })
            ),
            "expected QubitOutOfRange from single_qubit_fidelity({})",
            bad
        );
        prop_assert!(
            matches!(
                device.two_qubit_fidelity(bad, 0),
                Err(DeviceError::QubitOutOfRange { .. })
            ),
            "expected QubitOutOfRange from two_qubit_fidelity({}, 0)",
            bad
        );
        prop_assert!(
            matches!(
                device.neighbors(bad),
                Err(DeviceError::QubitOutOfRange { .. })
            ),
            "expected QubitOutOfRange from neighbors({})",
            bad
        );
    }

    /// Distance is symmetric, zero on the diagonal, and one across a
    /// coupling.
    #[test]
    fn prop_distance_consistent(device in arb_device()) {
        let n = device.num_qubits();
        for i in 0..n {
            prop_assert_eq!(device.distance(i, i).unwrap(), Some(0));
            for j in 0..n {
                prop_assert_eq!(
                    device.distance(i, j).unwrap(),
                    device.distance(j, i).unwrap()
                );
                if device.coupled(i, j).unwrap() {
                    prop_assert_eq!(device.distance(i, j).unwrap(), Some(1));
                }
            }
        }
    }
}
