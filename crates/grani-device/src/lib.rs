//! Grani Device Topology Model
//!
//! This crate models the physical topology and fidelity characteristics of
//! a quantum device for use by qubit-mapping and routing passes. It answers
//! three questions: which physical qubits exist, which pairs are directly
//! coupled, and what fidelity is associated with a qubit or a coupling.
//!
//! # Overview
//!
//! - [`Device`] — immutable-after-construction connectivity and fidelity
//!   model, built from either a bare edge list or a fully-specified
//!   coupling matrix
//! - [`DeviceError`] — range, shape, and coupling error taxonomy
//! - [`presets`] — named, process-wide read-only device catalog
//!
//! The routing algorithm itself, circuit parsing, and gate scheduling live
//! in surrounding code; this crate is a leaf dependency they query
//! read-only.
//!
//! # Example
//!
//! ```
//! use grani_device::{Device, DeviceError};
//!
//! // Edges-only construction: fidelities default to 1.0.
//! let device = Device::from_edges("demo", 3, &[(0, 1), (1, 2)])?;
//! assert!(device.coupled(0, 1)?);
//! assert_eq!(device.single_qubit_fidelity(0)?, 1.0);
//!
//! // Querying an uncoupled pair is a logic error, distinct from an
//! // out-of-range index.
//! assert!(matches!(
//!     device.two_qubit_fidelity(0, 2),
//!     Err(DeviceError::NotCoupled { .. })
//! ));
//! assert!(matches!(
//!     device.two_qubit_fidelity(0, 9),
//!     Err(DeviceError::QubitOutOfRange { .. })
//! ));
//! # Ok::<(), grani_device::DeviceError>(())
//! ```
//!
//! # Presets
//!
//! ```
//! let device = grani_device::presets::lookup("rigetti-8q").unwrap();
//! assert_eq!(device.num_qubits(), 8);
//! ```

pub mod device;
pub mod error;
pub mod presets;

pub use device::Device;
pub use error::{DeviceError, DeviceResult};
