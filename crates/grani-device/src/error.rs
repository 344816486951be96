//! Error types for the device model.

use thiserror::Error;

/// Errors that can occur when constructing or querying a device.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeviceError {
    /// A qubit index falls outside `[0, num_qubits)`.
    #[error("Qubit {qubit} out of range for device with {num_qubits} qubits")]
    QubitOutOfRange { qubit: u32, num_qubits: u32 },

    /// Constructor inputs have inconsistent dimensions, an asymmetric
    /// coupling relation, or reference qubits the device does not have.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A two-qubit fidelity query on a pair that is not coupled. Both
    /// indices are individually valid; the caller should have checked
    /// `coupled` first.
    #[error("Qubits {qubit1} and {qubit2} are not coupled")]
    NotCoupled { qubit1: u32, qubit2: u32 },

    /// A fidelity value outside `[0.0, 1.0]` was supplied at construction.
    #[error("Fidelity {value} outside [0.0, 1.0]")]
    InvalidFidelity { value: f64 },
}

/// Result type for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;
