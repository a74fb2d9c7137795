mod functions;
mod shell;

pub use functions::{cartesian_components, primitive_norm};
pub use shell::{Coefficients, ContractedShell, Shell};
