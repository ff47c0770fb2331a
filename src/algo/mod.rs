//! Edge classification and shading algorithms.
//!
//! - **Classification**: find UV borders and seams ([`classify`])
//! - **Shading**: drive a host to break Phong shading along them ([`shading`])
//! - **Normals**: per-corner normals honoring hard edges ([`normals`])

pub mod classify;
pub mod normals;
pub mod progress;
pub mod shading;

pub use progress::Progress;
