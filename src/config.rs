//! Session configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Solver name that makes the descriptor carry a constant rho.
pub const PDE_SOLVER: &str = "PDE";

/// Settings that shape picking and the saved artifacts.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use synskel::config::SessionConfig;
///
/// let config = SessionConfig::from_json(r#"{ "output_model": "hippo", "inflate": true }"#).unwrap();
/// assert_eq!(config.output_model, "hippo");
/// assert_eq!(config.grid_type, "LoopSubdivision");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Directory receiving every saved artifact.
    pub output_directory: PathBuf,
    /// Base name of the skeleton mesh and descriptor files.
    pub output_model: String,
    pub grid_type: String,
    pub solver_type: String,
    /// Subdivision passes requested from the subdivision service. Zero skips it.
    pub subdivision_level: u32,
    /// Written to the descriptor only with the `PDE` solver.
    pub constant_rho: f64,
    pub use_constant_radius: bool,
    pub constant_radius: f64,
    /// Request an inflated surface from the inflation service on save.
    pub inflate: bool,
    pub inflate_radius: f64,
    /// Distance within which a position hits a triangle.
    pub pick_tolerance: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from("."),
            output_model: "skeleton".to_owned(),
            grid_type: "LoopSubdivision".to_owned(),
            solver_type: "BruteForce".to_owned(),
            subdivision_level: 0,
            constant_rho: -0.25,
            use_constant_radius: false,
            constant_radius: 1.0,
            inflate: false,
            inflate_radius: 0.1,
            pick_tolerance: crate::math::PICK_TOLERANCE,
        }
    }
}

impl SessionConfig {
    /// Parses a configuration from JSON, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON or a field has the
    /// wrong type.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Returns `true` if the solver type is the PDE solver.
    #[must_use]
    pub fn uses_pde_solver(&self) -> bool {
        self.solver_type == PDE_SOLVER
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults() {
        let c = SessionConfig::default();
        assert_eq!(c.grid_type, "LoopSubdivision");
        assert_eq!(c.solver_type, "BruteForce");
        assert_eq!(c.subdivision_level, 0);
        assert_relative_eq!(c.constant_rho, -0.25);
        assert!(!c.use_constant_radius);
        assert!(!c.inflate);
        assert_relative_eq!(c.inflate_radius, 0.1);
        assert!(!c.uses_pde_solver());
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(SessionConfig::from_json("{}").unwrap(), SessionConfig::default());
    }

    #[test]
    fn json_round_trip() {
        let c = SessionConfig {
            solver_type: PDE_SOLVER.to_owned(),
            subdivision_level: 2,
            output_directory: PathBuf::from("/tmp/out"),
            ..SessionConfig::default()
        };
        let parsed = SessionConfig::from_json(&c.to_json().unwrap()).unwrap();
        assert_eq!(parsed, c);
        assert!(parsed.uses_pde_solver());
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(SessionConfig::from_json(r#"{ "subdivision_level": "two" }"#).is_err());
    }
}
