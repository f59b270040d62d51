use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::SessionConfig;
use crate::topology::TagInfo;

/// Key/value model descriptor read by the cm-rep fitting tools.
///
/// Keys keep their insertion order and render as `key = value` lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmrepDescriptor {
    entries: Vec<(&'static str, String)>,
}

impl CmrepDescriptor {
    /// Builds the descriptor for `config` and the current point categories.
    ///
    /// `Grid.Model.nLabels` counts distinct anatomical indices. The constant
    /// rho is only present with the `PDE` solver, the constant radius only
    /// when it is enabled.
    #[must_use]
    pub fn new(config: &SessionConfig, tags: &[TagInfo]) -> Self {
        let labels: BTreeSet<i64> = tags.iter().map(|t| t.anatomical_index).collect();
        let mut entries = vec![
            ("Grid.Type", config.grid_type.clone()),
            ("Grid.Model.SolverType", config.solver_type.clone()),
            (
                "Grid.Model.Atom.SubdivisionLevel",
                config.subdivision_level.to_string(),
            ),
            (
                "Grid.Model.Coefficient.FileName",
                format!("{}.vtk", config.output_model),
            ),
            ("Grid.Model.Coefficient.FileType", "VTK".to_owned()),
            ("Grid.Model.nLabels", labels.len().to_string()),
        ];
        if config.uses_pde_solver() {
            entries.push((
                "Grid.Model.Coefficient.ConstantRho",
                config.constant_rho.to_string(),
            ));
        }
        if config.use_constant_radius {
            entries.push((
                "Grid.Model.Coefficient.ConstantRadius",
                config.constant_radius.to_string(),
            ));
        }
        Self { entries }
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Keys in output order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// Writes the descriptor to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        info!("Saving model descriptor to {:?}", path);
        fs::write(path, self.to_string())
    }
}

impl fmt::Display for CmrepDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            writeln!(f, "{key} = {value}")?;
        }
        Ok(())
    }
}
