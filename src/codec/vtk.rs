//! Legacy VTK (ASCII) polydata output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::math::Point3;
use crate::mesh::{SkeletonMesh, COLORS_ARRAY, RADIUS_ARRAY};
use crate::surface::ReferenceSurface;

use super::{FieldArray, FieldData};

/// A triangulated surface ready to be written as legacy VTK polydata.
pub struct PolyDataWriter<'a> {
    title: &'a str,
    points: &'a [Point3],
    polygons: Vec<[usize; 3]>,
    field: Option<&'a FieldData>,
    point_scalars: Vec<(&'a str, &'a [f64])>,
    cell_colors: Option<(&'a str, &'a [[u8; 3]])>,
}

impl<'a> PolyDataWriter<'a> {
    /// Creates a writer for `points` joined by triangular `polygons`.
    #[must_use]
    pub fn new(title: &'a str, points: &'a [Point3], polygons: Vec<[usize; 3]>) -> Self {
        Self {
            title,
            points,
            polygons,
            field: None,
            point_scalars: Vec::new(),
            cell_colors: None,
        }
    }

    /// Triangles, per-vertex `Radius` and per-face `Colors` of a skeleton mesh.
    #[must_use]
    pub fn from_mesh(title: &'a str, mesh: &'a SkeletonMesh) -> Self {
        let polygons = mesh
            .indices
            .iter()
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
            .collect();
        Self::new(title, &mesh.vertices, polygons)
            .with_point_scalars(RADIUS_ARRAY, &mesh.radius)
            .with_cell_colors(COLORS_ARRAY, &mesh.colors)
    }

    /// A reference surface with its `Radius` array.
    #[must_use]
    pub fn from_surface(title: &'a str, surface: &'a ReferenceSurface) -> Self {
        Self::new(title, surface.vertices(), surface.triangles().to_vec())
            .with_point_scalars(RADIUS_ARRAY, surface.radius())
    }

    /// Attaches dataset-level field data.
    #[must_use]
    pub fn with_field_data(mut self, field: &'a FieldData) -> Self {
        self.field = Some(field);
        self
    }

    /// Adds a per-point scalar array.
    #[must_use]
    pub fn with_point_scalars(mut self, name: &'a str, values: &'a [f64]) -> Self {
        self.point_scalars.push((name, values));
        self
    }

    /// Adds per-cell byte colors.
    #[must_use]
    pub fn with_cell_colors(mut self, name: &'a str, colors: &'a [[u8; 3]]) -> Self {
        self.cell_colors = Some((name, colors));
        self
    }

    /// Writes the dataset to `w`.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the underlying writer.
    pub fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        writeln!(w, "# vtk DataFile Version 4.2")?;
        writeln!(w, "{}", self.title.lines().next().unwrap_or_default())?;
        writeln!(w, "ASCII")?;
        writeln!(w, "DATASET POLYDATA")?;

        if let Some(field) = self.field.filter(|f| !f.is_empty()) {
            write_field_data(w, "FieldData", field)?;
        }

        writeln!(w, "POINTS {} double", self.points.len())?;
        for p in self.points {
            writeln!(w, "{} {} {}", p.x, p.y, p.z)?;
        }

        if !self.polygons.is_empty() {
            writeln!(w, "POLYGONS {} {}", self.polygons.len(), self.polygons.len() * 4)?;
            for [a, b, c] in &self.polygons {
                writeln!(w, "3 {a} {b} {c}")?;
            }
        }

        let scalars: Vec<_> = self
            .point_scalars
            .iter()
            .filter(|(_, v)| v.len() == self.points.len())
            .collect();
        if !scalars.is_empty() && !self.points.is_empty() {
            writeln!(w, "POINT_DATA {}", self.points.len())?;
            for (name, values) in scalars {
                writeln!(w, "SCALARS {} double 1", escape(name))?;
                writeln!(w, "LOOKUP_TABLE default")?;
                for v in *values {
                    writeln!(w, "{v}")?;
                }
            }
        }

        if let Some((name, colors)) = self.cell_colors {
            if !colors.is_empty() && colors.len() == self.polygons.len() {
                writeln!(w, "CELL_DATA {}", colors.len())?;
                writeln!(w, "FIELD FieldData 1")?;
                writeln!(w, "{} 3 {} unsigned_char", escape(name), colors.len())?;
                for [r, g, b] in colors {
                    writeln!(w, "{r} {g} {b}")?;
                }
            }
        }
        Ok(())
    }

    /// Creates (or truncates) `path` and writes the dataset into it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        info!(
            "Saving {} points, {} triangles to {:?}",
            self.points.len(),
            self.polygons.len(),
            path
        );
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()
    }
}

fn write_field_data<W: Write>(w: &mut W, block: &str, field: &FieldData) -> std::io::Result<()> {
    writeln!(w, "FIELD {block} {}", field.len())?;
    for (name, array) in field.iter() {
        match array {
            FieldArray::Numeric(values) => {
                writeln!(w, "{} 1 {} double", escape(name), values.len())?;
                for chunk in values.chunks(9) {
                    let line: Vec<String> = chunk.iter().map(f64::to_string).collect();
                    writeln!(w, "{}", line.join(" "))?;
                }
            }
            FieldArray::Text(values) => {
                writeln!(w, "{} 1 {} string", escape(name), values.len())?;
                for s in values {
                    writeln!(w, "{}", escape(s))?;
                }
            }
        }
    }
    Ok(())
}

/// Percent-escapes whitespace, `%` and non-printable bytes, as legacy VTK
/// expects for names and string values.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        if b.is_ascii_graphic() && b != b'%' {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn render(writer: &PolyDataWriter<'_>) -> String {
        let mut buf = Vec::new();
        writer.write_to(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn mesh() -> SkeletonMesh {
        SkeletonMesh {
            vertices: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.5, 0.0),
            ],
            radius: vec![0.5, 0.25, 1.0],
            indices: vec![[0, 1, 2]],
            colors: vec![[255, 128, 0]],
        }
    }

    #[test]
    fn mesh_layout() {
        let m = mesh();
        let text = render(&PolyDataWriter::from_mesh("skeleton", &m));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# vtk DataFile Version 4.2");
        assert_eq!(lines[1], "skeleton");
        assert_eq!(lines[3], "DATASET POLYDATA");
        assert_eq!(lines[4], "POINTS 3 double");
        assert_eq!(lines[7], "0 1.5 0");
        assert_eq!(lines[8], "POLYGONS 1 4");
        assert_eq!(lines[9], "3 0 1 2");
        assert_eq!(lines[10], "POINT_DATA 3");
        assert_eq!(lines[11], "SCALARS Radius double 1");
        assert_eq!(lines[13], "0.5");
        assert!(text.contains("CELL_DATA 1\nFIELD FieldData 1\nColors 3 1 unsigned_char\n255 128 0\n"));
    }

    #[test]
    fn field_data_block() {
        let m = mesh();
        let mut field = FieldData::new();
        field.insert("TagName", FieldArray::Text(vec!["Branch A".into(), "50%".into()]));
        field.insert("TagInfo", FieldArray::Numeric(vec![1.0, 4.0, 255.0, 0.5, 0.0]));
        let text = render(&PolyDataWriter::from_mesh("s", &m).with_field_data(&field));
        assert!(text.contains(
            "FIELD FieldData 2\nTagName 1 2 string\nBranch%20A\n50%25\nTagInfo 1 5 double\n1 4 255 0.5 0\n"
        ));
        let field_at = text.find("FIELD FieldData 2").unwrap();
        assert!(field_at < text.find("POINTS").unwrap());
    }

    #[test]
    fn empty_field_data_is_omitted() {
        let m = mesh();
        let field = FieldData::new();
        let text = render(&PolyDataWriter::from_mesh("s", &m).with_field_data(&field));
        assert_eq!(text.matches("FIELD").count(), 1);
    }

    #[test]
    fn writes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.vtk");
        PolyDataWriter::from_mesh("s", &mesh()).write_file(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# vtk DataFile Version 4.2\n"));
    }
}
