//! Editing session for one reference surface.
//!
//! [`SkeletonSession`] is the entry point used by an interactive layer. It
//! owns the topology store, the point lists the landmarks are entered
//! through, the local-to-global point table and the rendered mesh, and it
//! rebuilds the mesh after every change that can alter what is visible.

mod cmrep;

pub use cmrep::CmrepDescriptor;

use std::fs;
use std::path::PathBuf;

use slotmap::SlotMap;
use tracing::{debug, info, warn};

use crate::codec::vtk::PolyDataWriter;
use crate::codec::{CustomDataReader, CustomDataWriter, FieldData};
use crate::config::SessionConfig;
use crate::constraint::{pre_check, regenerate_edges, try_regenerate_edges, Candidate};
use crate::error::{CodecError, LookupError, Result};
use crate::math::{Color, Point3};
use crate::mesh::{resample_radius, BuildMesh, MeshSink, SkeletonMesh};
use crate::operations::{AddTriangle, AssignTriangleLabel, DeleteTriangle, FlipTriangle, RemovePoint};
use crate::services::{InflationService, SubdivisionService};
use crate::surface::{ReferenceSurface, SkeletonSurface};
use crate::topology::{
    pair_number, LabelTriangle, PointIndexTable, PointListId, TagInfo, TagPoint, TagTriangle,
    TagType, TopologyStore,
};

/// An external collection of landmarks of one point-label category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointList {
    tag: usize,
    sort_keys: Vec<i64>,
    next_key: i64,
}

impl PointList {
    fn new(tag: usize) -> Self {
        Self {
            tag,
            sort_keys: Vec::new(),
            next_key: 0,
        }
    }

    /// Index of the owning category in the store's tag sequence.
    #[must_use]
    pub fn tag(&self) -> usize {
        self.tag
    }

    /// Number of points currently in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sort_keys.len()
    }

    /// Returns `true` if the list holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sort_keys.is_empty()
    }

    /// Curve-order key of every point, indexed by local index.
    #[must_use]
    pub fn sort_keys(&self) -> &[i64] {
        &self.sort_keys
    }

    fn push(&mut self) -> usize {
        self.sort_keys.push(self.next_key);
        self.next_key += 1;
        self.sort_keys.len() - 1
    }
}

/// A point of a [`PointList`], addressed by its local index.
pub type Selection = (PointListId, usize);

/// Files written by [`SkeletonSession::save`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedArtifacts {
    pub mesh: PathBuf,
    pub affix: PathBuf,
    pub descriptor: PathBuf,
    pub subdivided: Option<PathBuf>,
    pub inflated: Option<PathBuf>,
}

/// Builds a skeleton mesh on one reference surface.
pub struct SkeletonSession {
    surface: ReferenceSurface,
    config: SessionConfig,
    store: TopologyStore,
    lists: SlotMap<PointListId, PointList>,
    table: PointIndexTable,
    mesh: SkeletonMesh,
    sink: Option<Box<dyn MeshSink>>,
}

impl SkeletonSession {
    /// Creates an empty session on `surface`.
    #[must_use]
    pub fn new(surface: ReferenceSurface, config: SessionConfig) -> Self {
        Self {
            surface,
            config,
            store: TopologyStore::new(),
            lists: SlotMap::with_key(),
            table: PointIndexTable::new(),
            mesh: SkeletonMesh::default(),
            sink: None,
        }
    }

    /// Recreates a session from field data written by [`Self::field_data`].
    ///
    /// One point list is created per stored category and the points are
    /// re-entered in their stored order. Categories and face labels get
    /// fresh node ids of the form `tag-<index>` and `label-<index>`. The
    /// edge ledger is rebuilt from the triangles.
    ///
    /// # Errors
    ///
    /// Returns a codec error if the field data does not decode, and a lookup
    /// error if the decoded triangles cannot be rendered.
    pub fn restore(surface: ReferenceSurface, field: &FieldData, config: SessionConfig) -> Result<Self> {
        let mut store = CustomDataReader::new(field).read()?;
        for (i, tag) in store.tag_infos.iter_mut().enumerate() {
            tag.node_id = format!("tag-{i}");
        }
        for (i, label) in store.labels.iter_mut().enumerate() {
            label.node_id = format!("label-{i}");
        }

        let mut session = Self::new(surface, config);
        let list_ids: Vec<PointListId> = (0..store.tag_infos.len())
            .map(|tag| session.lists.insert(PointList::new(tag)))
            .collect();
        for (global, point) in store.points.iter().enumerate() {
            let list = list_ids[point.tag];
            if let Some(l) = session.lists.get_mut(list) {
                let local = l.push();
                session.table.insert(list, local, global);
            }
        }

        regenerate_edges(&mut store);
        for (&key, edge) in &store.edges {
            let expected = pair_number(edge.pt_id1, edge.pt_id2);
            if key != expected {
                return Err(CodecError::EdgeKeyMismatch(edge.pt_id1, edge.pt_id2, key, expected).into());
            }
        }
        session.store = store;
        session.rebuild()?;
        info!(
            lists = session.lists.len(),
            points = session.store.points.len(),
            triangles = session.store.triangles.len(),
            "session restored"
        );
        Ok(session)
    }

    /// Switches to another reference surface, discarding all construction state.
    pub fn reset(&mut self, surface: ReferenceSurface) {
        self.surface = surface;
        self.store = TopologyStore::new();
        self.lists.clear();
        self.table.clear();
        self.mesh = SkeletonMesh::default();
        self.notify();
        debug!(surface = self.surface.name(), "session reset");
    }

    /// Registers the receiver of every rebuilt mesh.
    pub fn set_sink(&mut self, sink: Box<dyn MeshSink>) {
        self.sink = Some(sink);
    }

    /// The topology being edited.
    #[must_use]
    pub fn store(&self) -> &TopologyStore {
        &self.store
    }

    /// The mesh produced by the last rebuild.
    #[must_use]
    pub fn mesh(&self) -> &SkeletonMesh {
        &self.mesh
    }

    /// The reference surface points are snapped to.
    #[must_use]
    pub fn surface(&self) -> &ReferenceSurface {
        &self.surface
    }

    /// Output and solver settings used by [`Self::save`].
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Mutable access to the session settings.
    pub fn config_mut(&mut self) -> &mut SessionConfig {
        &mut self.config
    }

    /// Returns the point list `list`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::UnknownPointList`] if the list does not exist.
    pub fn point_list(&self, list: PointListId) -> std::result::Result<&PointList, LookupError> {
        self.lists.get(list).ok_or(LookupError::UnknownPointList)
    }

    /// Point lists in creation order of their categories.
    pub fn point_lists(&self) -> impl Iterator<Item = (PointListId, &PointList)> {
        let mut lists: Vec<_> = self.lists.iter().collect();
        lists.sort_by_key(|(_, l)| l.tag);
        lists.into_iter()
    }

    /// Global point index of a list point.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::PointNotFound`] if the point is not registered.
    pub fn global_index(&self, (list, local): Selection) -> std::result::Result<usize, LookupError> {
        self.table
            .get(list, local)
            .ok_or_else(|| LookupError::PointNotFound {
                list: format!("{list:?}"),
                local,
            })
    }

    // --- Catalog ---

    /// Adds a point-label category and the point list that feeds it.
    pub fn add_tag(&mut self, info: TagInfo) -> PointListId {
        debug!(name = %info.name, tag_type = %info.tag_type, "point label added");
        let tag = self.store.add_tag_info(info);
        self.lists.insert(PointList::new(tag))
    }

    /// Replaces the name, type, anatomical index and color of a category.
    ///
    /// A type change recomputes the capacity of every edge from the new
    /// types. It is refused if an existing triangle would then sit on an
    /// over-full edge, or if the new type cannot form edges while the
    /// category's points are in use. Points keep the anatomical index they
    /// were created with.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the list does not exist and the
    /// [`ConstraintViolation`](crate::error::ConstraintViolation) of the first
    /// triangle that no longer fits. A rejection leaves the session unchanged.
    pub fn update_tag(
        &mut self,
        list: PointListId,
        name: impl Into<String>,
        tag_type: TagType,
        anatomical_index: i64,
        color: Color,
    ) -> Result<()> {
        let tag = self.point_list(list)?.tag;
        let mut store = self.store.clone();
        let info = store.tag_info_mut(tag)?;
        let retyped = info.tag_type != tag_type;
        info.name = name.into();
        info.tag_type = tag_type;
        info.anatomical_index = anatomical_index;
        info.color = color;
        if retyped {
            try_regenerate_edges(&mut store)?;
            debug!(tag, %tag_type, edges = store.edges.len(), "point label retyped");
        }
        self.store = store;
        Ok(())
    }

    /// Adds a face label.
    pub fn add_triangle_label(&mut self, label: LabelTriangle) -> usize {
        debug!(name = %label.name, node = %label.node_id, "triangle label added");
        self.store.add_label(label)
    }

    /// Renames and recolors the face label carrying `node_id`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::FaceLabelNotFound`] if no label carries `node_id`.
    pub fn update_triangle_label(&mut self, node_id: &str, name: impl Into<String>, color: Color) -> Result<()> {
        let label = self.store.label_by_node_mut(node_id)?;
        label.name = name.into();
        label.color = color;
        self.rebuild()
    }

    // --- Points ---

    /// Places a point of `list` on the reference vertex closest to `pos`.
    ///
    /// Returns the local index of the new point.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the list does not exist or the reference
    /// surface has no vertices.
    pub fn add_point(&mut self, list: PointListId, pos: Point3) -> Result<usize> {
        let tag = self.point_list(list)?.tag;
        let type_index = self.store.tag_info(tag)?.anatomical_index;
        let (seq, radius, snapped) = self.snap(&pos)?;

        let global = self.store.add_point(TagPoint::new(snapped, radius, type_index, tag, seq));
        let local = self
            .lists
            .get_mut(list)
            .ok_or(LookupError::UnknownPointList)?
            .push();
        self.table.insert(list, local, global);
        debug!(local, global, seq, "point added");
        self.rebuild()?;
        Ok(local)
    }

    /// Moves a point while it is being dragged. No snapping.
    ///
    /// An unregistered point is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the triangles cannot be rendered.
    pub fn drag_point(&mut self, (list, local): Selection, pos: Point3) -> Result<()> {
        let Some(global) = self.table.get(list, local) else {
            warn!(?list, local, "dragged point is not registered, ignoring");
            return Ok(());
        };
        self.store.point_mut(global)?.pos = pos;
        self.rebuild()
    }

    /// Ends a drag: snaps the point to the closest reference vertex and
    /// refreshes its radius and anchor. Returns the snapped position, or
    /// `None` after logging if the point is not registered.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the reference surface has no vertices.
    pub fn finish_point_move(&mut self, (list, local): Selection, pos: Point3) -> Result<Option<Point3>> {
        let Some(global) = self.table.get(list, local) else {
            warn!(?list, local, "moved point is not registered, ignoring");
            return Ok(None);
        };
        let (seq, radius, snapped) = self.snap(&pos)?;
        let point = self.store.point_mut(global)?;
        point.pos = snapped;
        point.radius = radius;
        point.seq = seq;
        self.rebuild()?;
        Ok(Some(snapped))
    }

    /// Replaces the curve-order keys of a list, indexed by local index.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the list does not exist or `keys` does not
    /// have one key per point.
    pub fn set_sort_keys(&mut self, list: PointListId, keys: Vec<i64>) -> Result<()> {
        let l = self.lists.get_mut(list).ok_or(LookupError::UnknownPointList)?;
        if keys.len() != l.sort_keys.len() {
            return Err(LookupError::IndexOutOfRange {
                entity: "sort key",
                index: keys.len(),
                len: l.sort_keys.len(),
            }
            .into());
        }
        l.next_key = keys.iter().max().map_or(0, |k| k + 1);
        l.sort_keys = keys;
        Ok(())
    }

    /// Removes a list point together with its triangles.
    ///
    /// A point missing from the table means the caller is out of sync; it is
    /// logged and `Ok(None)` is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the surviving triangles cannot be rendered.
    pub fn remove_point(&mut self, (list, local): Selection) -> Result<Option<TagPoint>> {
        let Some(global) = self.table.get(list, local) else {
            warn!(?list, local, "removed point is not registered, ignoring");
            return Ok(None);
        };
        let point = RemovePoint::new(global).execute(&mut self.store)?;
        self.table.remove(list, local);
        if let Some(l) = self.lists.get_mut(list) {
            if local < l.sort_keys.len() {
                l.sort_keys.remove(local);
            }
        }
        self.rebuild()?;
        Ok(Some(point))
    }

    // --- Triangles ---

    /// Checks a partial selection against the free-edge rules before it
    /// grows into a triangle.
    ///
    /// # Errors
    ///
    /// Returns the violated rule, or a lookup error for an unknown list.
    pub fn pre_check(&self, selection: &[Selection]) -> Result<()> {
        let candidates = selection
            .iter()
            .map(|&(list, local)| -> Result<Candidate> {
                let tag = self.point_list(list)?.tag;
                Ok(Candidate {
                    list,
                    local,
                    tag_type: self.store.tag_info(tag)?.tag_type,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        pre_check(&candidates, |list| {
            self.lists.get(list).map_or(&[][..], PointList::sort_keys)
        })?;
        Ok(())
    }

    /// Builds a triangle from three selected points with the face label
    /// carrying `label_node_id`.
    ///
    /// Returns the positions within `selection` of the two points of the
    /// edge the user can continue from, or an empty list when every edge is
    /// full.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::FaceLabelNotFound`] for an unknown label, a
    /// lookup error for an unregistered point and a
    /// [`ConstraintViolation`](crate::error::ConstraintViolation) if the
    /// triangle is rejected. A rejection leaves the session unchanged.
    pub fn attempt_to_add_triangle(&mut self, selection: [Selection; 3], label_node_id: &str) -> Result<Vec<usize>> {
        let label = self.store.label_index(label_node_id)?;
        let ids = [
            self.global_index(selection[0])?,
            self.global_index(selection[1])?,
            self.global_index(selection[2])?,
        ];
        let added = AddTriangle::new(ids, label).execute(&mut self.store, &self.surface)?;
        self.rebuild()?;

        let continuation = added
            .next_edge
            .map(|(a, b)| {
                [a, b]
                    .iter()
                    .filter_map(|id| ids.iter().position(|x| x == id))
                    .collect()
            })
            .unwrap_or_default();
        Ok(continuation)
    }

    /// Index of the triangle hit by `pos` in the current mesh.
    #[must_use]
    pub fn pick_triangle(&self, pos: &Point3) -> Option<usize> {
        self.mesh.pick(pos, self.config.pick_tolerance)
    }

    /// Deletes the triangle hit by `pos`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the remaining triangles cannot be rendered.
    pub fn delete_triangle_at(&mut self, pos: &Point3) -> Result<Option<TagTriangle>> {
        let Some(index) = self.pick_triangle(pos) else {
            return Ok(None);
        };
        let triangle = DeleteTriangle::new(index).execute(&mut self.store)?;
        self.rebuild()?;
        Ok(Some(triangle))
    }

    /// Reverses the winding of the triangle hit by `pos`. Returns its index.
    ///
    /// # Errors
    ///
    /// Returns an error if the triangles cannot be rendered.
    pub fn flip_triangle_at(&mut self, pos: &Point3) -> Result<Option<usize>> {
        let Some(index) = self.pick_triangle(pos) else {
            return Ok(None);
        };
        FlipTriangle::new(index).execute(&mut self.store)?;
        self.rebuild()?;
        Ok(Some(index))
    }

    /// Gives the triangle hit by `pos` the face label carrying `label_node_id`.
    /// Returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::FaceLabelNotFound`] for an unknown label.
    pub fn assign_triangle_label_at(&mut self, pos: &Point3, label_node_id: &str) -> Result<Option<usize>> {
        let label = self.store.label_index(label_node_id)?;
        let Some(index) = self.pick_triangle(pos) else {
            return Ok(None);
        };
        AssignTriangleLabel::new(index, label).execute(&mut self.store)?;
        self.rebuild()?;
        Ok(Some(index))
    }

    // --- Mesh ---

    /// Rebuilds the mesh from the store and hands it to the sink. The
    /// store's legacy label array is refreshed for the reference surface.
    ///
    /// # Errors
    ///
    /// Returns an error if a triangle references a missing point or label.
    pub fn rebuild(&mut self) -> Result<()> {
        self.mesh = BuildMesh::new().execute(&self.store)?;
        self.store.refresh_label_data(self.surface.vertex_count());
        self.notify();
        Ok(())
    }

    fn notify(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            sink.mesh_updated(&self.mesh);
        }
    }

    fn snap(&self, pos: &Point3) -> Result<(usize, f64, Point3)> {
        let not_found = || LookupError::IndexOutOfRange {
            entity: "reference vertex",
            index: 0,
            len: self.surface.vertex_count(),
        };
        let (seq, radius) = self.surface.closest_vertex(pos).ok_or_else(not_found)?;
        let snapped = self.surface.vertex(seq).ok_or_else(not_found)?;
        Ok((seq, radius, snapped))
    }

    // --- Persistence ---

    /// Encodes the construction into field data for the reference surface.
    #[must_use]
    pub fn field_data(&self) -> FieldData {
        let mut field = FieldData::new();
        CustomDataWriter::new(&self.store).write(&mut field, self.surface.vertex_count());
        field
    }

    /// Writes every artifact into the configured output directory.
    ///
    /// The skeleton mesh, the reference surface with the encoded construction
    /// attached and the model descriptor are always written. A subdivided
    /// mesh is written when a subdivision level is set and an inflated
    /// surface when inflation is enabled; a failing or missing service is
    /// logged and its file skipped.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a mandatory file cannot be written.
    pub fn save(
        &self,
        subdivider: Option<&dyn SubdivisionService>,
        inflater: Option<&dyn InflationService>,
    ) -> Result<SavedArtifacts> {
        let dir = &self.config.output_directory;
        info!("Saving to directory {:?}", dir);
        fs::create_dir_all(dir)?;
        let model = &self.config.output_model;
        let surface_name = self.surface.name();

        let mesh = dir.join(format!("{model}.vtk"));
        PolyDataWriter::from_mesh(model, &self.mesh).write_file(&mesh)?;

        let affix = dir.join(format!("{surface_name}Affix.vtk"));
        let field = self.field_data();
        PolyDataWriter::from_surface(surface_name, &self.surface)
            .with_field_data(&field)
            .write_file(&affix)?;

        let descriptor = dir.join(format!("{model}.cmrep"));
        CmrepDescriptor::new(&self.config, self.store.tag_infos()).write_file(&descriptor)?;

        let subdivided = self.save_subdivided(subdivider)?;
        let inflated = self.save_inflated(inflater)?;

        Ok(SavedArtifacts {
            mesh,
            affix,
            descriptor,
            subdivided,
            inflated,
        })
    }

    fn save_subdivided(&self, service: Option<&dyn SubdivisionService>) -> Result<Option<PathBuf>> {
        let levels = self.config.subdivision_level;
        if levels == 0 {
            return Ok(None);
        }
        let Some(service) = service else {
            warn!(levels, "no subdivision service available, skipping subdivided mesh");
            return Ok(None);
        };
        let mut subdivided = match service.subdivide(&self.mesh, levels) {
            Ok(mesh) => mesh,
            Err(err) => {
                warn!(%err, "subdivision failed, skipping subdivided mesh");
                return Ok(None);
            }
        };
        resample_radius(&mut subdivided, &self.surface);

        let name = format!("{}_Subdivide", self.surface.name());
        let path = self.config.output_directory.join(format!("{name}.vtk"));
        PolyDataWriter::from_mesh(&name, &subdivided).write_file(&path)?;
        Ok(Some(path))
    }

    fn save_inflated(&self, service: Option<&dyn InflationService>) -> Result<Option<PathBuf>> {
        if !self.config.inflate {
            return Ok(None);
        }
        let Some(service) = service else {
            warn!("no inflation service available, skipping inflated surface");
            return Ok(None);
        };
        let inflated = match service.inflate(&self.mesh, self.config.inflate_radius) {
            Ok(mesh) => mesh,
            Err(err) => {
                warn!(%err, "inflation failed, skipping inflated surface");
                return Ok(None);
            }
        };

        let name = format!("{}_Inflated", self.surface.name());
        let path = self.config.output_directory.join(format!("{name}.vtk"));
        PolyDataWriter::from_mesh(&name, &inflated).write_file(&path)?;
        Ok(Some(path))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{ConstraintViolation, SkeletonError};

    /// A 4x4 grid on the z = 0 plane with radius equal to x.
    fn surface() -> ReferenceSurface {
        let mut vertices = Vec::new();
        let mut radius = Vec::new();
        for y in 0..4 {
            for x in 0..4 {
                vertices.push(Point3::new(f64::from(x), f64::from(y), 0.0));
                radius.push(f64::from(x));
            }
        }
        let mut triangles = Vec::new();
        for y in 0..3 {
            for x in 0..3 {
                let i = y * 4 + x;
                triangles.push([i, i + 1, i + 5]);
                triangles.push([i, i + 5, i + 4]);
            }
        }
        ReferenceSurface::new("grid", vertices, triangles, radius)
    }

    fn session() -> (SkeletonSession, PointListId, PointListId) {
        let mut s = SkeletonSession::new(surface(), SessionConfig::default());
        let branch = s.add_tag(TagInfo::new("b", TagType::Branch, 1, Color::default()).with_node_id("nb"));
        let edge = s.add_tag(TagInfo::new("e", TagType::FreeEdge, 2, Color::default()).with_node_id("ne"));
        s.add_triangle_label(LabelTriangle::new("face", Color::new(255.0, 0.0, 0.0)).with_node_id("lf"));
        (s, branch, edge)
    }

    #[test]
    fn add_point_snaps_to_reference_vertex() {
        let (mut s, branch, _) = session();
        let local = s.add_point(branch, Point3::new(2.1, 0.9, 0.3)).unwrap();
        assert_eq!(local, 0);
        let p = &s.store().points()[0];
        assert_eq!(p.pos, Point3::new(2.0, 1.0, 0.0));
        assert_eq!(p.seq, 6);
        assert!((p.radius - 2.0).abs() < 1e-12);
        assert_eq!(p.type_index, 1);
        assert_eq!(s.mesh().vertices.len(), 1);
        assert_eq!(s.store().label_data().len(), 16);
        assert!((s.store().label_data()[6] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn drag_does_not_snap_but_finish_does() {
        let (mut s, branch, _) = session();
        s.add_point(branch, Point3::new(0.0, 0.0, 0.0)).unwrap();
        s.drag_point((branch, 0), Point3::new(1.4, 0.2, 0.0)).unwrap();
        assert_eq!(s.mesh().vertices[0], Point3::new(1.4, 0.2, 0.0));
        assert_eq!(s.store().points()[0].seq, 0);

        let snapped = s.finish_point_move((branch, 0), Point3::new(1.4, 0.2, 0.0)).unwrap();
        assert_eq!(snapped, Some(Point3::new(1.0, 0.0, 0.0)));
        assert_eq!(s.store().points()[0].seq, 1);
        assert_eq!(s.store().label_data()[..2], [0.0, 1.0]);
    }

    #[test]
    fn moving_unregistered_point_is_ignored() {
        let (mut s, branch, _) = session();
        s.add_point(branch, Point3::new(0.0, 0.0, 0.0)).unwrap();
        let before = s.store().clone();
        s.drag_point((branch, 3), Point3::new(2.0, 2.0, 0.0)).unwrap();
        assert_eq!(s.finish_point_move((branch, 3), Point3::new(2.0, 2.0, 0.0)).unwrap(), None);
        assert_eq!(s.store(), &before);
        assert_eq!(s.mesh().vertices[0], Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn triangle_returns_continuation_positions() {
        let (mut s, branch, _) = session();
        for pos in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)] {
            s.add_point(branch, Point3::new(pos.0, pos.1, 0.0)).unwrap();
        }
        let next = s
            .attempt_to_add_triangle([(branch, 0), (branch, 1), (branch, 2)], "lf")
            .unwrap();
        assert_eq!(next, vec![1, 2]);
        assert_eq!(s.mesh().triangle_count(), 1);
        assert_eq!(s.mesh().colors[0], [255, 0, 0]);
    }

    #[test]
    fn unknown_label_is_a_hard_error() {
        let (mut s, branch, _) = session();
        for pos in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)] {
            s.add_point(branch, Point3::new(pos.0, pos.1, 0.0)).unwrap();
        }
        let err = s
            .attempt_to_add_triangle([(branch, 0), (branch, 1), (branch, 2)], "nope")
            .unwrap_err();
        assert!(matches!(err, SkeletonError::Lookup(LookupError::FaceLabelNotFound(_))));
        assert!(s.store().triangles().is_empty());
    }

    #[test]
    fn free_edge_precheck_uses_sort_keys() {
        let (mut s, _, edge) = session();
        for x in 0..4 {
            s.add_point(edge, Point3::new(f64::from(x), 3.0, 0.0)).unwrap();
        }
        assert!(s.pre_check(&[(edge, 0), (edge, 1)]).is_ok());
        assert!(s.pre_check(&[(edge, 0), (edge, 3)]).is_ok());
        assert!(matches!(
            s.pre_check(&[(edge, 0), (edge, 2)]),
            Err(SkeletonError::Constraint(ConstraintViolation::FreeEdgeNotAdjacent))
        ));

        s.set_sort_keys(edge, vec![0, 2, 1, 3]).unwrap();
        assert!(s.pre_check(&[(edge, 0), (edge, 2)]).is_ok());
        assert!(s.set_sort_keys(edge, vec![0]).is_err());
    }

    #[test]
    fn removing_unregistered_point_is_ignored() {
        let (mut s, branch, _) = session();
        assert_eq!(s.remove_point((branch, 5)).unwrap(), None);
    }

    #[test]
    fn remove_point_shifts_table_and_list() {
        let (mut s, branch, edge) = session();
        s.add_point(branch, Point3::new(0.0, 0.0, 0.0)).unwrap();
        s.add_point(edge, Point3::new(1.0, 0.0, 0.0)).unwrap();
        s.add_point(branch, Point3::new(0.0, 1.0, 0.0)).unwrap();
        s.add_point(branch, Point3::new(1.0, 1.0, 0.0)).unwrap();

        let removed = s.remove_point((branch, 0)).unwrap().unwrap();
        assert_eq!(removed.seq, 0);
        assert_eq!(s.global_index((edge, 0)).unwrap(), 0);
        assert_eq!(s.global_index((branch, 0)).unwrap(), 1);
        assert_eq!(s.global_index((branch, 1)).unwrap(), 2);
        assert!(s.global_index((branch, 2)).is_err());
        assert_eq!(s.point_list(branch).unwrap().sort_keys(), &[1, 2]);
    }

    #[test]
    fn pick_edits_triangle_under_cursor() {
        let (mut s, branch, _) = session();
        for pos in [(0.0, 0.0), (2.0, 0.0), (0.0, 2.0)] {
            s.add_point(branch, Point3::new(pos.0, pos.1, 0.0)).unwrap();
        }
        s.attempt_to_add_triangle([(branch, 0), (branch, 1), (branch, 2)], "lf")
            .unwrap();
        s.add_triangle_label(LabelTriangle::new("other", Color::new(0.0, 0.0, 255.0)).with_node_id("lo"));

        let hit = Point3::new(0.5, 0.5, 0.0);
        assert_eq!(s.assign_triangle_label_at(&hit, "lo").unwrap(), Some(0));
        assert_eq!(s.mesh().colors[0], [0, 0, 255]);
        assert_eq!(s.flip_triangle_at(&hit).unwrap(), Some(0));
        assert_eq!(s.store().triangles()[0].ids, [0, 2, 1]);
        assert_eq!(s.delete_triangle_at(&Point3::new(5.0, 5.0, 0.0)).unwrap(), None);
        assert!(s.delete_triangle_at(&hit).unwrap().is_some());
        assert!(s.mesh().is_empty());
        assert_eq!(s.store().edge(0, 1).unwrap().num_edge, 0);
    }

    #[test]
    fn label_update_rebuilds_colors() {
        let (mut s, branch, _) = session();
        for pos in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)] {
            s.add_point(branch, Point3::new(pos.0, pos.1, 0.0)).unwrap();
        }
        s.attempt_to_add_triangle([(branch, 0), (branch, 1), (branch, 2)], "lf")
            .unwrap();
        s.update_triangle_label("lf", "renamed", Color::new(0.0, 10.0, 0.0))
            .unwrap();
        assert_eq!(s.mesh().colors[0], [0, 10, 0]);
        assert_eq!(s.store().labels()[0].name, "renamed");
    }

    /// Interior pair (0,1) shared by two triangles, plus two branch apexes.
    fn shared_interior_pair() -> (SkeletonSession, PointListId, PointListId) {
        let (mut s, branch, _) = session();
        let interior = s.add_tag(TagInfo::new("i", TagType::Interior, 3, Color::default()).with_node_id("ni"));
        s.add_point(interior, Point3::new(1.0, 1.0, 0.0)).unwrap();
        s.add_point(interior, Point3::new(2.0, 1.0, 0.0)).unwrap();
        s.add_point(branch, Point3::new(1.0, 0.0, 0.0)).unwrap();
        s.add_point(branch, Point3::new(2.0, 2.0, 0.0)).unwrap();
        for apex in 0..2 {
            s.attempt_to_add_triangle([(interior, 0), (interior, 1), (branch, apex)], "lf")
                .unwrap();
        }
        (s, branch, interior)
    }

    #[test]
    fn retyping_onto_overfull_edges_is_refused() {
        let (mut s, branch, interior) = shared_interior_pair();
        assert_eq!(s.store().edge(0, 1).unwrap().num_edge, 2);
        let before = s.store().clone();

        let err = s
            .update_tag(interior, "rim", TagType::FreeEdge, 3, Color::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SkeletonError::Constraint(ConstraintViolation::EdgeCapacity { count: 1, max: 1, .. })
        ));
        assert_eq!(s.store(), &before);

        // The ledger stays exact: removing an unrelated point and one of the
        // two triangles leaves room for exactly one more on the shared pair.
        s.add_point(branch, Point3::new(3.0, 3.0, 0.0)).unwrap();
        s.remove_point((branch, 2)).unwrap().unwrap();
        assert!(s.delete_triangle_at(&Point3::new(1.3, 0.7, 0.0)).unwrap().is_some());
        assert_eq!(s.store().edge(0, 1).unwrap().num_edge, 1);
        s.attempt_to_add_triangle([(interior, 0), (interior, 1), (branch, 0)], "lf")
            .unwrap();
        assert!(s
            .attempt_to_add_triangle([(interior, 0), (interior, 1), (branch, 1)], "lf")
            .is_err());
        let on_pair = s
            .store()
            .triangles()
            .iter()
            .filter(|t| t.contains(0) && t.contains(1))
            .count();
        assert_eq!(on_pair, 2);
    }

    #[test]
    fn retyping_recomputes_edge_capacities() {
        let (mut s, _, interior) = shared_interior_pair();
        s.update_tag(interior, "spine", TagType::Branch, 3, Color::default())
            .unwrap();
        let shared = s.store().edge(0, 1).unwrap();
        assert_eq!(shared.constrain, 3);
        assert_eq!(shared.num_edge, 2);
        assert_eq!(s.store().edges().len(), 5);
        assert!(s.store().edges().values().all(|e| e.constrain == 3));
    }

    #[test]
    fn retyping_to_other_with_triangles_is_refused() {
        let (mut s, _, interior) = shared_interior_pair();
        let err = s
            .update_tag(interior, "misc", TagType::Other, 3, Color::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SkeletonError::Constraint(ConstraintViolation::UnsupportedPointType(_))
        ));
        assert_eq!(s.store().tag_info(2).unwrap().tag_type, TagType::Interior);
    }
}
