use voxel_mesher::atlas::{tile_for, tile_region};
use voxel_mesher::grid::{generate, snapshot};
use voxel_mesher::{
    Cell, CellModel, CellPosition, Channel, Face, Grid, GridShape, Mesher, MesherConfig,
    UvMapping,
};

fn single_grid(shape: GridShape, cells: &[(i32, i32, i32, u16)]) -> Grid {
    let mut grid = Grid::new(shape, CellModel::Single).unwrap();
    for &(x, y, z, code) in cells {
        grid.set_code(CellPosition::new(x, y, z), Channel::Base, code)
            .unwrap();
    }
    grid
}

/// Count visible faces straight from the neighbor rule.
fn count_visible_single(grid: &Grid, max_code: u16) -> usize {
    let mut count = 0;
    for pos in grid.shape().positions() {
        let code = grid.code(pos, Channel::Base);
        if code == 0 || code > max_code {
            continue;
        }
        for face in Face::ALL {
            if grid.code(pos.neighbor(face), Channel::Base) == 0 {
                count += 1;
            }
        }
    }
    count
}

fn count_visible_two_material(grid: &Grid) -> usize {
    let mut count = 0;
    for pos in grid.shape().positions() {
        let base = grid.code(pos, Channel::Base);
        let side = grid.code(pos, Channel::Side);
        if base == 0 {
            continue;
        }
        if side == 0 {
            if grid.code(pos.neighbor(Face::Bottom), Channel::Base) == 0 {
                count += 1;
            }
            continue;
        }
        if grid.code(pos.neighbor(Face::Top), Channel::Base) == 0 {
            count += 1;
        }
        for face in Face::SIDES {
            if grid.code(pos.neighbor(face), Channel::Side) == 0 {
                count += 1;
            }
        }
    }
    count
}

#[test]
fn single_cell_in_small_grid() {
    let grid = single_grid(GridShape::new([0, 0, 0], [3, 3, 3]), &[(1, 1, 1, 1)]);
    let output = Mesher::new().mesh(&grid);
    assert_eq!(output.quad_count(), 6);
    assert_eq!(output.vertex_count(), 36);
}

#[test]
fn stacked_cells_share_no_faces() {
    let grid = single_grid(
        GridShape::new([0, 0, 0], [3, 3, 3]),
        &[(1, 0, 1, 1), (1, 1, 1, 1)],
    );
    let output = Mesher::new().mesh(&grid);
    assert_eq!(output.quad_count(), 10);
}

#[test]
fn boundary_faces_are_drawn() {
    // Fill the whole grid: only the outer shell is visible.
    let shape = GridShape::new([0, 0, 0], [2, 2, 2]);
    let cells: Vec<_> = shape.positions().map(|p| (p.x, p.y, p.z, 1)).collect();
    let grid = single_grid(shape, &cells);
    let output = Mesher::new().mesh(&grid);
    assert_eq!(output.quad_count(), 6 * 4);
}

#[test]
fn floor_tile_over_empty() {
    let mut grid = Grid::new(GridShape::floor(4, 2), CellModel::TwoMaterial).unwrap();
    grid.set_cell(CellPosition::new(0, 1, 0), Cell::TwoMaterial { base: 5, side: 0 })
        .unwrap();
    let output = Mesher::with_config(MesherConfig::map_variant()).mesh(&grid);

    assert_eq!(output.quad_count(), 1);
    assert_eq!(tile_for(4), (4, 0));
    let region = tile_region(4);
    assert!(output.mesh.vertices.iter().all(|v| region.contains(v.uv)));
    // Upward floor quad at the bottom plane of y = 1.
    assert!(output.mesh.vertices.iter().all(|v| v.position[1] == 1.0));
}

#[test]
fn random_single_grid_conserves_quads() {
    let grid = generate::random_columns(GridShape::cube(5), 16, 99).unwrap();
    let output = Mesher::new().mesh(&grid);

    assert_eq!(output.quad_count(), count_visible_single(&grid, 16));
    let total = output.quad_count() as u32;
    output.batches.validate(total).unwrap();

    let groups = &output.batches.groups;
    assert_eq!(groups.len(), 16);
    assert_eq!(groups[0].start_quad, 0);
    for pair in groups.windows(2) {
        assert_eq!(pair[0].end_quad, pair[1].start_quad);
    }
    assert_eq!(groups.last().unwrap().end_quad, total);
}

#[test]
fn random_map_conserves_quads_and_uvs() {
    let mut grid = generate::random_floor(GridShape::floor(6, 3), 160, 5).unwrap();
    // A few stacked cells so top and floor culling both show up.
    grid.set_cell(CellPosition::new(0, 1, 0), Cell::TwoMaterial { base: 2, side: 0 })
        .unwrap();
    grid.set_cell(CellPosition::new(1, 1, 0), Cell::TwoMaterial { base: 3, side: 4 })
        .unwrap();

    let config = MesherConfig::map_variant_with_shadows();
    let output = Mesher::with_config(config).mesh(&grid);

    assert_eq!(output.quad_count(), count_visible_two_material(&grid));
    assert_eq!(output.batches.len(), 1);
    output
        .batches
        .validate(output.quad_count() as u32)
        .unwrap();

    for quad in 0..output.quad_count() {
        let vertices = output.mesh.quad(quad).unwrap();
        let u = vertices.iter().map(|v| v.uv[0]).fold(f32::MAX, f32::min);
        let v = vertices.iter().map(|v| v.uv[1]).fold(f32::MAX, f32::min);
        let col = (u * 16.0).round() as u32;
        let row = (v * 16.0).round() as u32;
        let region = tile_region(row * 16 + col);
        assert!(vertices.iter().all(|vx| region.contains(vx.uv)));
        assert!(vertices
            .iter()
            .all(|vx| vx.color.iter().all(|&c| c.is_finite() && c > 0.0)));
    }
}

#[test]
fn falloff_brightens_cells_near_the_light() {
    let mut grid = Grid::new(GridShape::floor(4, 16), CellModel::TwoMaterial).unwrap();
    grid.set_cell(CellPosition::new(0, 15, 0), Cell::TwoMaterial { base: 1, side: 2 })
        .unwrap();
    let output = Mesher::with_config(MesherConfig::map_variant_with_shadows()).mesh(&grid);

    // The top quad is emitted first; the march leaves the grid at once.
    let top = output.mesh.quad(0).unwrap();
    let expected = [32.0 / 17.0, 24.0 / 17.0, 32.0 / 17.0];
    for vertex in top {
        for (c, e) in vertex.color.iter().zip(expected) {
            assert!((c - e).abs() < 1e-5);
        }
    }
}

#[test]
fn snapshot_roundtrip_meshes_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("world.bin");
    let shape = GridShape::cube(3);

    let grid = generate::random_columns(shape, 16, 3).unwrap();
    snapshot::save_to_path(&grid, &path).unwrap();
    let loaded = voxel_mesher::load_grid(&path, shape, CellModel::Single).unwrap();
    assert_eq!(loaded, grid);

    let mesher = Mesher::new();
    assert_eq!(mesher.mesh(&grid).mesh, mesher.mesh(&loaded).mesh);
}

#[test]
fn missing_snapshot_falls_back_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let shape = GridShape::floor(2, 2);
    let grid =
        voxel_mesher::load_grid(dir.path().join("missing.bin"), shape, CellModel::TwoMaterial)
            .unwrap();
    assert!(shape.positions().all(|p| !grid.is_occupied(p)));
    let output = Mesher::with_config(MesherConfig::map_variant()).mesh(&grid);
    assert!(output.is_empty());
}

#[test]
fn atlas_mapping_on_single_grid() {
    let grid = single_grid(GridShape::cube(2), &[(0, 0, 0, 18)]);
    let config = MesherConfig::cube_variant()
        .with_group_count(32)
        .with_uv_mapping(UvMapping::Atlas);
    let output = Mesher::with_config(config).mesh(&grid);

    // Code 18 is index 17: column 1, row 1.
    let region = tile_region(17);
    assert_eq!(output.quad_count(), 6);
    assert!(output.mesh.vertices.iter().all(|v| region.contains(v.uv)));
    assert_eq!(output.batches.groups[17].quad_count(), 6);
}
